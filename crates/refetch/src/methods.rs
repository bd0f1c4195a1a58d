//! Idempotent-method classification
//!
//! Only methods that can be repeated without duplicating side effects are
//! eligible for retry. The allowlist is configurable; these helpers answer
//! whether a given request method is on it.

pub use refetch_transport::DEFAULT_METHOD;

/// HTTP methods retried by default.
pub const IDEMPOTENT_HTTP_METHODS: [&str; 6] = ["PUT", "DELETE", "GET", "HEAD", "PATCH", "OPTIONS"];

/// The default allowlist as owned strings, ready for a [`RetryConfig`](crate::RetryConfig).
pub fn idempotent_http_methods() -> Vec<String> {
    IDEMPOTENT_HTTP_METHODS.iter().map(|m| m.to_string()).collect()
}

/// Whether `method` appears in `retry_methods`, ignoring ASCII case.
///
/// A missing allowlist is never retryable. A missing method is treated as
/// [`DEFAULT_METHOD`].
///
/// # Examples
///
/// ```rust
/// use refetch::methods::{idempotent_http_methods, is_retryable_method};
///
/// let allow = idempotent_http_methods();
///
/// assert!(is_retryable_method(Some(allow.as_slice()), Some("get")));
/// assert!(is_retryable_method(Some(allow.as_slice()), None));
/// assert!(!is_retryable_method(Some(allow.as_slice()), Some("POST")));
/// assert!(!is_retryable_method(None, Some("GET")));
/// ```
pub fn is_retryable_method(retry_methods: Option<&[String]>, method: Option<&str>) -> bool {
    let Some(retry_methods) = retry_methods else {
        return false;
    };

    let method = method.unwrap_or(DEFAULT_METHOD);
    retry_methods
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("GET", true)]
    #[case("get", true)]
    #[case("Put", true)]
    #[case("DELETE", true)]
    #[case("head", true)]
    #[case("PATCH", true)]
    #[case("OPTIONS", true)]
    #[case("POST", false)]
    #[case("post", false)]
    #[case("CONNECT", false)]
    #[case("", false)]
    fn test_default_allowlist(#[case] method: &str, #[case] expected: bool) {
        let allow = idempotent_http_methods();
        assert_eq!(is_retryable_method(Some(allow.as_slice()), Some(method)), expected);
    }

    #[test]
    fn test_missing_method_is_get() {
        let allow = vec!["get".to_string()];
        assert!(is_retryable_method(Some(allow.as_slice()), None));

        let no_get = vec!["PUT".to_string()];
        assert!(!is_retryable_method(Some(no_get.as_slice()), None));
    }

    #[test]
    fn test_missing_allowlist_fails_closed() {
        assert!(!is_retryable_method(None, Some("GET")));
        assert!(!is_retryable_method(None, None));
    }

    #[test]
    fn test_custom_allowlist_is_case_insensitive() {
        let allow = vec!["post".to_string()];
        assert!(is_retryable_method(Some(allow.as_slice()), Some("POST")));
        assert!(!is_retryable_method(Some(&[][..]), Some("GET")));
    }
}
