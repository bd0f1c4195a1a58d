//! Retry decisions
//!
//! After every attempt the executor builds a fresh [`RetryContext`] and asks
//! [`should_retry`] whether to go again. The decision has two layers:
//!
//! 1. A gate that always applies: the request method must be on the
//!    allowlist and retries must remain in the budget.
//! 2. The configured [`RetryPredicate`]: the legacy response/error tests, or
//!    a caller-supplied replacement.
//!
//! The gate runs first. Once it fails, neither `should_retry_error` nor a
//! custom predicate is called.

use crate::config::{RetryConfig, RetryPredicate};
use crate::methods::is_retryable_method;
use refetch_transport::RequestOptions;

/// What an attempt produced: a response or an error, never both.
pub enum Outcome<'a, R, E> {
    /// The transport returned a response
    Response(&'a R),

    /// The transport failed
    Error(&'a E),
}

impl<'a, R, E> Outcome<'a, R, E> {
    /// Borrow the outcome of a transport result
    pub fn from_result(result: &'a Result<R, E>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

impl<R, E> Clone for Outcome<'_, R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, E> Copy for Outcome<'_, R, E> {}

/// Everything a retry decision may look at for one attempt.
///
/// Built fresh after every attempt and never mutated.
pub struct RetryContext<'a, R, E> {
    /// Zero-based index of the attempt just made
    pub attempt: u32,

    /// Retry budget of the configuration
    pub retries: u32,

    /// The configuration in effect
    pub config: &'a RetryConfig<R, E>,

    /// Result of the attempt
    pub outcome: Outcome<'a, R, E>,
}

impl<'a, R, E> RetryContext<'a, R, E> {
    /// Create a context for the given attempt
    pub fn new(attempt: u32, config: &'a RetryConfig<R, E>, outcome: Outcome<'a, R, E>) -> Self {
        Self {
            attempt,
            retries: config.retries,
            config,
            outcome,
        }
    }

    /// The response, if the attempt produced one
    pub fn response(&self) -> Option<&'a R> {
        match self.outcome {
            Outcome::Response(response) => Some(response),
            Outcome::Error(_) => None,
        }
    }

    /// The error, if the attempt failed
    pub fn error(&self) -> Option<&'a E> {
        match self.outcome {
            Outcome::Error(error) => Some(error),
            Outcome::Response(_) => None,
        }
    }
}

/// Whether another attempt fits in the budget after attempt `attempt`.
pub fn has_retries_left(attempt: u32, retries: u32) -> bool {
    attempt < retries
}

/// Method allowlist and budget check shared by every predicate.
pub fn retry_gate<R, E>(options: &RequestOptions, ctx: &RetryContext<'_, R, E>) -> bool {
    is_retryable_method(ctx.config.retry_methods.as_deref(), options.method.as_deref())
        && has_retries_left(ctx.attempt, ctx.retries)
}

/// The legacy retry decision.
///
/// Retries when the gate passes and either the response fails `is_ok` or the
/// error passes `should_retry_error`.
pub fn default_should_retry<R, E>(
    _url: &str,
    options: &RequestOptions,
    ctx: &RetryContext<'_, R, E>,
) -> bool {
    if !retry_gate(options, ctx) {
        return false;
    }

    match ctx.outcome {
        Outcome::Response(response) => !(ctx.config.is_ok)(response),
        Outcome::Error(error) => (ctx.config.should_retry_error)(error),
    }
}

/// Decide whether to retry, dispatching on the configured predicate.
pub fn should_retry<R, E>(url: &str, options: &RequestOptions, ctx: &RetryContext<'_, R, E>) -> bool {
    match &ctx.config.predicate {
        RetryPredicate::Legacy => default_should_retry(url, options, ctx),
        RetryPredicate::Custom(predicate) => retry_gate(options, ctx) && predicate(url, options, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refetch_transport::HttpResponse;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    type Config = RetryConfig<HttpResponse, String>;

    const URL: &str = "https://example.com/items";

    fn response(status: u16) -> HttpResponse {
        HttpResponse::new(status, HashMap::new(), Vec::new())
    }

    #[rstest]
    #[case(0, 5, true)]
    #[case(4, 5, true)]
    #[case(5, 5, false)]
    #[case(6, 5, false)]
    #[case(0, 0, false)]
    fn test_has_retries_left(#[case] attempt: u32, #[case] retries: u32, #[case] expected: bool) {
        assert_eq!(has_retries_left(attempt, retries), expected);
    }

    #[rstest]
    #[case(200, false)]
    #[case(404, true)]
    #[case(500, true)]
    #[case(503, true)]
    fn test_legacy_response_decision(#[case] status: u16, #[case] expected: bool) {
        let config = Config::default();
        let response = response(status);
        let ctx = RetryContext::new(0, &config, Outcome::Response(&response));

        assert_eq!(should_retry(URL, &RequestOptions::new(), &ctx), expected);
    }

    #[test]
    fn test_legacy_error_decision() {
        let config = Config::builder()
            .should_retry_error(|e| e != "fatal")
            .build();

        let transient = "reset".to_string();
        let ctx = RetryContext::new(0, &config, Outcome::Error(&transient));
        assert!(should_retry(URL, &RequestOptions::new(), &ctx));

        let fatal = "fatal".to_string();
        let ctx = RetryContext::new(0, &config, Outcome::Error(&fatal));
        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));
    }

    #[test]
    fn test_non_idempotent_method_is_not_retried() {
        let config = Config::default();
        let response = response(503);
        let ctx = RetryContext::new(0, &config, Outcome::Response(&response));

        assert!(!should_retry(URL, &RequestOptions::new().method("POST"), &ctx));
        assert!(should_retry(URL, &RequestOptions::new().method("put"), &ctx));
    }

    #[test]
    fn test_missing_allowlist_is_not_retried() {
        let config = Config::builder().without_retry_methods().build();
        let response = response(503);
        let ctx = RetryContext::new(0, &config, Outcome::Response(&response));

        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));
    }

    #[test]
    fn test_budget_exhausted() {
        let config = Config::builder().retries(2).build();
        let response = response(503);

        let ctx = RetryContext::new(1, &config, Outcome::Response(&response));
        assert!(should_retry(URL, &RequestOptions::new(), &ctx));

        let ctx = RetryContext::new(2, &config, Outcome::Response(&response));
        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));
    }

    #[test]
    fn test_gate_runs_before_error_test() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let config = Config::builder()
            .retries(1)
            .should_retry_error(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            })
            .build();

        let error = "boom".to_string();
        let ctx = RetryContext::new(1, &config, Outcome::Error(&error));

        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_custom_predicate_replaces_legacy_tests() {
        let config = Config::builder()
            .should_retry(|_, _, ctx| ctx.response().is_some_and(|r| r.status == 200))
            .build();

        // A 200 is retried and a 503 is not, the opposite of the legacy tests
        let ok = response(200);
        let ctx = RetryContext::new(0, &config, Outcome::Response(&ok));
        assert!(should_retry(URL, &RequestOptions::new(), &ctx));

        let unavailable = response(503);
        let ctx = RetryContext::new(0, &config, Outcome::Response(&unavailable));
        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));

        // The legacy decision is still available on its own
        assert!(default_should_retry(URL, &RequestOptions::new(), &ctx));
    }

    #[test]
    fn test_custom_predicate_cannot_bypass_gate() {
        let config = Config::builder()
            .retries(3)
            .should_retry(|_, _, _| true)
            .build();
        let error = "boom".to_string();

        let ctx = RetryContext::new(3, &config, Outcome::Error(&error));
        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));

        let ctx = RetryContext::new(0, &config, Outcome::Error(&error));
        assert!(!should_retry(URL, &RequestOptions::new().method("POST"), &ctx));
        assert!(should_retry(URL, &RequestOptions::new(), &ctx));
    }

    #[test]
    fn test_custom_predicate_sees_request() {
        let config = Config::builder()
            .should_retry(|url, options, ctx| {
                url.ends_with("/items")
                    && options.headers.contains_key("x-retry")
                    && ctx.error().is_some()
                    && ctx.retries == 5
            })
            .build();
        let error = "boom".to_string();
        let ctx = RetryContext::new(0, &config, Outcome::Error(&error));

        assert!(should_retry(
            URL,
            &RequestOptions::new().with_header("x-retry", "1"),
            &ctx
        ));
        assert!(!should_retry(URL, &RequestOptions::new(), &ctx));
    }

    #[test]
    fn test_context_accessors() {
        let config = Config::default();
        let ok = response(200);
        let result: Result<HttpResponse, String> = Err("boom".to_string());

        let ctx = RetryContext::new(2, &config, Outcome::Response(&ok));
        assert_eq!(ctx.response().map(|r| r.status), Some(200));
        assert!(ctx.error().is_none());
        assert_eq!(ctx.attempt, 2);
        assert_eq!(ctx.retries, 5);

        let ctx = RetryContext::new(0, &config, Outcome::from_result(&result));
        assert_eq!(ctx.error().map(String::as_str), Some("boom"));
        assert!(ctx.response().is_none());
    }
}
