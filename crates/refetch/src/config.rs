//! Configuration for retrying fetches
//!
//! [`RetryConfig`] is the immutable snapshot a [`FetchRetried`](crate::FetchRetried)
//! closes over. It is built once, either directly, through
//! [`RetryConfigBuilder`], or from serializable [`RetrySettings`].

use crate::error::ConfigError;
use crate::methods::idempotent_http_methods;
use crate::predicate::RetryContext;
use refetch_core::retry::{
    BackoffStrategy, BinaryExponential, DEFAULT_DELAY_UNIT, Delay, millis_saturating,
};
use refetch_transport::{RequestOptions, ResponseLike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 5;

/// Decides whether a response counts as a success.
pub type IsOk<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Decides whether an error is worth another attempt.
pub type ShouldRetryError<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Caller-supplied retry decision, consulted after the method and budget gate.
pub type ShouldRetry<R, E> =
    Arc<dyn Fn(&str, &RequestOptions, &RetryContext<'_, R, E>) -> bool + Send + Sync>;

/// Which retry decision a configuration uses.
///
/// Chosen once when the configuration is built. Both variants are subject to
/// the method allowlist and the retry budget.
pub enum RetryPredicate<R, E> {
    /// Retry responses failing `is_ok` and errors passing `should_retry_error`.
    Legacy,

    /// Replace the response and error tests with a custom decision.
    Custom(ShouldRetry<R, E>),
}

impl<R, E> RetryPredicate<R, E> {
    /// Whether a custom decision was supplied.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl<R, E> Clone for RetryPredicate<R, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Legacy => Self::Legacy,
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<R, E> Default for RetryPredicate<R, E> {
    fn default() -> Self {
        Self::Legacy
    }
}

impl<R, E> fmt::Debug for RetryPredicate<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("Legacy"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Default success test: the exchange succeeded and the status is below 500.
pub fn default_is_ok<R: ResponseLike>(response: &R) -> bool {
    response.ok() && response.status() < 500
}

/// Configuration for a retrying fetch.
///
/// `R` and `E` are the transport's response and error types.
///
/// # Examples
///
/// ```rust
/// use refetch::RetryConfig;
/// use refetch_transport::{HttpResponse, TransportError};
/// use std::time::Duration;
///
/// let config: RetryConfig<HttpResponse, TransportError> = RetryConfig::builder()
///     .delay(Duration::from_millis(250))
///     .retries(3)
///     .build();
///
/// assert_eq!(config.retries, 3);
/// ```
pub struct RetryConfig<R, E> {
    /// Wait between attempts: a quadratic unit or a full strategy
    pub delay: Delay,

    /// Maximum number of retries after the first attempt
    pub retries: u32,

    /// Success test for responses (legacy predicate only)
    pub is_ok: IsOk<R>,

    /// Retry test for errors (legacy predicate only)
    pub should_retry_error: ShouldRetryError<E>,

    /// Legacy or custom retry decision
    pub predicate: RetryPredicate<R, E>,

    /// Methods eligible for retry. `None` disables retries entirely.
    pub retry_methods: Option<Vec<String>>,
}

impl<R, E> RetryConfig<R, E>
where
    R: ResponseLike + 'static,
    E: 'static,
{
    /// Create a builder seeded with the defaults
    pub fn builder() -> RetryConfigBuilder<R, E> {
        RetryConfigBuilder::new()
    }
}

impl<R, E> Default for RetryConfig<R, E>
where
    R: ResponseLike + 'static,
    E: 'static,
{
    fn default() -> Self {
        Self {
            delay: Delay::default(),
            retries: DEFAULT_RETRIES,
            is_ok: Arc::new(default_is_ok::<R>),
            should_retry_error: Arc::new(|_: &E| true),
            predicate: RetryPredicate::Legacy,
            retry_methods: Some(idempotent_http_methods()),
        }
    }
}

impl<R, E> Clone for RetryConfig<R, E> {
    fn clone(&self) -> Self {
        Self {
            delay: self.delay.clone(),
            retries: self.retries,
            is_ok: Arc::clone(&self.is_ok),
            should_retry_error: Arc::clone(&self.should_retry_error),
            predicate: self.predicate.clone(),
            retry_methods: self.retry_methods.clone(),
        }
    }
}

impl<R, E> fmt::Debug for RetryConfig<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("delay", &self.delay)
            .field("retries", &self.retries)
            .field("predicate", &self.predicate)
            .field("retry_methods", &self.retry_methods)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RetryConfig`]
pub struct RetryConfigBuilder<R, E> {
    config: RetryConfig<R, E>,
}

impl<R, E> RetryConfigBuilder<R, E>
where
    R: ResponseLike + 'static,
    E: 'static,
{
    /// Create a builder seeded with the defaults
    pub fn new() -> Self {
        Self {
            config: RetryConfig::default(),
        }
    }
}

impl<R, E> Default for RetryConfigBuilder<R, E>
where
    R: ResponseLike + 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E> RetryConfigBuilder<R, E> {
    /// Use quadratic backoff with this time unit
    pub fn delay(mut self, unit: Duration) -> Self {
        self.config.delay = Delay::Unit(unit);
        self
    }

    /// Use a delay function verbatim
    pub fn delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.config.delay = Delay::from_fn(f);
        self
    }

    /// Use a backoff strategy verbatim
    pub fn backoff(mut self, strategy: impl BackoffStrategy + 'static) -> Self {
        self.config.delay = Delay::strategy(strategy);
        self
    }

    /// Set the maximum number of retries
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the response success test
    pub fn is_ok<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.config.is_ok = Arc::new(f);
        self
    }

    /// Set the error retry test
    pub fn should_retry_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.config.should_retry_error = Arc::new(f);
        self
    }

    /// Replace the response and error tests with a custom decision.
    ///
    /// The method allowlist and retry budget still apply.
    pub fn should_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &RequestOptions, &RetryContext<'_, R, E>) -> bool + Send + Sync + 'static,
    {
        self.config.predicate = RetryPredicate::Custom(Arc::new(f));
        self
    }

    /// Set the methods eligible for retry
    pub fn retry_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.retry_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Remove the method allowlist, which disables retries
    pub fn without_retry_methods(mut self) -> Self {
        self.config.retry_methods = None;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RetryConfig<R, E> {
        self.config
    }
}

/// Built-in backoff strategy selectable from settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// `attempt² × unit`
    #[default]
    Quadratic,

    /// `(2^attempt − 1) × unit`
    BinaryExponential,
}

impl FromStr for BackoffKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quadratic" | "exponential" => Ok(Self::Quadratic),
            "binary_exponential" | "binary-exponential" => Ok(Self::BinaryExponential),
            _ => Err(ConfigError::invalid_value("backoff", s)),
        }
    }
}

/// Serializable retry settings.
///
/// Covers the parts of a [`RetryConfig`] that are plain data. Predicates are
/// code and are added on the builder returned by [`RetrySettings::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Backoff time unit in milliseconds
    pub delay_ms: u64,

    /// Maximum number of retries
    pub retries: u32,

    /// Backoff strategy
    pub backoff: BackoffKind,

    /// Methods eligible for retry. `null` disables retries.
    pub retry_methods: Option<Vec<String>>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            delay_ms: millis_saturating(DEFAULT_DELAY_UNIT),
            retries: DEFAULT_RETRIES,
            backoff: BackoffKind::default(),
            retry_methods: Some(idempotent_http_methods()),
        }
    }
}

impl RetrySettings {
    /// Load settings from environment variables.
    ///
    /// This will look for:
    /// - `REFETCH_DELAY_MS` for the backoff unit in milliseconds
    /// - `REFETCH_RETRIES` for the maximum number of retries
    /// - `REFETCH_BACKOFF` for the strategy (`quadratic` or `binary_exponential`)
    /// - `REFETCH_RETRY_METHODS` for a comma-separated method allowlist
    ///
    /// Unset variables keep their defaults; unparsable ones are an error.
    #[cfg(feature = "env")]
    pub fn from_env() -> crate::Result<Self> {
        use std::env;

        let mut settings = Self::default();

        if let Ok(delay) = env::var("REFETCH_DELAY_MS") {
            settings.delay_ms = delay
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value("REFETCH_DELAY_MS", delay.as_str()))?;
        }

        if let Ok(retries) = env::var("REFETCH_RETRIES") {
            settings.retries = retries
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value("REFETCH_RETRIES", retries.as_str()))?;
        }

        if let Ok(backoff) = env::var("REFETCH_BACKOFF") {
            settings.backoff = backoff
                .parse()
                .map_err(|_| ConfigError::invalid_value("REFETCH_BACKOFF", backoff.as_str()))?;
        }

        if let Ok(methods) = env::var("REFETCH_RETRY_METHODS") {
            settings.retry_methods = Some(
                methods
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }

        Ok(settings)
    }

    /// The backoff unit
    pub fn delay_unit(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The delay these settings describe
    pub fn delay(&self) -> Delay {
        match self.backoff {
            BackoffKind::Quadratic => Delay::Unit(self.delay_unit()),
            BackoffKind::BinaryExponential => {
                Delay::strategy(BinaryExponential::new(self.delay_unit()))
            }
        }
    }

    /// A config builder seeded from these settings
    pub fn builder<R, E>(&self) -> RetryConfigBuilder<R, E>
    where
        R: ResponseLike + 'static,
        E: 'static,
    {
        let mut builder = RetryConfigBuilder::new();
        builder.config.delay = self.delay();
        builder.config.retries = self.retries;
        builder.config.retry_methods = self.retry_methods.clone();
        builder
    }
}
