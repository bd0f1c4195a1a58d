//! The retry loop
//!
//! [`Executor::execute`] drives one logical call: wait, attempt, decide,
//! repeat. The attempt index lives on the stack of that call, so concurrent
//! and sequential calls through one executor never share retry state.

use crate::config::RetryConfig;
use crate::predicate::{Outcome, RetryContext, should_retry};
use refetch_core::retry::{BackoffStrategy, millis_saturating};
use refetch_core::sleep::{Sleeper, TokioSleeper};
use refetch_transport::{RequestOptions, ResponseLike, Transport};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs requests through a transport with retries.
///
/// Every field is shared, so cloning is cheap and clones drive the same
/// transport and configuration.
pub struct Executor<T: Transport + ?Sized> {
    transport: Arc<T>,
    config: Arc<RetryConfig<T::Response, T::Error>>,
    strategy: Arc<dyn BackoffStrategy>,
    sleeper: Arc<dyn Sleeper>,
}

impl<T: Transport> Executor<T> {
    /// Create an executor sleeping on the tokio timer.
    ///
    /// The configured delay is resolved into a strategy once, here.
    pub fn new(transport: T, config: RetryConfig<T::Response, T::Error>) -> Self {
        Self::from_arc(Arc::new(transport), config)
    }
}

impl<T: Transport + ?Sized> Executor<T> {
    /// Create an executor over a shared transport
    pub fn from_arc(transport: Arc<T>, config: RetryConfig<T::Response, T::Error>) -> Self {
        let strategy = config.delay.clone().into_strategy();

        Self {
            transport,
            config: Arc::new(config),
            strategy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleep capability
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// The configuration in effect
    pub fn config(&self) -> &RetryConfig<T::Response, T::Error> {
        &self.config
    }

    /// The wrapped transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform a request, retrying as configured.
    ///
    /// `url` and `options` are passed to the transport unchanged on every
    /// attempt. When the loop stops, the last transport result is returned
    /// as-is: a response that failed the success test is still `Ok`, and an
    /// error is the transport's own value.
    pub async fn execute(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<T::Response, T::Error> {
        let mut attempt: u32 = 0;

        loop {
            let delay = self.strategy.delay_for(attempt);
            debug!(
                url,
                attempt,
                delay_ms = millis_saturating(delay),
                "starting attempt"
            );
            self.sleeper.sleep(delay).await;

            let result = self.transport.fetch(url, options).await;

            let ctx = RetryContext::new(attempt, &self.config, Outcome::from_result(&result));
            if !should_retry(url, options, &ctx) {
                debug!(
                    url,
                    attempt,
                    status = ctx.response().map(ResponseLike::status),
                    failed = result.is_err(),
                    "finished"
                );
                return result;
            }

            warn!(
                url,
                attempt,
                retries = self.config.retries,
                status = ctx.response().map(ResponseLike::status),
                failed = result.is_err(),
                "attempt failed, retrying"
            );
            attempt += 1;
        }
    }
}

impl<T: Transport + ?Sized> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            strategy: Arc::clone(&self.strategy),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<T: Transport + ?Sized> fmt::Debug for Executor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Status(u16);

    impl ResponseLike for Status {
        fn status(&self) -> u16 {
            self.0
        }

        fn ok(&self) -> bool {
            (200..300).contains(&self.0)
        }
    }

    /// Replays a fixed sequence of statuses, repeating the last one.
    struct Statuses {
        script: Vec<u16>,
        calls: AtomicU32,
    }

    impl Statuses {
        fn new(script: &[u16]) -> Self {
            Self {
                script: script.to_vec(),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for Statuses {
        type Response = Status;
        type Error = String;

        async fn fetch(&self, _url: &str, _options: &RequestOptions) -> Result<Status, String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            let status = self.script[call.min(self.script.len() - 1)];
            Ok(Status(status))
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSleeper {
        delays: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    #[tokio::test]
    async fn test_delays_follow_strategy() {
        let sleeper = RecordingSleeper::default();
        let config = RetryConfig::builder()
            .delay(Duration::from_millis(10))
            .retries(3)
            .build();
        let executor = Executor::new(Statuses::new(&[503]), config).with_sleeper(sleeper.clone());

        let response = executor
            .execute("http://test", &RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response, Status(503));
        assert_eq!(executor.transport().calls(), 4);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![
                Duration::ZERO,
                Duration::from_millis(10),
                Duration::from_millis(40),
                Duration::from_millis(90),
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_on_success() {
        let sleeper = RecordingSleeper::default();
        let config = RetryConfig::builder().delay(Duration::ZERO).build();
        let executor =
            Executor::new(Statuses::new(&[500, 502, 200, 500]), config).with_sleeper(sleeper.clone());

        let response = executor
            .execute("http://test", &RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response, Status(200));
        assert_eq!(executor.transport().calls(), 3);
        assert_eq!(sleeper.delays.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_saturated_delay_reaches_sleeper() {
        let sleeper = RecordingSleeper::default();
        let config = RetryConfig::builder()
            .delay_fn(|attempt| if attempt == 0 { Duration::ZERO } else { Duration::MAX })
            .retries(1)
            .build();
        let executor = Executor::new(Statuses::new(&[503, 200]), config).with_sleeper(sleeper.clone());

        let response = executor
            .execute("http://test", &RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response, Status(200));
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::ZERO, Duration::MAX]
        );
    }

    #[tokio::test]
    async fn test_clones_share_transport_but_not_attempts() {
        let config = RetryConfig::builder()
            .delay(Duration::ZERO)
            .retries(2)
            .build();
        let executor = Executor::new(Statuses::new(&[503]), config);
        let clone = executor.clone();

        executor.execute("http://test", &RequestOptions::new()).await.unwrap();
        clone.execute("http://test", &RequestOptions::new()).await.unwrap();

        assert_eq!(executor.transport().calls(), 6);
    }

    #[test]
    fn test_debug_shows_config() {
        let config: RetryConfig<Status, String> = RetryConfig::builder().retries(1).build();
        let executor = Executor::new(Statuses::new(&[200]), config);

        let debug = format!("{:?}", executor);
        assert!(debug.contains("retries: 1"));
    }
}
