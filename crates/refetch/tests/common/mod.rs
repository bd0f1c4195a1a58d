//! Common test utilities and helpers

use async_trait::async_trait;
use refetch_transport::{RequestOptions, ResponseLike, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Install a test subscriber honoring `RUST_LOG`
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Response returned by [`ScriptedTransport`]
#[allow(dead_code)]
#[derive(Debug, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
}

impl ResponseLike for MockResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error returned by [`ScriptedTransport`]
#[allow(dead_code)]
#[derive(Debug, PartialEq, Eq)]
pub struct MockError(pub &'static str);

#[allow(dead_code)]
pub type Outcome = Result<Arc<MockResponse>, Arc<MockError>>;

#[allow(dead_code)]
pub fn respond(status: u16) -> Outcome {
    Ok(Arc::new(MockResponse { status }))
}

#[allow(dead_code)]
pub fn fail(message: &'static str) -> Outcome {
    Err(Arc::new(MockError(message)))
}

/// Transport replaying a fixed script of outcomes.
///
/// Once the script runs out the last outcome repeats. Outcomes are shared
/// `Arc`s, so tests can check that the value returned to the caller is the
/// very one the transport produced.
#[allow(dead_code)]
pub struct ScriptedTransport {
    script: Vec<Outcome>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(usize, usize)>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: Vec<Outcome>) -> Self {
        assert!(!script.is_empty(), "script needs at least one outcome");
        Self {
            script,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A transport that always returns `status`
    pub fn always(status: u16) -> Self {
        Self::new(vec![respond(status)])
    }

    /// A transport that always fails
    pub fn always_failing(message: &'static str) -> Self {
        Self::new(vec![fail(message)])
    }

    /// Number of times `fetch` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The scripted outcome for call `index`
    pub fn outcome(&self, index: usize) -> &Outcome {
        &self.script[index.min(self.script.len() - 1)]
    }

    /// Addresses of the url and options passed on each call
    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    type Response = Arc<MockResponse>;
    type Error = Arc<MockError>;

    async fn fetch(&self, url: &str, options: &RequestOptions) -> Outcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((
            url.as_ptr() as usize,
            options as *const RequestOptions as usize,
        ));

        // Yield so concurrent calls interleave
        tokio::task::yield_now().await;

        self.outcome(call).clone()
    }
}
