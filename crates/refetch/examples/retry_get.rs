//! Fetch a URL with retries, logging each attempt.
//!
//! ```bash
//! RUST_LOG=refetch=debug cargo run -p refetch --example retry_get --features trace -- https://httpbin.org/status/503
//! ```
//!
//! Retry settings are read from `REFETCH_DELAY_MS`, `REFETCH_RETRIES`,
//! `REFETCH_BACKOFF` and `REFETCH_RETRY_METHODS`.

use refetch::{FetchRetried, RetrySettings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://httpbin.org/status/503".to_string());

    let settings = RetrySettings::from_env()?;
    println!(
        "Fetching {} ({:?} backoff, {} ms unit, {} retries)",
        url, settings.backoff, settings.delay_ms, settings.retries
    );

    let fetch = FetchRetried::new(settings.builder().build())?;

    match fetch.get(&url).await {
        Ok(response) => {
            println!("Status: {}", response.status);
            if let Ok(text) = response.text() {
                println!("Body: {}", text);
            }
        }
        Err(err) => {
            println!("Failed: {}", err);
            if refetch::is_connect_error(&err) {
                println!("The connection was never established");
            }
        }
    }

    Ok(())
}
