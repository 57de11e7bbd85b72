//! # wavefetch
//!
//! Batched concurrent HTTP fetch client with bounded in-flight concurrency,
//! retries, and round-robin proxy rotation.
//!
//! ## Design Philosophy
//!
//! wavefetch is designed to be:
//! - **Bounded** - URL collections are fetched in sequential "waves" of at
//!   most `step` concurrent requests, so neither the remote servers nor the
//!   local process is overwhelmed
//! - **Uniform** - every request resolves to the same response record shape,
//!   and a non-200 status is a normal outcome, never an error
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Testable** - the HTTP transport sits behind a trait, so tests inject
//!   mocks instead of hitting the network
//!
//! ## Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use wavefetch::{Config, FetchOptions, WaveClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WaveClient::new(Config::default())?;
//!
//!     // Single request
//!     let response = client
//!         .get("https://example.com", false, &FetchOptions::default())
//!         .await?;
//!     println!("status: {}", response.status_code);
//!
//!     // Batch, ten concurrent requests per wave
//!     let urls = ["https://example.com/a", "https://example.com/b"];
//!     let mut waves = std::pin::pin!(client.collect(
//!         urls,
//!         "get",
//!         false,
//!         FetchOptions::default()
//!     )?);
//!     while let Some(wave) = waves.next().await {
//!         for outcome in wave {
//!             println!("{:?}", outcome.map(|r| r.status_code));
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Batch-fetch client and wave coordination
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Proxy list loading and round-robin rotation
pub mod proxy;
/// Retry logic with fixed backoff and proxy rotation
pub mod retry;
/// HTTP transport seam (trait + reqwest implementation)
pub mod transport;
/// Core types: methods, options, response records
pub mod types;
/// Randomized user-agent selection
pub mod useragent;

mod fetcher;

// Re-export commonly used types
pub use client::WaveClient;
pub use config::{Config, HttpConfig, RetryConfig};
pub use error::{Error, Result, TransportError};
pub use proxy::{ProxyList, ProxyRotator};
pub use retry::{IsRetryable, fetch_with_retry};
pub use transport::{HttpTransport, Transport, TransportReply};
pub use types::{Content, FetchOptions, FetchOutcome, Method, Response};
pub use useragent::random_useragent;
