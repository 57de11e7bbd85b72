//! Minimal example: one direct fetch, then a small batch in waves.
//!
//! Run with: cargo run --example basic_fetch

use futures::StreamExt;
use wavefetch::{Config, FetchOptions, WaveClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = WaveClient::new(Config::default())?;

    // Single request
    let response = client
        .get("https://example.com", false, &FetchOptions::default())
        .await?;
    println!("{} -> {}", response.request_url, response.status_code);

    // Batch: up to `step` (default 10) requests in flight per wave
    let urls = vec![
        "https://example.com",
        "https://www.rust-lang.org",
        "https://httpbin.org/status/404",
    ];
    let mut waves = std::pin::pin!(client.collect(urls, "get", false, FetchOptions::default())?);

    let mut wave_index = 0;
    while let Some(wave) = waves.next().await {
        wave_index += 1;
        for outcome in wave {
            match outcome {
                Ok(r) => println!(
                    "wave {wave_index}: {} -> {} (content: {})",
                    r.request_url,
                    r.status_code,
                    if r.content.is_some() { "yes" } else { "no" }
                ),
                Err(e) => println!("wave {wave_index}: failed: {e}"),
            }
        }
    }

    Ok(())
}
