//! Configuration types for wavefetch

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Top-level client configuration
///
/// Works out of the box with zero configuration: `Config::default()` gives a
/// wave size of 10, a five-attempt retry budget without proxies, and no proxy
/// pool.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of concurrent requests per wave (default: 10)
    ///
    /// Values above 100 are accepted but discouraged; some servers can't
    /// handle that many simultaneous requests from one client.
    #[serde(default = "default_step")]
    pub step: usize,

    /// Retry behavior for transient transport failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step: 10,
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Retry behavior configuration
///
/// The backoff is a fixed interval, deliberately without exponential growth or
/// jitter: batch jobs that need gentler pacing should reduce the wave size
/// instead of stretching individual retries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request when no proxy pool is configured (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Attempts granted per proxy endpoint when a pool is configured (default: 10)
    ///
    /// The effective budget is `attempts_per_proxy * pool size`, amortizing
    /// round-robin rotation across every endpoint.
    #[serde(default = "default_attempts_per_proxy")]
    pub attempts_per_proxy: u32,

    /// Fixed delay between attempts (default: 2 seconds)
    #[serde(default = "default_backoff", with = "duration_serde")]
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            attempts_per_proxy: 10,
            backoff: Duration::from_secs(2),
        }
    }
}

/// HTTP transport settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// TCP connect timeout (default: 10 seconds)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,

    /// Whole-request timeout (default: 60 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Maximum redirects to follow per request (default: 10)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Path to a proxy list file, one endpoint per line (None = direct only)
    ///
    /// A missing or empty file puts the client in no-proxy mode rather than
    /// failing construction.
    #[serde(default)]
    pub proxy_file: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_redirects: 10,
            proxy_file: None,
        }
    }
}

fn default_step() -> usize {
    10
}

fn default_max_attempts() -> u32 {
    5
}

fn default_attempts_per_proxy() -> u32 {
    10
}

fn default_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_redirects() -> usize {
    10
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
