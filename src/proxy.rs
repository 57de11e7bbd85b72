//! Proxy endpoint list loading and round-robin rotation
//!
//! The endpoint list is loaded once at client construction and never mutated
//! during a run. The rotator itself is stateless: the "current proxy" cursor
//! lives in the per-request retry state, so concurrent requests rotate
//! independently without shared mutable state.

use std::path::Path;

use crate::error::{Error, Result};

/// Ordered, immutable list of proxy endpoints
///
/// Endpoints are opaque strings (host:port or full URL) in the order they
/// appeared in the configuration source.
#[derive(Clone, Debug, Default)]
pub struct ProxyList {
    endpoints: Vec<String>,
}

impl ProxyList {
    /// Empty list (no-proxy mode)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a list from endpoint strings, dropping blank entries
    pub fn from_endpoints<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoints = endpoints
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { endpoints }
    }

    /// Load a list from a text file, one endpoint per line
    ///
    /// Blank lines are skipped. A missing file is not an error: it yields an
    /// empty list, putting the client in no-proxy mode.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Proxy file not found, running without proxies");
            return Ok(Self::empty());
        }

        let raw = std::fs::read_to_string(path)?;
        let list = Self::from_endpoints(raw.lines());
        tracing::debug!(
            path = %path.display(),
            endpoints = list.len(),
            "Loaded proxy list"
        );
        Ok(list)
    }

    /// Number of endpoints
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// True when no endpoints are configured
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The endpoints in configuration order
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

/// Round-robin rotation over a non-empty proxy list
#[derive(Clone, Debug)]
pub struct ProxyRotator {
    list: ProxyList,
}

impl ProxyRotator {
    /// Build a rotator over a proxy list
    ///
    /// Fails with a configuration error when the list is empty; callers with
    /// no endpoints should run without a rotator instead.
    pub fn new(list: ProxyList) -> Result<Self> {
        if list.is_empty() {
            return Err(Error::config(
                "cannot rotate over an empty proxy list",
                Some("proxy_file"),
            ));
        }
        Ok(Self { list })
    }

    /// The endpoint a fresh request starts with
    pub fn first(&self) -> &str {
        // new() guarantees at least one endpoint
        &self.list.endpoints()[0]
    }

    /// Number of endpoints in the backing list
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Always false: construction rejects empty lists
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The endpoint after `current` in list order, wrapping from last to first
    ///
    /// Fails with a configuration error when `current` is not a member of the
    /// configured list.
    pub fn next(&self, current: &str) -> Result<&str> {
        let endpoints = self.list.endpoints();
        let index = endpoints
            .iter()
            .position(|p| p == current)
            .ok_or_else(|| {
                Error::config(
                    format!("proxy {current:?} is not in the configured list"),
                    Some("proxy_file"),
                )
            })?;

        Ok(&endpoints[(index + 1) % endpoints.len()])
    }
}
