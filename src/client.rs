//! The batch-fetch client: single requests and bounded concurrent waves
//!
//! [`WaveClient`] is an explicit, caller-owned handle — construct it once and
//! pass it by reference wherever fetches happen. There is no process-global
//! instance. The underlying transport (connection pool, per-proxy clients) is
//! acquired at construction and released deterministically when the client is
//! dropped.

use futures::stream::{self, FuturesUnordered, Stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::fetch_once;
use crate::proxy::{ProxyList, ProxyRotator};
use crate::retry::fetch_with_retry;
use crate::transport::{HttpTransport, Transport};
use crate::types::{FetchOptions, FetchOutcome, Method, Response};
use crate::useragent::random_useragent;

/// Batched concurrent HTTP fetch client
///
/// Every request carries the client's default header set (seeded with a
/// user-agent drawn at random when the client is built) unless the caller
/// supplies a replacement. Transient transport failures are retried with a
/// fixed backoff, rotating through the proxy pool when one is configured.
pub struct WaveClient {
    config: Config,
    transport: Arc<dyn Transport>,
    rotator: Option<ProxyRotator>,
    default_headers: Vec<(String, String)>,
}

impl WaveClient {
    /// Build a client over the production HTTP transport
    ///
    /// Loads the proxy list from `config.http.proxy_file` when set; a missing
    /// or empty file puts the client in no-proxy mode.
    pub fn new(config: Config) -> Result<Self> {
        let proxies = match &config.http.proxy_file {
            Some(path) => ProxyList::load(path)?,
            None => ProxyList::empty(),
        };
        let transport = Arc::new(HttpTransport::new(&config.http, &proxies)?);
        Self::with_transport(config, transport, proxies)
    }

    /// Build a client over a caller-supplied transport
    ///
    /// This is the dependency-injection seam: tests hand in a mock transport
    /// and whatever proxy list the scenario needs.
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn Transport>,
        proxies: ProxyList,
    ) -> Result<Self> {
        if config.step == 0 {
            return Err(Error::InvalidArgument(
                "step must be at least 1".to_string(),
            ));
        }
        if config.step > 100 {
            warn!(
                step = config.step,
                "Wave size above 100; some servers can't handle this many concurrent requests"
            );
        }

        let rotator = if proxies.is_empty() {
            None
        } else {
            Some(ProxyRotator::new(proxies)?)
        };

        let default_headers = vec![(
            "user-agent".to_string(),
            random_useragent().to_string(),
        )];

        Ok(Self {
            config,
            transport,
            rotator,
            default_headers,
        })
    }

    /// The header set applied when a request supplies none of its own
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Number of proxy endpoints in the pool (0 = no-proxy mode)
    pub fn proxy_count(&self) -> usize {
        self.rotator.as_ref().map_or(0, ProxyRotator::len)
    }

    /// Fetch one URL with a method given as a string
    ///
    /// The method must be one of `get`, `post`, `put`, `patch`, `options`
    /// (case-sensitive); anything else fails with
    /// [`Error::UnsupportedMethod`] before any network interaction.
    pub async fn fetch(
        &self,
        url: &str,
        method: &str,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        let method = Method::parse(method)?;
        self.fetch_parsed(url, method, decode_json, options).await
    }

    /// GET one URL
    pub async fn get(
        &self,
        url: &str,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        self.fetch_parsed(url, Method::Get, decode_json, options).await
    }

    /// POST to one URL
    pub async fn post(
        &self,
        url: &str,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        self.fetch_parsed(url, Method::Post, decode_json, options).await
    }

    /// PUT to one URL
    pub async fn put(
        &self,
        url: &str,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        self.fetch_parsed(url, Method::Put, decode_json, options).await
    }

    /// PATCH one URL
    pub async fn patch(
        &self,
        url: &str,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        self.fetch_parsed(url, Method::Patch, decode_json, options).await
    }

    /// OPTIONS request against one URL
    pub async fn options(
        &self,
        url: &str,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        self.fetch_parsed(url, Method::Options, decode_json, options).await
    }

    /// One logical request: a single attempt wrapped by the retry driver
    async fn fetch_parsed(
        &self,
        url: &str,
        method: Method,
        decode_json: bool,
        options: &FetchOptions,
    ) -> Result<Response> {
        let transport = self.transport.as_ref();
        let default_headers = self.default_headers.as_slice();

        fetch_with_retry(&self.config.retry, self.rotator.as_ref(), |proxy| async move {
            fetch_once(
                transport,
                default_headers,
                url,
                method,
                decode_json,
                proxy.as_deref(),
                options,
            )
            .await
        })
        .await
    }

    /// Fetch a collection of URLs in bounded concurrent waves
    ///
    /// The URLs are split into consecutive waves of at most `config.step`
    /// entries (the last wave may be shorter). Within a wave every URL is
    /// fetched concurrently and the wave's results are delivered in
    /// completion order — unordered within a wave, ordered across waves. A
    /// wave always yields one tagged outcome per URL: one item exhausting its
    /// retries shows up as that item's `Err` entry and does not abort its
    /// siblings.
    ///
    /// The stream is lazy (wave N+1 does not start until the consumer asks
    /// for it), finite, and not restartable; call `collect` again to re-fetch.
    /// Method validation happens up front, before any network interaction.
    pub fn collect<I, S>(
        &self,
        urls: I,
        method: &str,
        decode_json: bool,
        options: FetchOptions,
    ) -> Result<impl Stream<Item = Vec<FetchOutcome>> + '_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let method = Method::parse(method)?;
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();

        let step = self.config.step.min(urls.len()).max(1);
        let waves: Vec<Vec<String>> = urls.chunks(step).map(<[String]>::to_vec).collect();
        debug!(urls = urls.len(), step, waves = waves.len(), "Collecting in waves");

        Ok(stream::unfold(
            (waves.into_iter(), options),
            move |(mut waves, options)| async move {
                let wave = waves.next()?;
                debug!(size = wave.len(), "Starting wave");

                let opts = &options;
                let mut inflight: FuturesUnordered<_> = wave
                    .into_iter()
                    .map(|url| async move {
                        self.fetch_parsed(&url, method, decode_json, opts).await
                    })
                    .collect();

                let mut results = Vec::with_capacity(inflight.len());
                while let Some(outcome) = inflight.next().await {
                    results.push(outcome);
                }
                drop(inflight);

                Some((results, (waves, options)))
            },
        ))
    }
}
