//! HTTP transport seam
//!
//! [`Transport`] is the trait the fetch path talks to, so tests can substitute
//! a mock (always-failing, spy, canned-status) without touching the network.
//! [`HttpTransport`] is the production implementation over `reqwest`, with one
//! pooled client per configured proxy endpoint plus one for direct
//! connections, all built once at startup since the proxy list is immutable.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Proxy};
use std::collections::HashMap;
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::{Error, Result, TransportError};
use crate::proxy::ProxyList;
use crate::types::{FetchOptions, Method};

/// Raw result of one transport attempt, before status normalization
///
/// The transport reports any received HTTP response as `Ok`, whatever its
/// status; only connection-level failures become errors.
#[derive(Clone, Debug)]
pub struct TransportReply {
    /// Final URL after any redirects
    pub response_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers, ordered, duplicates preserved
    pub headers: Vec<(String, String)>,
    /// Cookies set by the response
    pub cookies: HashMap<String, String>,
    /// Raw response body
    pub body: Bytes,
}

/// One HTTP attempt against a URL, optionally through a proxy
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single request and return the raw reply
    ///
    /// `headers` is the fully resolved header set for this request; the
    /// transport applies it verbatim. A non-200 status is a normal `Ok`
    /// reply, never an error.
    async fn send(
        &self,
        method: Method,
        url: &str,
        proxy: Option<&str>,
        headers: &[(String, String)],
        options: &FetchOptions,
    ) -> std::result::Result<TransportReply, TransportError>;
}

/// Production transport over `reqwest`
pub struct HttpTransport {
    direct: Client,
    proxied: HashMap<String, Client>,
}

impl HttpTransport {
    /// Build the direct client and one client per proxy endpoint
    pub fn new(config: &HttpConfig, proxies: &ProxyList) -> Result<Self> {
        let direct = build_client(config, None)?;

        let mut proxied = HashMap::with_capacity(proxies.len());
        for endpoint in proxies.endpoints() {
            let client = build_client(config, Some(endpoint.as_str()))?;
            proxied.insert(endpoint.clone(), client);
        }

        Ok(Self { direct, proxied })
    }

    fn client_for(&self, proxy: Option<&str>) -> std::result::Result<&Client, TransportError> {
        match proxy {
            None => Ok(&self.direct),
            Some(endpoint) => self
                .proxied
                .get(endpoint)
                .ok_or_else(|| TransportError::Proxy(endpoint.to_string())),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        proxy: Option<&str>,
        headers: &[(String, String)],
        options: &FetchOptions,
    ) -> std::result::Result<TransportReply, TransportError> {
        let client = self.client_for(proxy)?;

        debug!(%method, url, proxy = proxy.unwrap_or("direct"), "Sending request");

        let mut request = client.request(method.into(), url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(query) = &options.query {
            request = request.query(query);
        }
        if let Some(json) = &options.json {
            request = request.json(json);
        }
        if let Some(form) = &options.form {
            request = request.form(form);
        }

        let response = request.send().await?;

        let response_url = response.url().to_string();
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let cookies = parse_cookies(&headers);

        let body = response.bytes().await?;

        debug!(url, status, size = body.len(), "Received reply");

        Ok(TransportReply {
            response_url,
            status,
            headers,
            cookies,
            body,
        })
    }
}

fn build_client(config: &HttpConfig, proxy: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

    if let Some(endpoint) = proxy {
        let parsed = url::Url::parse(&normalize_proxy_url(endpoint)).map_err(|e| {
            Error::config(
                format!("invalid proxy endpoint {endpoint:?}: {e}"),
                Some("proxy_file"),
            )
        })?;
        let proxy = Proxy::all(parsed).map_err(|e| {
            Error::config(
                format!("invalid proxy endpoint {endpoint:?}: {e}"),
                Some("proxy_file"),
            )
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| Error::config(format!("failed to build HTTP client: {e}"), None))
}

/// Proxy lists commonly carry bare host:port entries; reqwest needs a scheme
fn normalize_proxy_url(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

/// Extract cookies from `set-cookie` headers as name → value pairs
///
/// Attributes after the first `;` (path, expiry, flags) are dropped.
fn parse_cookies(headers: &[(String, String)]) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for (name, value) in headers {
        if !name.eq_ignore_ascii_case("set-cookie") {
            continue;
        }
        let pair = value.split(';').next().unwrap_or_default();
        if let Some((cookie_name, cookie_value)) = pair.split_once('=') {
            cookies.insert(
                cookie_name.trim().to_string(),
                cookie_value.trim().to_string(),
            );
        }
    }
    cookies
}
