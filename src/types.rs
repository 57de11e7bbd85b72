//! Core types: request methods, fetch options, and the uniform response record

use bytes::Bytes;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Supported HTTP request methods
///
/// The set is closed: anything outside get/post/put/patch/options is rejected
/// at the API boundary before any network interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP OPTIONS
    Options,
}

impl Method {
    /// Parse a method string with a case-sensitive exact match
    ///
    /// Returns [`Error::UnsupportedMethod`] for anything outside the closed
    /// set, including uppercase spellings.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "options" => Ok(Method::Options),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }

    /// Canonical lowercase name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Options => "options",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request options forwarded to the transport
///
/// `headers`, when set, fully replaces the client's default header set — there
/// is no merge.
#[derive(Clone, Debug, Default)]
pub struct FetchOptions {
    /// Replacement header set (None = use the client defaults)
    pub headers: Option<Vec<(String, String)>>,

    /// Query string parameters appended to the URL
    pub query: Option<Vec<(String, String)>>,

    /// JSON request body
    pub json: Option<serde_json::Value>,

    /// URL-encoded form request body
    pub form: Option<Vec<(String, String)>>,
}

/// Response body content
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Raw response bytes
    Bytes(Bytes),
    /// Structured JSON value decoded from the body
    Json(serde_json::Value),
}

/// Uniform record for one completed request
///
/// `content` is populated only when the remote answered with status 200; for
/// every other status the metadata fields are still filled in but the body is
/// absent. A `status_code` of 0 marks a request that never completed and was
/// converted into a record instead of an error (see [`Response::unreachable`]).
#[derive(Clone, Debug)]
pub struct Response {
    /// The originally requested address
    pub request_url: String,

    /// The final address after any redirects
    pub response_url: String,

    /// Response headers, ordered, duplicates preserved
    pub headers: Vec<(String, String)>,

    /// Cookies set by the response
    pub cookies: HashMap<String, String>,

    /// HTTP status code (0 = request never completed)
    pub status_code: u16,

    /// Body content; present only for status 200
    pub content: Option<Content>,
}

impl Response {
    /// True when the remote answered with status 200
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Sentinel record for a request that never completed
    ///
    /// Callers that prefer uniform records over tagged errors can map an
    /// `Err` wave outcome through this.
    pub fn unreachable(request_url: impl Into<String>) -> Self {
        let request_url = request_url.into();
        Self {
            response_url: request_url.clone(),
            request_url,
            headers: Vec::new(),
            cookies: HashMap::new(),
            status_code: 0,
            content: None,
        }
    }
}

/// Tagged per-item result carried in a wave emission
///
/// One URL's terminal failure (retries exhausted, proxy misconfiguration) does
/// not abort its wave siblings; it shows up as that item's `Err` entry.
pub type FetchOutcome = Result<Response>;
