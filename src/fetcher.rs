//! Single-attempt fetch: header resolution and status normalization
//!
//! One call here is one transport attempt. The retry driver in
//! [`crate::retry`] wraps this; the wave coordinator in [`crate::client`]
//! fans it out.

use crate::error::Result;
use crate::transport::Transport;
use crate::types::{Content, FetchOptions, Method, Response};

/// Perform one attempt and normalize the reply into a [`Response`]
///
/// Caller-supplied headers fully replace the client defaults. A status of
/// exactly 200 gets its body attached (decoded as JSON when `decode_json`);
/// any other status produces the same metadata with no content and is a
/// normal outcome, not a failure.
pub(crate) async fn fetch_once(
    transport: &dyn Transport,
    default_headers: &[(String, String)],
    url: &str,
    method: Method,
    decode_json: bool,
    proxy: Option<&str>,
    options: &FetchOptions,
) -> Result<Response> {
    let headers = options.headers.as_deref().unwrap_or(default_headers);

    let reply = transport.send(method, url, proxy, headers, options).await?;

    let content = if reply.status == 200 {
        Some(if decode_json {
            Content::Json(serde_json::from_slice(&reply.body)?)
        } else {
            Content::Bytes(reply.body)
        })
    } else {
        None
    };

    Ok(Response {
        request_url: url.to_string(),
        response_url: reply.response_url,
        headers: reply.headers,
        cookies: reply.cookies,
        status_code: reply.status,
        content,
    })
}
