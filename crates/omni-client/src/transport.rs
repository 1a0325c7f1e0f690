//! HTTP transport seam and the hyper-backed implementation.
//!
//! Requests and responses are plain `http` types with fully buffered
//! bodies; the API never streams.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::header::HOST;
use http::{HeaderValue, Request, Response, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tracing::debug;

/// Network-level failures. The remote service never saw a complete
/// exchange when one of these is returned.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("unsupported URL scheme in {0} (only http:// is supported)")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("connection to {address} failed: {reason}")]
    Connect { address: String, reason: String },

    #[error("HTTP exchange failed: {0}")]
    Http(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Issues one HTTP request and returns the buffered response.
///
/// `timeout` bounds the whole exchange (connect, send, read); `None` waits
/// indefinitely.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: Request<Bytes>,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send;
}

/// HTTP/1.1 over a fresh TCP connection per request.
#[derive(Debug, Clone, Default)]
pub struct HyperTransport;

impl HyperTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for HyperTransport {
    async fn send(
        &self,
        request: Request<Bytes>,
        timeout: Option<Duration>,
    ) -> Result<Response<Bytes>, TransportError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, exchange(request))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => exchange(request).await,
        }
    }
}

async fn exchange(request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
    let uri = request.uri().clone();
    if uri.scheme_str() != Some("http") {
        return Err(TransportError::UnsupportedScheme(uri.to_string()));
    }
    let host = uri
        .host()
        .ok_or_else(|| TransportError::MissingHost(uri.to_string()))?;
    let port = uri.port_u16().unwrap_or(80);
    let address = format!("{host}:{port}");

    let stream = tokio::net::TcpStream::connect((host.trim_matches(&['[', ']'][..]), port))
        .await
        .map_err(|e| TransportError::Connect {
            address: address.clone(),
            reason: e.to_string(),
        })?;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| TransportError::Http(e.to_string()))?;

    // Drive the connection in the background; it ends when the server
    // closes it after the response.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "connection closed with error");
        }
    });

    let (mut parts, body) = request.into_parts();
    parts.uri = origin_form(&uri)?;
    if !parts.headers.contains_key(HOST) {
        let host_header = HeaderValue::from_str(&address_for_host_header(&uri, host))
            .map_err(|e| TransportError::Http(e.to_string()))?;
        parts.headers.insert(HOST, host_header);
    }
    let request = Request::from_parts(parts, Full::new(body));

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| TransportError::Http(e.to_string()))?;

    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| TransportError::Http(e.to_string()))?
        .to_bytes();

    debug!(status = %parts.status, bytes = body.len(), %address, "response received");
    Ok(Response::from_parts(parts, body))
}

/// `/path?query` part of an absolute URI, as sent on the request line.
fn origin_form(uri: &Uri) -> Result<Uri, TransportError> {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    path.parse::<Uri>()
        .map_err(|e| TransportError::Http(e.to_string()))
}

fn address_for_host_header(uri: &Uri, host: &str) -> String {
    match uri.port_u16() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
