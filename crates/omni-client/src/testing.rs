//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Response};
use omni_core::OmniConfig;

use crate::transport::{Transport, TransportError};
use crate::wire::Endpoint;

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Option<Duration>,
}

enum Reply {
    Respond(u16, Bytes),
    ConnectFailure,
}

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
        self.reply_raw(status, body.to_string().as_bytes())
    }

    pub fn reply_raw(self, status: u16, body: &[u8]) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Respond(status, Bytes::copy_from_slice(body)));
        self
    }

    pub fn fail_connect(self) -> Self {
        self.replies.lock().unwrap().push_back(Reply::ConnectFailure);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn send(
        &self,
        request: Request<Bytes>,
        timeout: Option<Duration>,
    ) -> Result<Response<Bytes>, TransportError> {
        let (parts, body) = request.into_parts();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
            timeout,
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Respond(status, body)) => Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(body)
                .unwrap()),
            Some(Reply::ConnectFailure) | None => Err(TransportError::Connect {
                address: "mock".to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

pub fn config() -> OmniConfig {
    OmniConfig::new("http://omni:8080/objectserver/restapi", "root", "secret")
        .with_timeout(Duration::from_secs(5))
}

pub fn endpoint() -> Endpoint {
    Endpoint::new(&config()).unwrap()
}
