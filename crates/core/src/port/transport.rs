// Transport Port
// Abstraction over the HTTP POST that carries one call envelope

use crate::envelope::RequestEnvelope;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Credentials attached to a request
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Sent verbatim as the `Authorization` header value
    Token(String),
    /// HTTP Basic
    Basic { user: String, password: String },
}

// Secrets never reach logs through Debug
impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Token(_) => f.write_str("Token(<redacted>)"),
            Authorization::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Request payload
#[derive(Debug)]
pub enum RequestBody {
    /// Fully serialized JSON
    Json(Vec<u8>),
    /// JSON serialized incrementally while it is sent
    JsonStream(RequestEnvelope),
    /// `application/x-www-form-urlencoded` (auth service login)
    Form(Vec<(String, String)>),
}

/// Per-request transport settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TransportOptions {
    /// Max wait for each read from the server; `None` waits forever
    pub read_timeout: Option<Duration>,
    /// Accept any server certificate, including self-signed ones
    pub trust_all_certs: bool,
}

#[derive(Debug)]
pub struct HttpRequest {
    pub url: String,
    pub authorization: Option<Authorization>,
    pub body: RequestBody,
    pub options: TransportOptions,
}

/// Raw reply; interpreting the status is the caller's job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Transport trait
///
/// Implementations:
/// - HttpTransport (infra-http): reqwest over HTTP(S)
/// - mocks::MockTransport: scripted replies for tests
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// POST `request` and return whatever the server answered
    ///
    /// # Errors
    /// - TransportError::Connect / Tls if no exchange happened
    /// - TransportError::Timeout if a read exceeded `options.read_timeout`
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// What a mock transport saw for one request
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub authorization: Option<Authorization>,
        /// Parsed JSON body (buffered or streamed)
        pub json: Option<Value>,
        pub form: Option<Vec<(String, String)>>,
        pub streamed: bool,
        pub options: TransportOptions,
    }

    /// Mock Transport: replays queued replies in order, records every request
    #[derive(Clone, Default)]
    pub struct MockTransport {
        replies: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.push(Ok(HttpResponse::new(status, body)))
        }

        pub fn reply_json(self, status: u16, body: &Value) -> Self {
            self.reply(status, body.to_string())
        }

        pub fn fail(self, error: TransportError) -> Self {
            self.push(Err(error))
        }

        fn push(self, reply: Result<HttpResponse, TransportError>) -> Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let (json, form, streamed) = match request.body {
                RequestBody::Json(bytes) => (serde_json::from_slice(&bytes).ok(), None, false),
                RequestBody::JsonStream(envelope) => (serde_json::to_value(&envelope).ok(), None, true),
                RequestBody::Form(fields) => (None, Some(fields), false),
            };
            self.requests.lock().unwrap().push(RecordedRequest {
                url: request.url,
                authorization: request.authorization,
                json,
                form,
                streamed,
                options: request.options,
            });

            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connect("no scripted reply".to_string())))
        }
    }
}
