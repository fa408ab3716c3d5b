// HTTP Transport Adapter
// reqwest implementation of RpcTransport

use crate::streaming;
use async_trait::async_trait;
use readsutils_core::port::{
    Authorization, HttpRequest, HttpResponse, RequestBody, RpcTransport, TransportError,
    TransportOptions,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::collections::HashMap;
use std::error::Error as StdError;
use tokio::sync::Mutex;

const DEFAULT_USER_AGENT: &str = concat!("readsutils-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP(S) transport backed by reqwest
///
/// One `reqwest::Client` (and its connection pool) is kept per distinct
/// `TransportOptions`, built on first use.
pub struct HttpTransport {
    clients: Mutex<HashMap<TransportOptions, reqwest::Client>>,
    user_agent: String,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            user_agent: user_agent.into(),
        }
    }

    async fn client_for(&self, options: TransportOptions) -> Result<reqwest::Client, TransportError> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&options) {
            return Ok(client.clone());
        }

        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = options.read_timeout {
            builder = builder.read_timeout(timeout);
        }
        if options.trust_all_certs {
            tracing::warn!("Server certificate validation disabled");
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Tls(format!("Failed to build HTTP client: {}", e)))?;
        clients.insert(options, client.clone());
        Ok(client)
    }

    #[cfg(test)]
    async fn cached_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = self.client_for(request.options).await?;
        let mut builder = client.post(&request.url);

        builder = match request.authorization {
            Some(Authorization::Token(token)) => builder.header(AUTHORIZATION, token),
            Some(Authorization::Basic { user, password }) => {
                builder.basic_auth(user, Some(password))
            }
            None => builder,
        };

        builder = match request.body {
            RequestBody::Json(bytes) => {
                tracing::debug!(url = %request.url, bytes = bytes.len(), "POST buffered body");
                builder.header(CONTENT_TYPE, "application/json").body(bytes)
            }
            RequestBody::JsonStream(envelope) => {
                tracing::debug!(url = %request.url, method = %envelope.method, "POST streamed body");
                builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(streaming::envelope_body(envelope))
            }
            RequestBody::Form(fields) => {
                tracing::debug!(url = %request.url, "POST form body");
                builder.form(&fields)
            }
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        tracing::debug!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Map a reqwest failure onto the transport error taxonomy
fn classify(error: reqwest::Error) -> TransportError {
    let detail = error_chain(&error);

    if error.is_timeout() {
        TransportError::Timeout(detail)
    } else if error.is_builder() {
        TransportError::InvalidRequest(detail)
    } else if error.is_connect() {
        if mentions_tls(&detail) {
            TransportError::Tls(detail)
        } else {
            TransportError::Connect(detail)
        }
    } else {
        TransportError::Io(detail)
    }
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn mentions_tls(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| lower.contains(needle))
}
