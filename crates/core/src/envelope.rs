//! JSON-RPC 1.1 Call Envelope
//!
//! Request: `{"method": "ReadsUtils.<fn>", "params": [..], "version": "1.1", "id": "..", "context": {..}}`
//! Response: `{"result": [<value>]}` on success, `{"error": {..}}` on fault.

use crate::domain::Extra;
use crate::SERVICE_NAME;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "1.1";

/// Longest body excerpt kept in status errors
const BODY_EXCERPT_LEN: usize = 512;

// ============================================================================
// Request
// ============================================================================

/// One outgoing call. Built fresh per invocation, never mutated after send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub method: String,
    pub params: Vec<Value>,
    pub version: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RpcContext>,
}

impl RequestEnvelope {
    /// `function` is the bare remote name, e.g. `upload_reads`
    pub fn new(function: &str, params: Vec<Value>, id: impl Into<String>) -> Self {
        Self {
            method: format!("{}.{}", SERVICE_NAME, function),
            params,
            version: JSONRPC_VERSION.to_string(),
            id: id.into(),
            context: None,
        }
    }

    /// Attach the caller's context and the pinned service version.
    ///
    /// A version already present in `context` wins over `service_ver`.
    /// Nothing is attached when the merged context is empty.
    pub fn with_context(mut self, context: Option<RpcContext>, service_ver: Option<&str>) -> Self {
        let mut merged = context.unwrap_or_default();
        if merged.service_ver.is_none() {
            merged.service_ver = service_ver.map(str::to_string);
        }
        self.context = if merged.is_empty() { None } else { Some(merged) };
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Per-call metadata forwarded to the service (call stack, provenance)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_stack: Option<Vec<CallStackEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ver: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl RpcContext {
    pub fn is_empty(&self) -> bool {
        self.call_stack.is_none()
            && self.run_id.is_none()
            && self.provenance.is_none()
            && self.service_ver.is_none()
            && self.extra.is_empty()
    }

    /// Record that `method` is being called now
    pub fn push_call(&mut self, method: impl Into<String>) {
        self.call_stack
            .get_or_insert_with(Vec::new)
            .push(CallStackEntry::now(method));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallStackEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// RFC 3339, millisecond precision, UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CallStackEntry {
    pub fn now(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            time: Some(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
            extra: Extra::new(),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Structured fault returned by the service
#[derive(Debug, Clone, PartialEq)]
pub struct RpcFault {
    pub code: i64,
    pub message: String,
    /// e.g. "JSONRPCError", "Server error"
    pub name: Option<String>,
    /// Remote stack trace
    pub trace: Option<String>,
    pub extra: Extra,
}

impl RpcFault {
    /// Lenient conversion: any JSON in the `error` slot is a fault
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let code = map.remove("code").and_then(|c| c.as_i64()).unwrap_or(0);
                let message = map
                    .remove("message")
                    .map(value_to_text)
                    .unwrap_or_default();
                let name = map.remove("name").map(value_to_text);
                let trace = map
                    .remove("error")
                    .filter(|v| !v.is_null())
                    .or_else(|| map.remove("data").filter(|v| !v.is_null()))
                    .map(value_to_text);
                Self {
                    code,
                    message,
                    name,
                    trace,
                    extra: map,
                }
            }
            other => Self {
                code: 0,
                message: value_to_text(other),
                name: None,
                trace: None,
                extra: Extra::new(),
            },
        }
    }
}

impl std::fmt::Display for RpcFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({}): {}", name, self.code, self.message),
            None => write!(f, "({}): {}", self.code, self.message),
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Response body did not match the JSON-RPC / schema shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed response body: {0}")]
    Malformed(String),

    #[error("Response has neither result nor error")]
    MissingResult,

    #[error("Result is not an array")]
    ResultNotArray,

    #[error("Expected exactly one result value, got {0}")]
    ResultArity(usize),

    #[error("Result does not match the declared type: {0}")]
    Schema(String),
}

/// Failure outcomes of decoding one HTTP reply
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error("RPC fault {0}")]
    Fault(RpcFault),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Unwrap the single positional result of a reply.
///
/// A JSON body carrying a non-null `error` is a fault whatever the HTTP
/// status (the service answers faults with 500). A non-2xx status without a
/// JSON fault body is reported as `Status`.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ResponseError> {
    let success = (200..300).contains(&status);

    let envelope: ResponseEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) if success => return Err(DecodeError::Malformed(e.to_string()).into()),
        Err(_) => {
            return Err(ResponseError::Status {
                status,
                body: excerpt(body),
            })
        }
    };

    if let Some(error) = envelope.error.filter(|e| !e.is_null()) {
        return Err(ResponseError::Fault(RpcFault::from_value(error)));
    }

    if !success {
        return Err(ResponseError::Status {
            status,
            body: excerpt(body),
        });
    }

    let mut items = match envelope.result {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(DecodeError::ResultNotArray.into()),
        None => return Err(DecodeError::MissingResult.into()),
    };
    if items.len() != 1 {
        return Err(DecodeError::ResultArity(items.len()).into());
    }

    serde_json::from_value(items.remove(0))
        .map_err(|e| DecodeError::Schema(e.to_string()).into())
}

fn excerpt(body: &[u8]) -> String {
    let end = body.len().min(BODY_EXCERPT_LEN);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
