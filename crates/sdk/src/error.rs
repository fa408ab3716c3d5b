//! SDK Error Types

use readsutils_core::envelope::ResponseError;
use readsutils_core::port::TransportError;
use readsutils_core::{DomainError, RpcFault};
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("RPC error {0}")]
    Rpc(RpcFault),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid parameters: {0}")]
    Validation(#[from] DomainError),
}

impl SdkError {
    /// Remote fault details, if the service answered with one
    pub fn fault(&self) -> Option<&RpcFault> {
        match self {
            SdkError::Rpc(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<ResponseError> for SdkError {
    fn from(e: ResponseError) -> Self {
        match e {
            ResponseError::Fault(fault) => SdkError::Rpc(fault),
            ResponseError::Status { status, body } => {
                SdkError::Transport(TransportError::Status { status, body })
            }
            ResponseError::Decode(e) => SdkError::Decode(e.to_string()),
        }
    }
}
