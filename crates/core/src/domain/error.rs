// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid workspace reference: {0}")]
    InvalidWorkspaceRef(String),

    #[error("Illegal value for ternary parameter {name}: {value}. Allowed values are \"true\", \"false\", and null.")]
    IllegalTern { name: String, value: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
