// validateFASTQ records

use super::error::{DomainError, Result};
use super::flags::kbase_bool;
use super::Extra;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions the service accepts as FASTQ
pub const FASTQ_EXTENSIONS: &[&str] = &["fq", "fnq", "fastq"];

/// Input for one file of a `validateFASTQ` batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateFastqParams {
    /// Path of the file to validate, as seen by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Interleaved files skip the sequence ID checks
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub interleaved: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ValidateFastqParams {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..Default::default()
        }
    }

    /// Pre-flight check: a path with a FASTQ extension must be given
    pub fn validate(&self) -> Result<()> {
        let path = self
            .file_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DomainError::validation("No such file: None"))?;

        let is_fastq = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FASTQ_EXTENSIONS.contains(&ext))
            .unwrap_or(false);

        if !is_fastq {
            return Err(DomainError::validation(format!(
                "File {} is not a FASTQ file",
                path
            )));
        }
        Ok(())
    }
}

/// Result for one file of a `validateFASTQ` batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateFastqOutput {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub validated: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ValidateFastqOutput {
    /// `true` only when the service reported success
    pub fn is_valid(&self) -> bool {
        self.validated.unwrap_or(false)
    }
}
