// Domain Layer - ReadsUtils records and value types

pub mod common;
pub mod convert;
pub mod download;
pub mod error;
pub mod export;
pub mod fastq;
pub mod flags;
pub mod status;
pub mod upload;
pub mod workspace_ref;

// Re-exports
pub use common::{Location, SourceInfo, StrainInfo};
pub use convert::{ConvertReadLibraryOutput, ConvertReadLibraryParams, ConvertedReadLibrary};
pub use download::{
    DownloadReadsOutput, DownloadReadsParams, DownloadedReadLibrary, ReadsFiles, ReadsType,
};
pub use error::DomainError;
pub use export::{ExportOutput, ExportParams};
pub use fastq::{ValidateFastqOutput, ValidateFastqParams};
pub use flags::Tern;
pub use status::ServiceStatus;
pub use upload::{UploadReadsOutput, UploadReadsParams, UploadStagingParams, UploadWebParams};
pub use workspace_ref::WorkspaceRef;

/// Undeclared JSON fields carried alongside the typed ones
pub type Extra = serde_json::Map<String, serde_json::Value>;
