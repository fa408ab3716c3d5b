// download_reads records

use super::common::{SourceInfo, StrainInfo};
use super::error::{DomainError, Result};
use super::flags::Tern;
use super::workspace_ref::WorkspaceRef;
use super::Extra;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Input to `download_reads`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadReadsParams {
    /// Workspace references of the read libraries (absolute refs preferred)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_libraries: Option<Vec<String>>,
    /// `true`: interleave paired files; `false`: split them; unset: leave as is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interleaved: Option<Tern>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl DownloadReadsParams {
    pub fn new<I, S>(read_libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            read_libraries: Some(read_libraries.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_read_libraries(self.read_libraries.as_deref())
    }
}

pub(crate) fn check_read_libraries(libs: Option<&[String]>) -> Result<()> {
    let libs =
        libs.ok_or_else(|| DomainError::validation("read_libraries parameter is required"))?;
    if libs.is_empty() {
        return Err(DomainError::validation(
            "At least one reads library must be provided",
        ));
    }
    for lib in libs {
        WorkspaceRef::parse_path(lib)?;
    }
    Ok(())
}

/// Layout of a set of reads files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadsType {
    Single,
    Paired,
    Interleaved,
}

impl ReadsType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(ReadsType::Single),
            "paired" => Some(ReadsType::Paired),
            "interleaved" => Some(ReadsType::Interleaved),
            _ => None,
        }
    }
}

impl fmt::Display for ReadsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadsType::Single => write!(f, "single"),
            ReadsType::Paired => write!(f, "paired"),
            ReadsType::Interleaved => write!(f, "interleaved"),
        }
    }
}

/// Reads file information.
///
/// File names are those *prior to* any interleaving or deinterleaving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadsFiles {
    /// Path to the forward / left reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_name: Option<String>,
    /// `None` for single end or interleaved reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_name: Option<String>,
    /// Original layout before conversion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otype: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ReadsFiles {
    /// Layout of the files as delivered; `None` if absent or unrecognized
    pub fn reads_type(&self) -> Option<ReadsType> {
        self.type_.as_deref().and_then(ReadsType::parse)
    }
}

/// Information about each downloaded set of reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadedReadLibrary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<ReadsFiles>,
    /// Absolute reference, `workspace_id/object_id/version`
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_genome: Option<Tern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_orientation_outward: Option<Tern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencing_tech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strain: Option<StrainInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_size_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_size_std_dev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_count: Option<i64>,
    /// Expected read length (total of both reads for paired end)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gc_content: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bases: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_length_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_length_stdev: Option<f64>,
    /// "33" or "64"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phred_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_duplicates: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qual_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qual_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qual_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qual_stdev: Option<f64>,
    /// Percentage of total bases per nucleotide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_percentages: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Output of `download_reads`, keyed by the requested read library reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadReadsOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, DownloadedReadLibrary>>,
    #[serde(flatten)]
    pub extra: Extra,
}
