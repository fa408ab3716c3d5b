// Upload records (upload_reads, upload_reads_from_staging_area, upload_reads_from_web)
//
// All fields are optional on the wire; `validate()` runs the same argument
// rules the service applies, so callers can fail fast before a round trip.

use super::common::{SourceInfo, StrainInfo};
use super::error::{DomainError, Result};
use super::flags::kbase_bool;
use super::Extra;
use serde::{Deserialize, Serialize};

/// Input to `upload_reads`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReadsParams {
    /// Shock node holding single end, forward or interleaved reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_id: Option<String>,
    /// Local path alternative to `fwd_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub interleaved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub single_genome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub read_orientation_outward: Option<bool>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gc_content: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl UploadReadsParams {
    pub fn validate(&self) -> Result<()> {
        if !xor(is_set(&self.fwd_id), is_set(&self.fwd_file)) {
            return Err(DomainError::validation(
                "Exactly one of a file or shock id containing a forwards reads file must be specified",
            ));
        }
        check_target(self.wsid, &self.wsname, self.objid, &self.name)?;

        let shock = is_set(&self.fwd_id);
        if is_set(&self.rev_id) && is_set(&self.rev_file) {
            return Err(DomainError::validation(
                "Specified both a local file and a shock node for the reverse reads file",
            ));
        }
        if shock && is_set(&self.rev_file) {
            return Err(DomainError::validation(
                "Cannot specify a local reverse reads file with a forward reads file in shock",
            ));
        }
        if !shock && is_set(&self.rev_id) {
            return Err(DomainError::validation(
                "Cannot specify a reverse reads file in shock with a local forward reads file",
            ));
        }

        check_sequencing_tech(&self.sequencing_tech)?;
        check_insert_sizes(self.insert_size_mean, self.insert_size_std_dev)
    }
}

/// Input to `upload_reads_from_staging_area`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadStagingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_staging_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_staging_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencing_tech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub single_genome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub interleaved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub read_orientation_outward: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strain: Option<StrainInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_size_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_size_std_dev: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl UploadStagingParams {
    pub fn validate(&self) -> Result<()> {
        if !is_set(&self.fwd_staging_file_name) {
            if is_set(&self.rev_staging_file_name) {
                return Err(DomainError::validation(
                    "Specified reverse staging file but missing forward staging file",
                ));
            }
            return Err(DomainError::validation(
                "Exactly one of a file, shock id, staging file name or file url containing a forwards reads file must be specified",
            ));
        }
        check_target(self.wsid, &self.wsname, self.objid, &self.name)?;
        check_sequencing_tech(&self.sequencing_tech)?;
        check_insert_sizes(self.insert_size_mean, self.insert_size_std_dev)
    }
}

/// Input to `upload_reads_from_web`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadWebParams {
    /// One of 'Direct Download', 'FTP', 'DropBox', 'Google Drive'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Reverse reads; interleaved with the forward file on upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencing_tech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub single_genome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strain: Option<StrainInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub interleaved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
    pub read_orientation_outward: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_size_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_size_std_dev: Option<f64>,
    /// Reads object whose user-supplied metadata is copied to the new object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reads_ref: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl UploadWebParams {
    pub fn validate(&self) -> Result<()> {
        if !is_set(&self.fwd_file_url) && is_set(&self.rev_file_url) {
            return Err(DomainError::validation(
                "Specified reverse file URL but missing forward file URL",
            ));
        }
        if !(is_set(&self.fwd_file_url) && is_set(&self.download_type)) {
            return Err(DomainError::validation(
                "Both download_type and fwd_file_url must be provided",
            ));
        }
        check_target(self.wsid, &self.wsname, self.objid, &self.name)?;

        if is_set(&self.source_reads_ref) {
            let conflicting = self.fields_copied_from_source();
            if !conflicting.is_empty() {
                return Err(DomainError::validation(format!(
                    "source_reads_ref cannot be combined with: {}",
                    conflicting.join(", ")
                )));
            }
        } else {
            check_sequencing_tech(&self.sequencing_tech)?;
        }
        check_insert_sizes(self.insert_size_mean, self.insert_size_std_dev)
    }

    // Fields the service takes from `source_reads_ref` instead
    fn fields_copied_from_source(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.insert_size_mean.is_some() {
            set.push("insert_size_mean");
        }
        if self.insert_size_std_dev.is_some() {
            set.push("insert_size_std_dev");
        }
        if self.sequencing_tech.is_some() {
            set.push("sequencing_tech");
        }
        if self.read_orientation_outward.is_some() {
            set.push("read_orientation_outward");
        }
        if self.strain.is_some() {
            set.push("strain");
        }
        if self.source.is_some() {
            set.push("source");
        }
        if self.single_genome.is_some() {
            set.push("single_genome");
        }
        set
    }
}

/// Output of every upload function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReadsOutput {
    /// `X/Y/Z` reference to the saved workspace object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj_ref: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Shared argument rules
// ============================================================================

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn is_set_id(value: Option<i64>) -> bool {
    value.is_some_and(|v| v != 0)
}

fn xor(a: bool, b: bool) -> bool {
    a != b
}

fn check_target(
    wsid: Option<i64>,
    wsname: &Option<String>,
    objid: Option<i64>,
    name: &Option<String>,
) -> Result<()> {
    if !xor(is_set_id(wsid), is_set(wsname)) {
        return Err(DomainError::validation(
            "Exactly one of the workspace ID or name must be provided",
        ));
    }
    if !xor(is_set_id(objid), is_set(name)) {
        return Err(DomainError::validation(
            "Exactly one of the object ID or name must be provided",
        ));
    }
    Ok(())
}

fn check_sequencing_tech(tech: &Option<String>) -> Result<()> {
    if !is_set(tech) {
        return Err(DomainError::validation(
            "The sequencing technology must be provided",
        ));
    }
    Ok(())
}

fn check_insert_sizes(mean: Option<f64>, std_dev: Option<f64>) -> Result<()> {
    for (value, name) in [(mean, "insert_size_mean"), (std_dev, "insert_size_std_dev")] {
        if let Some(v) = value {
            if v <= 0.0 {
                return Err(DomainError::validation(format!("{} must be > 0", name)));
            }
        }
    }
    Ok(())
}
