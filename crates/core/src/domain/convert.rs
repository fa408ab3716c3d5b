// convert_read_library_to_file records

use super::download::check_read_libraries;
use super::error::Result;
use super::flags::Tern;
use super::Extra;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input for converting read libraries to files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertReadLibraryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_libraries: Option<Vec<String>>,
    /// `true`: gzip unzipped files; `false`: gunzip zipped files; unset: leave
    /// as is unless (de)interleaving forces unzipping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip: Option<Tern>,
    /// `true`: interleave paired files; `false`: split them; unset: leave as is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interleaved: Option<Tern>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ConvertReadLibraryParams {
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

/// Converted files for one read library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertedReadLibrary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_genome: Option<Tern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_orientation_outward: Option<Tern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencing_tech: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Output of the convert method, keyed by read library reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertReadLibraryOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, ConvertedReadLibrary>>,
    #[serde(flatten)]
    pub extra: Extra,
}
