// status record

use super::Extra;
use serde::{Deserialize, Serialize};

/// Typed view of the service's status map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// "OK" when healthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_commit_hash: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ServiceStatus {
    pub fn is_ok(&self) -> bool {
        self.state.as_deref() == Some("OK")
    }
}
