// Workspace object references: `workspace/object[/version]`

use super::error::{DomainError, Result};
use std::fmt;
use std::str::FromStr;

/// A reference to an object in the workspace service.
///
/// Workspace and object may each be a name or a numeric id. Absolute
/// references (`ws_id/obj_id/ver`) avoid races with concurrent saves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceRef {
    pub workspace: String,
    pub object: String,
    pub version: Option<u64>,
}

impl WorkspaceRef {
    /// Parse a reference path (`a/b/c;d/e/f`), one reference per hop
    pub fn parse_path(path: &str) -> Result<Vec<WorkspaceRef>> {
        path.split(';').map(|hop| hop.trim().parse()).collect()
    }
}

impl FromStr for WorkspaceRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DomainError::InvalidWorkspaceRef(s.to_string());

        let parts: Vec<&str> = s.split('/').collect();
        if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        let version = match parts.get(2) {
            Some(v) => Some(v.parse::<u64>().map_err(|_| invalid())?),
            None => None,
        };

        Ok(Self {
            workspace: parts[0].to_string(),
            object: parts[1].to_string(),
            version,
        })
    }
}

impl fmt::Display for WorkspaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(v) => write!(f, "{}/{}/{}", self.workspace, self.object, v),
            None => write!(f, "{}/{}", self.workspace, self.object),
        }
    }
}
