// export_reads records (standard downloader input/output)

use super::error::{DomainError, Result};
use super::workspace_ref::WorkspaceRef;
use super::Extra;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportParams {
    /// Workspace reference of the reads object to package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_ref: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ExportParams {
    pub fn new(input_ref: impl Into<String>) -> Self {
        Self {
            input_ref: Some(input_ref.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.input_ref.as_deref() {
            Some(r) if !r.is_empty() => WorkspaceRef::parse_path(r).map(|_| ()),
            _ => Err(DomainError::validation("No input_ref specified")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOutput {
    /// Shock node holding the zipped export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shock_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_requires_input_ref() {
        assert!(ExportParams::new("1/2/3").validate().is_ok());
        assert_eq!(
            ExportParams::new("").validate().unwrap_err(),
            DomainError::validation("No input_ref specified")
        );
        assert_eq!(
            ExportParams::new("ws/").validate().unwrap_err(),
            DomainError::InvalidWorkspaceRef("ws/".to_string())
        );
    }

    #[test]
    fn test_params_round_trip_with_unknown_fields() {
        let mut params = ExportParams::new("my_ws/reads/2");
        params.extra.insert(
            "options".to_string(),
            json!({"compress": "zip", "include": ["fwd", "rev"]}),
        );

        let wire = serde_json::to_value(&params).unwrap();
        assert_eq!(wire["options"]["include"][1], "rev");

        let back: ExportParams = serde_json::from_value(wire).unwrap();
        assert_eq!(back, params);

        let out: ExportOutput =
            serde_json::from_value(json!({"shock_id": "node-1", "size": 12})).unwrap();
        assert_eq!(out.extra["size"], 12);
        assert_eq!(serde_json::to_value(&out).unwrap(), json!({"shock_id": "node-1", "size": 12}));
    }
}
