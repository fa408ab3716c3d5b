// Shared descriptive records (organism strain, data source, sampling location)

use super::Extra;
use serde::{Deserialize, Serialize};

/// Information about the source of a piece of data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Name of the source (e.g. NCBI, JGI, Swiss-Prot)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A sampling location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Decimal latitude, north positive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Decimal longitude, west positive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Meters above sea level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// `YYYY-MM-DDThh:mm:ss.SSSZ`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Information about a sequenced strain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrainInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genetic_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strain: Option<String>,
    /// Organelle of interest (e.g. mitochondria)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organelle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncbi_taxid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strain_nested_records_keep_unknown_fields() {
        let raw = json!({
            "genus": "Escherichia",
            "species": "coli",
            "ncbi_taxid": 562,
            "location": {
                "lat": 41.8,
                "lon": 87.6,
                "source": {"source": "NCBI", "curator": "someone"},
                "depth_m": 3.5
            },
            "serotype": "O157:H7"
        });

        let strain: StrainInfo = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(strain.genus.as_deref(), Some("Escherichia"));
        assert_eq!(strain.extra["serotype"], "O157:H7");

        let location = strain.location.as_ref().unwrap();
        assert_eq!(location.extra["depth_m"], 3.5);
        assert_eq!(
            location.source.as_ref().unwrap().extra["curator"],
            "someone"
        );

        assert_eq!(serde_json::to_value(&strain).unwrap(), raw);
    }
}
