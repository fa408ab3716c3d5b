//! Tri-state flags
//!
//! The service uses two encodings for "unset / true / false":
//! - `tern`: the strings `"true"` / `"false"`, absent or `null` when unset
//! - `boolean`: the integers `1` / `0`, absent when unset
//!
//! Both are kept as `Option<_>` so "unset" never collapses into `false`.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ternary flag (`"true"` / `"false"`); wrap in `Option` for the unset state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tern {
    True,
    False,
}

impl fmt::Display for Tern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tern::True => write!(f, "true"),
            Tern::False => write!(f, "false"),
        }
    }
}

impl FromStr for Tern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(Tern::True),
            "false" => Ok(Tern::False),
            other => Err(DomainError::IllegalTern {
                name: "tern".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Serde adapter for `Option<bool>` stored as a `0`/`1` integer.
///
/// Accepts JSON booleans on input as well; always writes integers.
pub mod kbase_bool {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(flag) => serializer.serialize_i64(i64::from(*flag)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Bool(flag)) => Ok(Some(flag)),
            Some(Raw::Int(0)) => Ok(Some(false)),
            Some(Raw::Int(1)) => Ok(Some(true)),
            Some(Raw::Int(other)) => Err(D::Error::custom(format!(
                "boolean flag must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Flags {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tern: Option<Tern>,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "kbase_bool")]
        flag: Option<bool>,
    }

    #[test]
    fn test_tern_wire_values() {
        let flags: Flags = serde_json::from_value(json!({"tern": "false"})).unwrap();
        assert_eq!(flags.tern, Some(Tern::False));

        let flags: Flags = serde_json::from_value(json!({"tern": null})).unwrap();
        assert_eq!(flags.tern, None);

        assert!(serde_json::from_value::<Flags>(json!({"tern": "maybe"})).is_err());
    }

    #[test]
    fn test_kbase_bool_three_states() {
        let unset: Flags = serde_json::from_value(json!({})).unwrap();
        let off: Flags = serde_json::from_value(json!({"flag": 0})).unwrap();
        let on: Flags = serde_json::from_value(json!({"flag": 1})).unwrap();

        assert_eq!(unset.flag, None);
        assert_eq!(off.flag, Some(false));
        assert_eq!(on.flag, Some(true));

        assert_eq!(serde_json::to_value(&off).unwrap(), json!({"flag": 0}));
        assert_eq!(serde_json::to_value(&unset).unwrap(), json!({}));
    }

    #[test]
    fn test_kbase_bool_accepts_json_bool_and_rejects_out_of_range() {
        let on: Flags = serde_json::from_value(json!({"flag": true})).unwrap();
        assert_eq!(on.flag, Some(true));
        assert_eq!(serde_json::to_value(&on).unwrap(), json!({"flag": 1}));

        let err = serde_json::from_value::<Flags>(json!({"flag": 2})).unwrap_err();
        assert!(err.to_string().contains("0 or 1"));
    }

    #[test]
    fn test_tern_from_str() {
        assert_eq!("true".parse::<Tern>().unwrap(), Tern::True);
        assert_eq!(Tern::False.to_string(), "false");

        let err = "yes".parse::<Tern>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Illegal value for ternary parameter tern: yes. Allowed values are \"true\", \"false\", and null."
        );
    }
}
