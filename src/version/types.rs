//! Version identifier exchanged with the orchestrator

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Key holding the version token inside a version object
pub const VERSION_KEY: &str = "version";

/// An opaque, orchestrator-visible version: `{"version": "...", ...}`
///
/// Under the regex strategy `version` is ordered with
/// [`compare_versions`](crate::version::compare::compare_versions); under the
/// ETag strategy it is a raw header value and only equality matters.
/// Additional keys are preserved and usable as template placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Look up a field by name, `version` included
    pub fn field(&self, name: &str) -> Option<&str> {
        if name == VERSION_KEY {
            Some(&self.version)
        } else {
            self.fields.get(name).map(String::as_str)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

/// Deserialize an optional version where `null` and `{}` both mean "none".
///
/// The orchestrator sends `"version": null` on the very first check, and
/// some callers send an empty object instead.
pub fn deserialize_optional_version<'de, D>(deserializer: D) -> Result<Option<Version>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(map) if map.is_empty() => Ok(None),
        Some(map) => serde_json::from_value(serde_json::Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Envelope {
        #[serde(default, deserialize_with = "deserialize_optional_version")]
        version: Option<Version>,
    }

    #[test]
    fn version_serializes_as_flat_object() {
        let value = serde_json::to_value(Version::new("9")).unwrap();
        assert_eq!(value, json!({"version": "9"}));
    }

    #[test]
    fn version_keeps_extra_fields() {
        let version: Version =
            serde_json::from_value(json!({"version": "1.2", "arch": "amd64"})).unwrap();

        assert_eq!(version.version, "1.2");
        assert_eq!(version.field("arch"), Some("amd64"));
        assert_eq!(version.field("version"), Some("1.2"));
        assert_eq!(version.field("missing"), None);
    }

    #[test]
    fn optional_version_treats_null_missing_and_empty_as_none() {
        for input in [json!({}), json!({"version": null}), json!({"version": {}})] {
            let envelope: Envelope = serde_json::from_value(input).unwrap();
            assert_eq!(envelope.version, None);
        }
    }

    #[test]
    fn optional_version_parses_present_version() {
        let envelope: Envelope = serde_json::from_value(json!({"version": {"version": "7"}})).unwrap();
        assert_eq!(envelope.version, Some(Version::new("7")));
    }

    #[test]
    fn optional_version_rejects_object_without_version_key() {
        let result = serde_json::from_value::<Envelope>(json!({"version": {"ref": "7"}}));
        assert!(result.is_err());
    }
}
