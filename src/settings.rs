//! The settings document stored in each profile.
//!
//! Only `permissions.allow` is understood here; every other key is carried
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub permissions: Permissions,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    /// Ordered allow-list of tool permission rules
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Document written into a freshly created profile
    pub fn default_document() -> serde_json::Result<String> {
        let mut doc = serde_json::to_string_pretty(&Settings::default())?;
        doc.push('\n');
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_document_shape() {
        let doc = Settings::default_document().unwrap();
        let value: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value, json!({"permissions": {"allow": []}}));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let doc = r#"{"model":"opus","permissions":{"allow":["Bash(ls)"],"deny":["Read(.env)"]}}"#;
        let settings = Settings::parse(doc).unwrap();
        assert_eq!(settings.permissions.allow, vec!["Bash(ls)"]);
        assert_eq!(settings.extra.get("model"), Some(&json!("opus")));

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["permissions"]["deny"], json!(["Read(.env)"]));
    }

    #[test]
    fn test_missing_permissions_defaults_empty() {
        let settings = Settings::parse("{}").unwrap();
        assert!(settings.permissions.allow.is_empty());
    }
}
