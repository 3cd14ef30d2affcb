use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DataSource, LoadError, TYPE_CATALOG};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TypeInfo {
    /// Description if present, otherwise the title.
    pub fn summary(&self) -> Option<&str> {
        self.description.as_deref().or(self.title.as_deref())
    }
}

/// Type descriptions keyed by upper-case four-letter code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCatalog {
    types: BTreeMap<String, TypeInfo>,
}

impl TypeCatalog {
    pub fn from_value(raw: &Value) -> Self {
        let mut types = BTreeMap::new();
        let Value::Object(obj) = raw else {
            debug!("type catalog is not an object, ignoring");
            return Self { types };
        };
        for (code, entry) in obj {
            let info = match entry {
                Value::String(s) => TypeInfo {
                    title: None,
                    description: Some(s.trim().to_string()),
                },
                Value::Object(fields) => {
                    let text = |key: &str| {
                        fields
                            .get(key)
                            .and_then(Value::as_str)
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                    };
                    TypeInfo {
                        title: text("title"),
                        description: text("desc").or_else(|| text("description")),
                    }
                }
                _ => continue,
            };
            types.insert(code.trim().to_ascii_uppercase(), info);
        }
        Self { types }
    }

    pub fn get(&self, code: &str) -> Option<&TypeInfo> {
        self.types.get(&code.to_ascii_uppercase())
    }

    pub fn describe(&self, code: &str) -> Option<&str> {
        self.get(code).and_then(TypeInfo::summary)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A missing catalog file is an empty catalog.
pub fn load_type_catalog(source: &dyn DataSource) -> Result<TypeCatalog, LoadError> {
    Ok(source
        .read_optional(TYPE_CATALOG)?
        .map(|raw| TypeCatalog::from_value(&raw))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{TypeCatalog, load_type_catalog};
    use crate::MemorySource;

    #[test]
    fn descriptions_prefer_desc_then_description_then_title() {
        let catalog = TypeCatalog::from_value(&json!({
            "INTJ": {"title": "Architect", "desc": "Plans", "description": "Long"},
            "enfp": {"title": "Campaigner", "description": "Enthusiast"},
            "ISTP": {"title": "Virtuoso"},
            "ESFJ": "Consul",
            "XXXX": 3
        }));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.describe("intj"), Some("Plans"));
        assert_eq!(catalog.describe("ENFP"), Some("Enthusiast"));
        assert_eq!(catalog.describe("ISTP"), Some("Virtuoso"));
        assert_eq!(catalog.describe("ESFJ"), Some("Consul"));
        assert_eq!(catalog.describe("INFP"), None);
    }

    #[test]
    fn missing_catalog_is_empty() {
        let catalog = load_type_catalog(&MemorySource::new()).expect("catalog");
        assert!(catalog.is_empty());
    }
}
