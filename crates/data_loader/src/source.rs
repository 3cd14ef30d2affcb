use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::LoadError;

/// Where quiz data comes from. Paths are relative to the source root and use `/`.
pub trait DataSource: Send + Sync {
    fn read_json(&self, rel_path: &str) -> Result<Value, LoadError>;

    fn read_optional(&self, rel_path: &str) -> Result<Option<Value>, LoadError> {
        match self.read_json(rel_path) {
            Ok(value) => Ok(Some(value)),
            Err(LoadError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A single data directory. Nothing outside `root` is probed.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, rel_path: &str) -> PathBuf {
        rel_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl DataSource for DirSource {
    fn read_json(&self, rel_path: &str) -> Result<Value, LoadError> {
        let path = self.resolve(rel_path);
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: path.display().to_string(),
            },
            _ => LoadError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;
        serde_json::from_str(&raw).map_err(|e| LoadError::Malformed {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }
}

/// Relative path to JSON document, for tests and embedded data.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel_path: impl Into<String>, value: Value) -> Self {
        self.insert(rel_path, value);
        self
    }

    pub fn insert(&mut self, rel_path: impl Into<String>, value: Value) {
        self.files.insert(rel_path.into(), value);
    }
}

impl DataSource for MemorySource {
    fn read_json(&self, rel_path: &str) -> Result<Value, LoadError> {
        self.files
            .get(rel_path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: rel_path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde_json::json;

    use super::{DataSource, DirSource, MemorySource};
    use crate::LoadError;

    fn temp_root(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "data_loader_{tag}_{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ))
    }

    #[test]
    fn dir_source_reads_nested_files() {
        let root = temp_root("nested");
        fs::create_dir_all(root.join("weights")).expect("mkdir");
        fs::write(root.join("weights").join("weights_32.json"), r#"{"S01": {"S": 1}}"#)
            .expect("write");
        fs::write(root.join("broken.json"), "{not json").expect("write");

        let source = DirSource::new(&root);
        let value = source.read_json("weights/weights_32.json").expect("read");
        assert_eq!(value["S01"]["S"], 1);
        assert!(matches!(
            source.read_json("broken.json"),
            Err(LoadError::Malformed { .. })
        ));
        assert!(source.read_json("missing.json").expect_err("missing").is_not_found());
        assert_eq!(source.read_optional("missing.json").expect("optional"), None);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn memory_source_serves_inserted_documents() {
        let source = MemorySource::new().with("mapping/types.json", json!({}));
        assert_eq!(source.read_json("mapping/types.json").expect("read"), json!({}));
        assert!(source.read_json("items_public_32.json").is_err());
    }
}
