//! Persistence for quiz sessions and their scored results.

mod file;
mod memory;
mod record;

use thiserror::Error;

pub use file::{FileSessionStore, INDEX_VERSION};
pub use memory::InMemorySessionStore;
pub use record::{SessionRecord, SessionSummary};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("invalid session id: {0:?}")]
    InvalidId(String),
    #[error("store io failed for {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("corrupt store file {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("session store lock poisoned")]
    Poisoned,
}

pub trait SessionStore: Send + Sync {
    /// Writes the record, stamping `updated_at`, and returns what was stored.
    fn save(&self, record: SessionRecord) -> Result<SessionRecord, StoreError>;
    fn load(&self, id: &str) -> Result<Option<SessionRecord>, StoreError>;
    /// Summaries, most recently updated first.
    fn list(&self) -> Result<Vec<SessionSummary>, StoreError>;
    /// Returns whether a record existed.
    fn remove(&self, id: &str) -> Result<bool, StoreError>;
}

/// Ids end up in file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

pub(crate) fn sort_summaries(summaries: &mut [SessionSummary]) {
    summaries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::validate_id;

    #[test]
    fn ids_are_restricted_to_file_safe_characters() {
        assert!(validate_id("3f2a-11_b").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("../index").is_err());
        assert!(validate_id("a b").is_err());
    }
}
