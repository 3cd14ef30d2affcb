use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{SessionRecord, SessionStore, SessionSummary, StoreError, sort_summaries, validate_id};

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<BTreeMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn save(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        validate_id(record.id())?;
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let latest = guard.values().map(|r| r.updated_at).max();
        let record = record.stamped(latest);
        guard.insert(record.id().to_string(), record.clone());
        Ok(record)
    }

    fn load(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut out = guard.values().map(SessionRecord::summary).collect::<Vec<_>>();
        sort_summaries(&mut out);
        Ok(out)
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use core_types::{Item, QuizKind, Session};

    use super::InMemorySessionStore;
    use crate::{SessionRecord, SessionStore};

    fn record(note: &str) -> SessionRecord {
        let items = vec![Item {
            id: "S1".to_string(),
            stem: "I notice details".to_string(),
            options: None,
        }];
        let session = Session::start(QuizKind::Basic, None, items, 0).expect("session");
        SessionRecord::new(session, None).with_note(note)
    }

    #[test]
    fn in_memory_store_roundtrip() {
        let store = InMemorySessionStore::new();
        let saved = store.save(record("first")).expect("save");
        let out = store.load(saved.id()).expect("load");
        assert_eq!(out.as_ref().and_then(|r| r.note.as_deref()), Some("first"));
        assert_eq!(store.list().expect("list").len(), 1);
        assert!(store.remove(saved.id()).expect("remove"));
        assert!(!store.remove(saved.id()).expect("remove again"));
        assert!(store.load(saved.id()).expect("load").is_none());
    }

    #[test]
    fn resaving_moves_record_to_front() {
        let store = InMemorySessionStore::new();
        let a = store.save(record("a")).expect("a");
        let b = store.save(record("b")).expect("b");
        assert!(b.updated_at > a.updated_at);
        let ids = |s: &InMemorySessionStore| {
            s.list()
                .expect("list")
                .into_iter()
                .map(|x| x.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&store), vec![b.id().to_string(), a.id().to_string()]);

        store.save(a.clone()).expect("resave");
        assert_eq!(ids(&store), vec![a.id().to_string(), b.id().to_string()]);
    }
}
