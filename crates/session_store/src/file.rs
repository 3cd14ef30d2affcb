use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{SessionRecord, SessionStore, SessionSummary, StoreError, sort_summaries, validate_id};

/// Bump when the on-disk layout changes; older indexes are rebuilt from the
/// session files.
pub const INDEX_VERSION: u32 = 1;

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Serialize, Deserialize)]
struct Index {
    version: u32,
    sessions: Vec<SessionSummary>,
}

/// One `session_<id>.json` per record plus an `index.json` of summaries.
#[derive(Debug)]
pub struct FileSessionStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("session_{id}.json"))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn read_record(&self, path: &Path) -> Result<Option<SessionRecord>, StoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(path, e)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    fn read_index(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let path = self.index_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&path, e)),
        };
        match serde_json::from_str::<Index>(&raw) {
            Ok(index) if index.version == INDEX_VERSION => Ok(index.sessions),
            Ok(index) => {
                warn!(
                    "session index version {} != {INDEX_VERSION}, rebuilding",
                    index.version
                );
                self.rebuild_index()
            }
            Err(e) => {
                warn!("unreadable session index ({e}), rebuilding");
                self.rebuild_index()
            }
        }
    }

    fn write_index(&self, sessions: Vec<SessionSummary>) -> Result<(), StoreError> {
        let path = self.index_path();
        let index = Index {
            version: INDEX_VERSION,
            sessions,
        };
        write_json(&path, &index)
    }

    fn rebuild_index(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e))?;
        let mut sessions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.root, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !(name.starts_with("session_") && name.ends_with(".json")) {
                continue;
            }
            match self.read_record(&entry.path()) {
                Ok(Some(record)) => sessions.push(record.summary()),
                Ok(None) => {}
                Err(e) => warn!("skipping {name} while rebuilding index: {e}"),
            }
        }
        sort_summaries(&mut sessions);
        self.write_index(sessions.clone())?;
        debug!("rebuilt session index with {} entries", sessions.len());
        Ok(sessions)
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        validate_id(record.id())?;
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut sessions = self.read_index()?;
        let latest = sessions.iter().map(|s| s.updated_at).max();
        let record = record.stamped(latest);

        write_json(&self.record_path(record.id()), &record)?;
        sessions.retain(|s| s.id != record.id());
        sessions.insert(0, record.summary());
        self.write_index(sessions)?;
        debug!("saved session {}", record.id());
        Ok(record)
    }

    fn load(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        validate_id(id)?;
        self.read_record(&self.record_path(id))
    }

    fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut sessions = self.read_index()?;
        sort_summaries(&mut sessions);
        Ok(sessions)
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        validate_id(id)?;
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let path = self.record_path(id);
        let existed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(io_error(&path, e)),
        };
        let mut sessions = self.read_index()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() != before {
            self.write_index(sessions)?;
        }
        Ok(existed)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    fs::write(path, raw).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
