use chrono::{DateTime, Duration, Utc};
use core_types::{ItemSet, QuizKind, Session};
use scoring_engine::ScoreResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: Session,
    #[serde(default)]
    pub result: Option<ScoreResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session: Session, result: Option<ScoreResult>) -> Self {
        let updated_at = session.created_at;
        Self {
            session,
            result,
            note: None,
            updated_at,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.session.id.clone(),
            kind: self.session.kind,
            set: self.session.set,
            code: self.result.as_ref().map(|r| r.code.to_string()),
            created_at: self.session.created_at,
            updated_at: self.updated_at,
            note: self.note.clone(),
        }
    }

    /// Stamps `updated_at` strictly after `latest` so save order survives
    /// coarse clocks.
    pub(crate) fn stamped(mut self, latest: Option<DateTime<Utc>>) -> Self {
        let now = Utc::now();
        self.updated_at = match latest {
            Some(prev) if prev >= now => prev + Duration::microseconds(1),
            _ => now,
        };
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub kind: QuizKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<ItemSet>,
    #[serde(default)]
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
