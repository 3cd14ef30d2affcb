use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// A forced-choice question. `options` holds the two pole labels when the
/// source provides them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub stem: String,
    #[serde(default)]
    pub options: Option<[String; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub value: f64,
}

impl Answer {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Float(f) => f.to_string(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    Basic,
    Advanced,
}

impl QuizKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizKind::Basic => "basic",
            QuizKind::Advanced => "advanced",
        }
    }
}

impl Display for QuizKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(QuizKind::Basic),
            "advanced" | "adv" => Ok(QuizKind::Advanced),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

/// Advanced item group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemSet {
    A,
    B,
    C,
}

impl ItemSet {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemSet::A => "A",
            ItemSet::B => "B",
            ItemSet::C => "C",
        }
    }
}

impl Display for ItemSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemSet {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(ItemSet::A),
            "B" => Ok(ItemSet::B),
            "C" => Ok(ItemSet::C),
            other => Err(CoreError::UnknownSet(other.to_string())),
        }
    }
}

/// Checks that a kind/set pair names a real item bank.
pub fn validate_selection(kind: QuizKind, set: Option<ItemSet>) -> Result<(), CoreError> {
    match (kind, set) {
        (QuizKind::Advanced, None) => Err(CoreError::MissingSet),
        _ => Ok(()),
    }
}
