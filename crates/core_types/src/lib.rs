//! Shared value types for the eight-function quiz: function keys and
//! vectors, dichotomies, the answer scale, items, answers and sessions.

pub mod dichotomy;
pub mod function;
pub mod item;
pub mod likert;
pub mod session;

use thiserror::Error;

pub use dichotomy::{Dichotomy, DichotomyScores};
pub use function::{FnKey, FunctionVector, ReducedKey, saturate};
pub use item::{Answer, Item, ItemSet, QuizKind, validate_selection};
pub use likert::LikertScale;
pub use session::{Session, shuffle};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("unknown function key: {0}")]
    UnknownFunction(String),
    #[error("unknown quiz kind: {0}")]
    UnknownKind(String),
    #[error("unknown item set: {0} (expected A, B or C)")]
    UnknownSet(String),
    #[error("advanced quiz requires an item set")]
    MissingSet,
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("duplicate item id: {0}")]
    DuplicateItem(String),
    #[error("item answered more than once: {0}")]
    DuplicateAnswer(String),
    #[error("invalid likert scale {min}..{max}")]
    InvalidScale { min: f64, max: f64 },
}
