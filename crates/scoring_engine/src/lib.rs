//! Aggregation of quiz answers into an eight-function vector, four
//! dichotomy scores, a type code and a function ranking.
//!
//! Everything here is a pure function of its inputs.

pub mod aggregate;
pub mod code;
pub mod projection;
pub mod rank;

use core_types::CoreError;
use thiserror::Error;

pub use aggregate::{
    DegradedItem, ScoreMeta, ScoreResult, ScoringConfig, aggregate, positional_answers, score,
    score_positional,
};
pub use code::{TIE_MARKER, TiePolicy, TypeCode};
pub use projection::{ProjectionSource, fallback_projection, project, project_with};
pub use rank::rank_functions;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("invalid session: {0}")]
    Session(#[from] CoreError),
    #[error("unknown tie policy: {0} (expected left, right or x)")]
    InvalidTiePolicy(String),
    #[error("invalid type code: {0:?}")]
    InvalidCode(String),
}
