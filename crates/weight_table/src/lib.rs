//! Per-item weight tables and the resolver that turns one answer into an
//! eight-function contribution.
//!
//! Three source shapes are accepted (signed vector, `A`/`B` interpolation,
//! reduced S/N/T/F) and converted once, at load time, into [`WeightEntry`].

pub mod entry;
pub mod resolve;
pub mod table;

use core_types::CoreError;
use thiserror::Error;

pub use entry::WeightEntry;
pub use resolve::{DegradedReason, Resolution, resolve, resolve_on};
pub use table::{Projection, WeightTable};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("malformed weights ({}): {reason}", .id.as_deref().unwrap_or("table"))]
    Malformed { id: Option<String>, reason: String },
    #[error("duplicate weight entry for item {0}")]
    DuplicateEntry(String),
    #[error(transparent)]
    Scale(#[from] CoreError),
}
