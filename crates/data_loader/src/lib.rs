//! Loads item banks, weight tables and type descriptions from a data root.

pub mod catalog;
pub mod items;
pub mod source;

use core_types::{CoreError, ItemSet, QuizKind, validate_selection};
use log::debug;
use thiserror::Error;
use weight_table::WeightTable;

pub use catalog::{TypeCatalog, TypeInfo, load_type_catalog};
pub use items::{load_items, normalize_items};
pub use source::{DataSource, DirSource, MemorySource};

pub const BASIC_ITEMS: &str = "items_public_32.json";
pub const BASIC_WEIGHTS: &str = "weights/weights_32.json";
pub const TYPE_CATALOG: &str = "mapping/types.json";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("data file not found: {path}")]
    NotFound { path: String },
    #[error("malformed data in {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error(transparent)]
    Selection(#[from] CoreError),
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// Relative path of the item bank for a kind/set pair.
pub fn items_path(kind: QuizKind, set: Option<ItemSet>) -> Result<String, LoadError> {
    validate_selection(kind, set)?;
    Ok(match (kind, set) {
        (QuizKind::Advanced, Some(set)) => format!("items_public_adv_{set}.json"),
        _ => BASIC_ITEMS.to_string(),
    })
}

/// Relative path of the weight table for a kind/set pair.
pub fn weights_path(kind: QuizKind, set: Option<ItemSet>) -> Result<String, LoadError> {
    validate_selection(kind, set)?;
    Ok(match (kind, set) {
        (QuizKind::Advanced, Some(set)) => format!("weights/weights_adv_{set}.json"),
        _ => BASIC_WEIGHTS.to_string(),
    })
}

pub fn load_weights(
    source: &dyn DataSource,
    kind: QuizKind,
    set: Option<ItemSet>,
) -> Result<WeightTable, LoadError> {
    let path = weights_path(kind, set)?;
    let raw = source.read_json(&path)?;
    let table = WeightTable::from_value(&raw).map_err(|e| LoadError::Malformed {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    debug!("loaded {} weight entries from {path}", table.len());
    Ok(table)
}
