use std::collections::BTreeMap;

use core_types::{Dichotomy, FunctionVector, LikertScale};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::WeightError;
use crate::entry::{WeightEntry, coerce_number, parse_entry, parse_vector};

const RESERVED_KEYS: [&str; 8] = [
    "items",
    "scale",
    "scaleMin",
    "dims",
    "dimsMatrix",
    "meta",
    "version",
    "name",
];

const ID_ALIASES: [&str; 4] = ["id", "itemId", "key", "qid"];

/// Explicit function-to-dichotomy projection, one row per dichotomy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    #[serde(rename = "EI")]
    pub ei: FunctionVector,
    #[serde(rename = "SN")]
    pub sn: FunctionVector,
    #[serde(rename = "TF")]
    pub tf: FunctionVector,
    #[serde(rename = "JP")]
    pub jp: FunctionVector,
}

impl Projection {
    pub fn row(&self, d: Dichotomy) -> &FunctionVector {
        match d {
            Dichotomy::EI => &self.ei,
            Dichotomy::SN => &self.sn,
            Dichotomy::TF => &self.tf,
            Dichotomy::JP => &self.jp,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    entries: BTreeMap<String, WeightEntry>,
    order: Vec<String>,
    scale: LikertScale,
    projection: Option<Projection>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::new(LikertScale::default())
    }
}

impl WeightTable {
    pub fn new(scale: LikertScale) -> Self {
        Self {
            entries: BTreeMap::new(),
            order: Vec::new(),
            scale,
            projection: None,
        }
    }

    pub fn with_entry(mut self, id: impl Into<String>, entry: WeightEntry) -> Self {
        self.insert(id, entry);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Replaces an existing entry in place; new ids are appended to the source order.
    pub fn insert(&mut self, id: impl Into<String>, entry: WeightEntry) {
        let id = id.into();
        if self.entries.insert(id.clone(), entry).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&WeightEntry> {
        self.entries.get(id)
    }

    pub fn scale(&self) -> LikertScale {
        self.scale
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Item ids in the order the source listed them.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, WeightError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| WeightError::Malformed {
            id: None,
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::from_value(&value)
    }

    /// Accepts `{items: [...]}`, `{items: {id: entry}}`, a bare array of
    /// entries, or an object keyed by item id.
    pub fn from_value(value: &Value) -> Result<Self, WeightError> {
        let table = match value {
            Value::Array(rows) => {
                let mut table = WeightTable::default();
                table.extend_from_rows(rows)?;
                table
            }
            Value::Object(root) => {
                let mut table = WeightTable::new(parse_scale(root)?);
                match root.get("items") {
                    Some(Value::Array(rows)) => table.extend_from_rows(rows)?,
                    Some(Value::Object(keyed)) => table.extend_from_keyed(keyed, &[])?,
                    Some(other) => {
                        return Err(WeightError::Malformed {
                            id: None,
                            reason: format!("`items` must be an array or object, got {other}"),
                        });
                    }
                    None => table.extend_from_keyed(root, &RESERVED_KEYS)?,
                }
                table.projection = parse_projection(root)?;
                table
            }
            other => {
                return Err(WeightError::Malformed {
                    id: None,
                    reason: format!("weight table must be an object or array, got {other}"),
                });
            }
        };
        Ok(table)
    }

    /// Rows without a usable shape are skipped so their items fall back to
    /// the prefix hint at resolution time.
    fn extend_from_rows(&mut self, rows: &[Value]) -> Result<(), WeightError> {
        for (idx, row) in rows.iter().enumerate() {
            let Value::Object(obj) = row else {
                warn!("weights: skipping entry #{}, not an object", idx + 1);
                continue;
            };
            let id = entry_id(obj).unwrap_or_else(|| format!("q_{}", idx + 1));
            self.insert_parsed(id, obj)?;
        }
        Ok(())
    }

    fn extend_from_keyed(
        &mut self,
        keyed: &Map<String, Value>,
        skip: &[&str],
    ) -> Result<(), WeightError> {
        for (id, row) in keyed {
            if skip.contains(&id.as_str()) {
                continue;
            }
            let Value::Object(obj) = row else {
                debug!("weights: skipping non-object top-level key {id}");
                continue;
            };
            self.insert_parsed(id.clone(), obj)?;
        }
        Ok(())
    }

    fn insert_parsed(&mut self, id: String, obj: &Map<String, Value>) -> Result<(), WeightError> {
        match parse_entry(&id, obj) {
            Ok(entry) => self.insert_unique(id, entry),
            Err(e) => {
                warn!("weights: skipping entry {id}: {e}");
                Ok(())
            }
        }
    }

    fn insert_unique(&mut self, id: String, entry: WeightEntry) -> Result<(), WeightError> {
        if self.entries.contains_key(&id) {
            return Err(WeightError::DuplicateEntry(id));
        }
        self.insert(id, entry);
        Ok(())
    }

    /// SHA-256 over the canonical entries, scale and projection.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("scale|{}|{}\n", bits(self.scale.min()), bits(self.scale.max())));
        for (id, entry) in &self.entries {
            let line = match entry {
                WeightEntry::Signed { vector } => format!("{id}|S|{}\n", vector_bits(vector)),
                WeightEntry::Interpolated { a, b } => {
                    format!("{id}|AB|{}|{}\n", vector_bits(a), vector_bits(b))
                }
            };
            hasher.update(line.as_bytes());
        }
        if let Some(p) = &self.projection {
            for d in Dichotomy::ALL {
                hasher.update(format!("dims|{}|{}\n", d.as_str(), vector_bits(p.row(d))));
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

fn entry_id(obj: &Map<String, Value>) -> Option<String> {
    ID_ALIASES.iter().find_map(|alias| match obj.get(*alias) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// `scale` is either the maximum answer value (minimum from `scaleMin`,
/// default 1) or an explicit `{min, max}` object.
fn parse_scale(root: &Map<String, Value>) -> Result<LikertScale, WeightError> {
    let Some(raw) = root.get("scale") else {
        return Ok(LikertScale::default());
    };
    let (min, max) = match raw {
        Value::Object(obj) => (
            obj.get("min").map(|v| coerce_number("scale", v)).unwrap_or(1.0),
            obj.get("max").map(|v| coerce_number("scale", v)).unwrap_or(5.0),
        ),
        other => (
            root.get("scaleMin")
                .map(|v| coerce_number("scale", v))
                .unwrap_or(1.0),
            coerce_number("scale", other),
        ),
    };
    Ok(LikertScale::new(min, max)?)
}

/// `dims` (named maps) wins over `dimsMatrix` (canonical-order arrays).
fn parse_projection(root: &Map<String, Value>) -> Result<Option<Projection>, WeightError> {
    let source = match (root.get("dims"), root.get("dimsMatrix")) {
        (Some(dims), _) => ("dims", dims),
        (None, Some(matrix)) => ("dimsMatrix", matrix),
        (None, None) => return Ok(None),
    };
    let Value::Object(rows) = source.1 else {
        return Err(WeightError::Malformed {
            id: Some(source.0.to_string()),
            reason: "projection must be an object keyed by EI/SN/TF/JP".to_string(),
        });
    };
    let row = |d: Dichotomy| -> Result<FunctionVector, WeightError> {
        match rows.get(d.as_str()) {
            Some(v) => parse_vector(source.0, v),
            None => Ok(FunctionVector::zero()),
        }
    };
    Ok(Some(Projection {
        ei: row(Dichotomy::EI)?,
        sn: row(Dichotomy::SN)?,
        tf: row(Dichotomy::TF)?,
        jp: row(Dichotomy::JP)?,
    }))
}

fn bits(x: f64) -> String {
    format!("{:016x}", x.to_bits())
}

fn vector_bits(v: &FunctionVector) -> String {
    v.as_array().iter().map(|x| bits(*x)).collect::<Vec<_>>().join(",")
}
