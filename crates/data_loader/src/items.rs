use std::collections::BTreeSet;

use core_types::{Item, ItemSet, QuizKind};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{DataSource, LoadError, items_path};

const CONTAINER_KEYS: [&str; 6] = ["items", "questions", "list", "data", "payload", "results"];
const ID_KEYS: [&str; 3] = ["id", "qid", "key"];
const STEM_KEYS: [&str; 11] = [
    "stem",
    "text",
    "title",
    "desc",
    "description",
    "content",
    "label",
    "prompt",
    "question",
    "name",
    "q",
];
const OPTION_KEYS: [&str; 2] = ["options", "choices"];

/// Loads the item bank for a kind/set pair. An empty bank is treated as missing.
pub fn load_items(
    source: &dyn DataSource,
    kind: QuizKind,
    set: Option<ItemSet>,
) -> Result<Vec<Item>, LoadError> {
    let path = items_path(kind, set)?;
    let raw = source.read_json(&path)?;
    let items = normalize_items(&raw);
    if items.is_empty() {
        return Err(LoadError::NotFound { path });
    }
    debug!("loaded {} items from {path}", items.len());
    Ok(items)
}

/// Normalizes a raw item document. Rows without a stem are dropped, and a
/// repeated id keeps its first occurrence.
pub fn normalize_items(raw: &Value) -> Vec<Item> {
    let rows = item_rows(raw);
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let Value::Object(obj) = row else {
            debug!("items: skipping non-object row #{}", idx + 1);
            continue;
        };
        let id = first_text(obj, &ID_KEYS).unwrap_or_else(|| format!("q_{}", idx + 1));
        let Some(stem) = first_text(obj, &STEM_KEYS) else {
            debug!("items: dropping {id} without a stem");
            continue;
        };
        if !seen.insert(id.clone()) {
            warn!("items: duplicate id {id}, keeping the first");
            continue;
        }
        out.push(Item {
            id,
            stem,
            options: options(obj),
        });
    }
    out
}

fn item_rows(raw: &Value) -> &[Value] {
    match raw {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(obj) => CONTAINER_KEYS
            .iter()
            .filter_map(|key| match obj.get(*key) {
                Some(Value::Array(rows)) if !rows.is_empty() => Some(rows.as_slice()),
                _ => None,
            })
            .next()
            .unwrap_or(&[]),
        _ => &[],
    }
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| obj.get(*key).and_then(text_of))
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn options(obj: &Map<String, Value>) -> Option<[String; 2]> {
    let list = OPTION_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))?;
    match list.as_slice() {
        [a, b] => Some([option_label(a)?, option_label(b)?]),
        _ => None,
    }
}

fn option_label(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => first_text(obj, &["label", "text"]),
        other => text_of(other),
    }
}
