use core_types::{Answer, DichotomyScores, FnKey, FunctionVector, Item, LikertScale, Session};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use weight_table::{DegradedReason, WeightTable, resolve_on};

use crate::code::{TiePolicy, TypeCode};
use crate::projection::{ProjectionSource, project};
use crate::rank::rank_functions;
use crate::ScoringError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub tie_policy: TiePolicy,
    /// Reads answers on this scale instead of the table's.
    #[serde(default)]
    pub scale_override: Option<LikertScale>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegradedItem {
    pub id: String,
    #[serde(flatten)]
    pub reason: DegradedReason,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreMeta {
    pub scale: LikertScale,
    pub total_items: usize,
    pub degraded_items: Vec<DegradedItem>,
    pub weights_digest: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub functions: FunctionVector,
    pub dims: DichotomyScores,
    pub code: TypeCode,
    pub order: Vec<FnKey>,
    pub projection: ProjectionSource,
    pub meta: ScoreMeta,
}

impl ScoreResult {
    pub fn is_degraded(&self) -> bool {
        !self.meta.degraded_items.is_empty()
    }
}

/// Sums every answer's contribution and derives dichotomies, code and ranking.
///
/// Contributions are summed in `(id, value)` order, so any permutation of
/// `answers` produces bit-identical totals.
pub fn aggregate(answers: &[Answer], table: &WeightTable, config: &ScoringConfig) -> ScoreResult {
    let scale = config.scale_override.unwrap_or_else(|| table.scale());

    let mut sorted = answers.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.id.cmp(&b.id).then(a.value.total_cmp(&b.value)));

    let mut functions = FunctionVector::zero();
    let mut degraded_items = Vec::new();
    for answer in sorted {
        let resolution = resolve_on(&answer.id, answer.value, table, scale);
        functions = (functions + resolution.vector).saturated();
        if let Some(reason) = resolution.degraded {
            degraded_items.push(DegradedItem {
                id: answer.id.clone(),
                reason,
            });
        }
    }

    let (dims, projection) = project(&functions, table);
    let code = TypeCode::from_scores(&dims, config.tie_policy);
    let order = rank_functions(&functions);

    if !degraded_items.is_empty() {
        warn!(
            "{} of {} answers scored without weights",
            degraded_items.len(),
            answers.len()
        );
    }
    debug!("scored {} answers -> {code} ({projection:?} projection)", answers.len());

    ScoreResult {
        functions,
        dims,
        code,
        order,
        projection,
        meta: ScoreMeta {
            scale,
            total_items: answers.len(),
            degraded_items,
            weights_digest: table.digest(),
        },
    }
}

/// Scores a completed session after checking its answers against its items.
pub fn score(
    session: &Session,
    table: &WeightTable,
    config: &ScoringConfig,
) -> Result<ScoreResult, ScoringError> {
    session.validate()?;
    if !session.is_complete() {
        debug!(
            "session {} has {} of {} items answered",
            session.id,
            session.answers.len(),
            session.items.len()
        );
    }
    Ok(aggregate(&session.answers, table, config))
}

/// Pairs values with items in source order; the longer side is truncated.
pub fn positional_answers(values: &[f64], items: &[Item]) -> Vec<Answer> {
    items
        .iter()
        .zip(values)
        .map(|(item, value)| Answer::new(item.id.clone(), *value))
        .collect()
}

pub fn score_positional(
    values: &[f64],
    items: &[Item],
    table: &WeightTable,
    config: &ScoringConfig,
) -> ScoreResult {
    aggregate(&positional_answers(values, items), table, config)
}
