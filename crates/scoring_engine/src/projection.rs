use core_types::{Dichotomy, DichotomyScores, FunctionVector, saturate};
use serde::{Deserialize, Serialize};
use weight_table::{Projection, WeightTable};

/// Which projection produced the dichotomy scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionSource {
    Explicit,
    Fallback,
}

// Canonical order: Ni, Ne, Si, Se, Ti, Te, Fi, Fe.
const FALLBACK_EI: [f64; 8] = [-0.5, 0.5, -0.5, 0.5, -0.5, 0.5, -0.5, 0.5];
const FALLBACK_SN: [f64; 8] = [0.5, 0.5, -0.5, -0.5, 0.0, 0.0, 0.0, 0.0];
const FALLBACK_TF: [f64; 8] = [0.0, 0.0, 0.0, 0.0, 0.6, 0.6, -0.6, -0.6];
const FALLBACK_JP: [f64; 8] = [-0.25, -0.25, -0.25, -0.25, 0.35, 0.35, 0.35, 0.35];

/// Used when the table carries no `dims` / `dimsMatrix`. Positive rows point
/// at E, N, T and J.
pub fn fallback_projection() -> Projection {
    Projection {
        ei: FunctionVector::from_array(FALLBACK_EI),
        sn: FunctionVector::from_array(FALLBACK_SN),
        tf: FunctionVector::from_array(FALLBACK_TF),
        jp: FunctionVector::from_array(FALLBACK_JP),
    }
}

pub fn project_with(functions: &FunctionVector, projection: &Projection) -> DichotomyScores {
    let mut out = DichotomyScores::default();
    for d in Dichotomy::ALL {
        out.set(d, saturate(functions.dot(projection.row(d))));
    }
    out
}

/// Explicit table projection when present, otherwise the fallback.
pub fn project(functions: &FunctionVector, table: &WeightTable) -> (DichotomyScores, ProjectionSource) {
    match table.projection() {
        Some(p) => (project_with(functions, p), ProjectionSource::Explicit),
        None => (
            project_with(functions, &fallback_projection()),
            ProjectionSource::Fallback,
        ),
    }
}
