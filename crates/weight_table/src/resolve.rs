use core_types::{FunctionVector, LikertScale, ReducedKey};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{WeightEntry, WeightTable};

/// Why a contribution was estimated instead of read from the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradedReason {
    /// No entry; the id prefix named a reduced dimension which was split 0.5/0.5.
    PrefixHint { letter: char },
    /// No entry and no usable prefix; contributed nothing.
    NoHint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub vector: FunctionVector,
    pub degraded: Option<DegradedReason>,
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Maps one answer through the table into an eight-function contribution.
/// Never fails: missing entries fall back to the id-prefix heuristic.
pub fn resolve(item_id: &str, value: f64, table: &WeightTable) -> Resolution {
    resolve_on(item_id, value, table, table.scale())
}

/// Same as [`resolve`] but reads the answer on `scale` instead of the table's own.
pub fn resolve_on(item_id: &str, value: f64, table: &WeightTable, scale: LikertScale) -> Resolution {
    match table.get(item_id) {
        Some(WeightEntry::Interpolated { a, b }) => Resolution {
            vector: FunctionVector::lerp(a, b, scale.position(value)),
            degraded: None,
        },
        Some(WeightEntry::Signed { vector }) => Resolution {
            vector: vector.scaled(scale.signed(value)),
            degraded: None,
        },
        None => {
            let hint = item_id.chars().next().and_then(ReducedKey::from_letter);
            match hint {
                Some(key) => {
                    warn!("no weights for item {item_id}; estimating from prefix {}", key.as_str());
                    Resolution {
                        vector: FunctionVector::from_reduced(key, 1.0).scaled(scale.signed(value)),
                        degraded: Some(DegradedReason::PrefixHint {
                            letter: key.letter(),
                        }),
                    }
                }
                None => {
                    warn!("no weights for item {item_id} and no usable prefix; contributing zero");
                    Resolution {
                        vector: FunctionVector::zero(),
                        degraded: Some(DegradedReason::NoHint),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core_types::{FnKey, FunctionVector, LikertScale};
    use proptest::prelude::*;

    use super::{DegradedReason, resolve};
    use crate::{WeightEntry, WeightTable};

    fn vec8() -> impl Strategy<Value = FunctionVector> {
        proptest::array::uniform8(-3.0f64..3.0).prop_map(FunctionVector::from_array)
    }

    #[test]
    fn signed_entry_follows_pole_a_positive_convention() {
        let table = WeightTable::default()
            .with_entry("1", WeightEntry::signed(FunctionVector::unit(FnKey::Ti, 1.0)));
        assert_eq!(resolve("1", 1.0, &table).vector[FnKey::Ti], 1.0);
        assert_eq!(resolve("1", 2.0, &table).vector[FnKey::Ti], 0.5);
        assert_eq!(resolve("1", 5.0, &table).vector[FnKey::Ti], -1.0);
        assert!(!resolve("1", 5.0, &table).is_degraded());
    }

    #[test]
    fn interpolated_entry_walks_from_a_to_b() {
        let a = FunctionVector::unit(FnKey::Si, 1.0);
        let b = FunctionVector::unit(FnKey::Ne, 1.0);
        let table = WeightTable::default().with_entry("x", WeightEntry::interpolated(a, b));
        assert_eq!(resolve("x", 1.0, &table).vector, a);
        assert_eq!(resolve("x", 5.0, &table).vector, b);
        let quarter = resolve("x", 2.0, &table).vector;
        assert_eq!(quarter[FnKey::Si], 0.75);
        assert_eq!(quarter[FnKey::Ne], 0.25);
    }

    #[test]
    fn centered_scale_uses_the_same_direction() {
        let table = WeightTable::new(LikertScale::centered())
            .with_entry("x", WeightEntry::signed(FunctionVector::unit(FnKey::Fi, 2.0)));
        assert_eq!(resolve("x", -2.0, &table).vector[FnKey::Fi], 2.0);
        assert_eq!(resolve("x", 2.0, &table).vector[FnKey::Fi], -2.0);
    }

    #[test]
    fn missing_entry_uses_prefix_hint() {
        let table = WeightTable::default();
        let r = resolve("n07", 1.0, &table);
        assert_eq!(r.degraded, Some(DegradedReason::PrefixHint { letter: 'N' }));
        assert_eq!(r.vector[FnKey::Ni], 0.5);
        assert_eq!(r.vector[FnKey::Ne], 0.5);
        assert_eq!(r.vector.iter().filter(|(_, v)| *v != 0.0).count(), 2);

        let r = resolve("Q1", 1.0, &table);
        assert_eq!(r.degraded, Some(DegradedReason::NoHint));
        assert!(r.vector.is_zero());

        let r = resolve("", 1.0, &table);
        assert_eq!(r.degraded, Some(DegradedReason::NoHint));
    }

    #[test]
    fn non_finite_answer_is_neutral() {
        let table = WeightTable::default()
            .with_entry("x", WeightEntry::signed(FunctionVector::unit(FnKey::Te, 1.0)));
        assert!(resolve("x", f64::NAN, &table).vector.is_zero());
    }

    proptest! {
        #[test]
        fn interpolated_midpoint_is_mean(a in vec8(), b in vec8()) {
            let table = WeightTable::default().with_entry("m", WeightEntry::interpolated(a, b));
            let mid = resolve("m", 3.0, &table).vector;
            let mean = FunctionVector::lerp(&a, &b, 0.5);
            prop_assert!(mid.approx_eq(&mean, 1e-12));
            for k in FnKey::ALL {
                prop_assert!((mid[k] - 0.5 * (a[k] + b[k])).abs() < 1e-12);
            }
        }

        #[test]
        fn signed_neutral_value_is_zero(v in vec8()) {
            let table = WeightTable::default().with_entry("s", WeightEntry::signed(v));
            prop_assert!(resolve("s", 3.0, &table).vector.is_zero());
            let centered = WeightTable::new(LikertScale::centered()).with_entry("s", WeightEntry::signed(v));
            prop_assert!(resolve("s", 0.0, &centered).vector.is_zero());
        }
    }
}
