use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Ordinal answer scale. Low values lean toward pole A, high values toward pole B.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScale")]
pub struct LikertScale {
    min: f64,
    max: f64,
}

impl Default for LikertScale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl LikertScale {
    pub fn new(min: f64, max: f64) -> Result<Self, CoreError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(CoreError::InvalidScale { min, max });
        }
        Ok(Self { min, max })
    }

    /// The symmetric `-2..=2` variant.
    pub fn centered() -> Self {
        Self { min: -2.0, max: 2.0 }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Interpolation parameter in `[0, 1]`: 0 at pole A, 1 at pole B.
    pub fn position(&self, value: f64) -> f64 {
        let value = self.sanitize(value);
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Signed weight in `[-1, 1]`: +1 at pole A, -1 at pole B, 0 at the midpoint.
    /// On the 1..=5 scale this is `(3 - v) / 2`.
    pub fn signed(&self, value: f64) -> f64 {
        let value = self.sanitize(value);
        let half_range = 0.5 * (self.max - self.min);
        ((self.midpoint() - value) / half_range).clamp(-1.0, 1.0)
    }

    fn sanitize(&self, value: f64) -> f64 {
        if value.is_finite() { value } else { self.midpoint() }
    }
}

#[derive(Deserialize)]
struct RawScale {
    min: f64,
    max: f64,
}

impl TryFrom<RawScale> for LikertScale {
    type Error = CoreError;

    fn try_from(raw: RawScale) -> Result<Self, Self::Error> {
        LikertScale::new(raw.min, raw.max)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::LikertScale;

    #[test]
    fn five_point_scale_matches_reference_formula() {
        let s = LikertScale::default();
        for v in 1..=5 {
            let v = v as f64;
            assert_eq!(s.signed(v), (3.0 - v) / 2.0);
            assert_eq!(s.position(v), (v - 1.0) / 4.0);
        }
    }

    #[test]
    fn centered_scale_points_low_values_to_pole_a() {
        let s = LikertScale::centered();
        assert_eq!(s.signed(-2.0), 1.0);
        assert_eq!(s.signed(2.0), -1.0);
        assert_eq!(s.signed(0.0), 0.0);
        assert_eq!(s.position(0.0), 0.5);
    }

    #[test]
    fn out_of_range_and_non_finite_values_are_clamped() {
        let s = LikertScale::default();
        assert_eq!(s.signed(9.0), -1.0);
        assert_eq!(s.position(-3.0), 0.0);
        assert_eq!(s.signed(f64::NAN), 0.0);
        assert_eq!(s.position(f64::INFINITY), 0.5);
    }

    #[test]
    fn degenerate_scale_is_rejected() {
        assert!(LikertScale::new(5.0, 5.0).is_err());
        assert!(LikertScale::new(5.0, 1.0).is_err());
        assert!(serde_json::from_str::<LikertScale>(r#"{"min":3,"max":1}"#).is_err());
    }

    proptest! {
        #[test]
        fn signed_and_position_stay_in_bounds(min in -10i32..10, span in 1i32..10, v in -50.0f64..50.0) {
            let s = LikertScale::new(min as f64, (min + span) as f64).expect("scale");
            prop_assert!((-1.0..=1.0).contains(&s.signed(v)));
            prop_assert!((0.0..=1.0).contains(&s.position(v)));
            prop_assert_eq!(s.signed(s.midpoint()), 0.0);
        }
    }
}
