use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One of the eight cognitive functions, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FnKey {
    Ni,
    Ne,
    Si,
    Se,
    Ti,
    Te,
    Fi,
    Fe,
}

impl FnKey {
    pub const ALL: [FnKey; 8] = [
        FnKey::Ni,
        FnKey::Ne,
        FnKey::Si,
        FnKey::Se,
        FnKey::Ti,
        FnKey::Te,
        FnKey::Fi,
        FnKey::Fe,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FnKey::Ni => "Ni",
            FnKey::Ne => "Ne",
            FnKey::Si => "Si",
            FnKey::Se => "Se",
            FnKey::Ti => "Ti",
            FnKey::Te => "Te",
            FnKey::Fi => "Fi",
            FnKey::Fe => "Fe",
        }
    }
}

impl Display for FnKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FnKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FnKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFunction(s.to_string()))
    }
}

/// Reduced S/N/T/F key, each covering two of the eight functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReducedKey {
    S,
    N,
    T,
    F,
}

impl ReducedKey {
    pub const ALL: [ReducedKey; 4] = [ReducedKey::S, ReducedKey::N, ReducedKey::T, ReducedKey::F];

    pub fn children(self) -> [FnKey; 2] {
        match self {
            ReducedKey::S => [FnKey::Si, FnKey::Se],
            ReducedKey::N => [FnKey::Ni, FnKey::Ne],
            ReducedKey::T => [FnKey::Ti, FnKey::Te],
            ReducedKey::F => [FnKey::Fi, FnKey::Fe],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReducedKey::S => "S",
            ReducedKey::N => "N",
            ReducedKey::T => "T",
            ReducedKey::F => "F",
        }
    }

    pub fn letter(self) -> char {
        match self {
            ReducedKey::S => 'S',
            ReducedKey::N => 'N',
            ReducedKey::T => 'T',
            ReducedKey::F => 'F',
        }
    }

    /// Case-insensitive match on a single letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(ReducedKey::S),
            'N' => Some(ReducedKey::N),
            'T' => Some(ReducedKey::T),
            'F' => Some(ReducedKey::F),
            _ => None,
        }
    }
}

/// Eight-function vector. Always fully keyed; unknown keys read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "KeyedVector", into = "KeyedVector")]
pub struct FunctionVector([f64; 8]);

impl FunctionVector {
    pub const fn zero() -> Self {
        Self([0.0; 8])
    }

    pub const fn from_array(values: [f64; 8]) -> Self {
        Self(values)
    }

    /// Canonical-order slice; short input is zero-filled, extra values ignored.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut out = [0.0; 8];
        for (slot, v) in out.iter_mut().zip(values) {
            *slot = *v;
        }
        Self(out)
    }

    pub fn from_map(map: &BTreeMap<FnKey, f64>) -> Self {
        let mut out = Self::zero();
        for (k, v) in map {
            out[*k] = *v;
        }
        out
    }

    pub fn from_reduced(key: ReducedKey, weight: f64) -> Self {
        let mut out = Self::zero();
        for child in key.children() {
            out[child] = 0.5 * weight;
        }
        out
    }

    pub fn unit(key: FnKey, value: f64) -> Self {
        let mut out = Self::zero();
        out[key] = value;
        out
    }

    pub fn as_array(&self) -> &[f64; 8] {
        &self.0
    }

    pub fn get(&self, key: FnKey) -> f64 {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: FnKey, value: f64) {
        self.0[key.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (FnKey, f64)> + '_ {
        FnKey::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    pub fn add_scaled(&mut self, other: &FunctionVector, scale: f64) {
        for i in 0..8 {
            self.0[i] += other.0[i] * scale;
        }
    }

    pub fn scaled(&self, scale: f64) -> Self {
        let mut out = *self;
        for v in out.0.iter_mut() {
            *v *= scale;
        }
        out
    }

    /// `(1 - t) * a + t * b`.
    pub fn lerp(a: &FunctionVector, b: &FunctionVector, t: f64) -> Self {
        let mut out = Self::zero();
        for i in 0..8 {
            out.0[i] = (1.0 - t) * a.0[i] + t * b.0[i];
        }
        out
    }

    pub fn dot(&self, other: &FunctionVector) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Overflowed components are pinned to `±f64::MAX` and NaN becomes 0.
    pub fn saturated(&self) -> Self {
        Self(self.0.map(saturate))
    }

    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn approx_eq(&self, other: &FunctionVector, eps: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

/// Clamps `x` into the finite range; NaN reads as 0.
pub fn saturate(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-f64::MAX, f64::MAX)
    }
}

impl Index<FnKey> for FunctionVector {
    type Output = f64;

    fn index(&self, key: FnKey) -> &f64 {
        &self.0[key.index()]
    }
}

impl IndexMut<FnKey> for FunctionVector {
    fn index_mut(&mut self, key: FnKey) -> &mut f64 {
        &mut self.0[key.index()]
    }
}

impl Add for FunctionVector {
    type Output = FunctionVector;

    fn add(mut self, rhs: FunctionVector) -> FunctionVector {
        self += rhs;
        self
    }
}

impl AddAssign for FunctionVector {
    fn add_assign(&mut self, rhs: FunctionVector) {
        self.add_scaled(&rhs, 1.0);
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize)]
struct KeyedVector {
    #[serde(rename = "Ni", default)]
    ni: f64,
    #[serde(rename = "Ne", default)]
    ne: f64,
    #[serde(rename = "Si", default)]
    si: f64,
    #[serde(rename = "Se", default)]
    se: f64,
    #[serde(rename = "Ti", default)]
    ti: f64,
    #[serde(rename = "Te", default)]
    te: f64,
    #[serde(rename = "Fi", default)]
    fi: f64,
    #[serde(rename = "Fe", default)]
    fe: f64,
}

impl From<KeyedVector> for FunctionVector {
    fn from(k: KeyedVector) -> Self {
        Self([k.ni, k.ne, k.si, k.se, k.ti, k.te, k.fi, k.fe])
    }
}

impl From<FunctionVector> for KeyedVector {
    fn from(v: FunctionVector) -> Self {
        let [ni, ne, si, se, ti, te, fi, fe] = v.0;
        Self {
            ni,
            ne,
            si,
            se,
            ti,
            te,
            fi,
            fe,
        }
    }
}
