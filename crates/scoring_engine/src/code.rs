use std::fmt::{Display, Formatter};
use std::str::FromStr;

use core_types::{Dichotomy, DichotomyScores};
use serde::{Deserialize, Serialize};

use crate::ScoringError;

pub const TIE_MARKER: char = 'X';

/// How an exactly-zero dichotomy score becomes a letter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// First letter of the pair: I, S, F, P.
    #[default]
    NegativePole,
    /// Second letter of the pair: E, N, T, J.
    PositivePole,
    /// Literal `X`.
    Marker,
}

impl FromStr for TiePolicy {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "negative" | "negative_pole" => Ok(TiePolicy::NegativePole),
            "right" | "positive" | "positive_pole" => Ok(TiePolicy::PositivePole),
            "x" | "marker" => Ok(TiePolicy::Marker),
            other => Err(ScoringError::InvalidTiePolicy(other.to_string())),
        }
    }
}

/// Four-letter type code plus per-position tie flags. Stored as
/// `{"mbti": "INTP", "ties": [...]}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredCode", into = "StoredCode")]
pub struct TypeCode {
    letters: [char; 4],
    ties: [bool; 4],
}

impl TypeCode {
    pub fn from_scores(dims: &DichotomyScores, policy: TiePolicy) -> Self {
        let mut letters = [TIE_MARKER; 4];
        let mut ties = [false; 4];
        for (i, d) in Dichotomy::ALL.into_iter().enumerate() {
            let score = dims.get(d);
            letters[i] = if score > 0.0 {
                d.positive_letter()
            } else if score < 0.0 {
                d.negative_letter()
            } else {
                ties[i] = true;
                match policy {
                    TiePolicy::NegativePole => d.negative_letter(),
                    TiePolicy::PositivePole => d.positive_letter(),
                    TiePolicy::Marker => TIE_MARKER,
                }
            };
        }
        Self { letters, ties }
    }

    pub fn letters(&self) -> [char; 4] {
        self.letters
    }

    pub fn ties(&self) -> [bool; 4] {
        self.ties
    }

    pub fn has_ties(&self) -> bool {
        self.ties.iter().any(|t| *t)
    }

    /// The code with `X` at every tied position, whatever the policy.
    pub fn diagnostic(&self) -> String {
        self.letters
            .iter()
            .zip(self.ties.iter())
            .map(|(l, tied)| if *tied { TIE_MARKER } else { *l })
            .collect()
    }
}

impl Display for TypeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for l in self.letters {
            write!(f, "{l}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredCode {
    mbti: String,
    ties: [bool; 4],
}

impl From<TypeCode> for StoredCode {
    fn from(code: TypeCode) -> Self {
        Self {
            mbti: code.to_string(),
            ties: code.ties,
        }
    }
}

impl TryFrom<StoredCode> for TypeCode {
    type Error = ScoringError;

    fn try_from(stored: StoredCode) -> Result<Self, Self::Error> {
        let chars = stored.mbti.chars().collect::<Vec<_>>();
        let [a, b, c, d] = chars.as_slice() else {
            return Err(ScoringError::InvalidCode(stored.mbti));
        };
        let letters = [*a, *b, *c, *d];
        let valid = Dichotomy::ALL.into_iter().zip(letters).all(|(dim, l)| {
            l == TIE_MARKER || l == dim.negative_letter() || l == dim.positive_letter()
        });
        if !valid {
            return Err(ScoringError::InvalidCode(stored.mbti));
        }
        Ok(Self {
            letters,
            ties: stored.ties,
        })
    }
}
