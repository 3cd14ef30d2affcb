use serde::{Deserialize, Serialize};

/// A pair of opposite poles. Negative scores select the first letter,
/// positive scores the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dichotomy {
    EI,
    SN,
    TF,
    JP,
}

impl Dichotomy {
    pub const ALL: [Dichotomy; 4] = [Dichotomy::EI, Dichotomy::SN, Dichotomy::TF, Dichotomy::JP];

    pub fn as_str(self) -> &'static str {
        match self {
            Dichotomy::EI => "EI",
            Dichotomy::SN => "SN",
            Dichotomy::TF => "TF",
            Dichotomy::JP => "JP",
        }
    }

    pub fn negative_letter(self) -> char {
        match self {
            Dichotomy::EI => 'I',
            Dichotomy::SN => 'S',
            Dichotomy::TF => 'F',
            Dichotomy::JP => 'P',
        }
    }

    pub fn positive_letter(self) -> char {
        match self {
            Dichotomy::EI => 'E',
            Dichotomy::SN => 'N',
            Dichotomy::TF => 'T',
            Dichotomy::JP => 'J',
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DichotomyScores {
    #[serde(rename = "EI")]
    pub ei: f64,
    #[serde(rename = "SN")]
    pub sn: f64,
    #[serde(rename = "TF")]
    pub tf: f64,
    #[serde(rename = "JP")]
    pub jp: f64,
}

impl DichotomyScores {
    pub fn get(&self, d: Dichotomy) -> f64 {
        match d {
            Dichotomy::EI => self.ei,
            Dichotomy::SN => self.sn,
            Dichotomy::TF => self.tf,
            Dichotomy::JP => self.jp,
        }
    }

    pub fn set(&mut self, d: Dichotomy, value: f64) {
        match d {
            Dichotomy::EI => self.ei = value,
            Dichotomy::SN => self.sn = value,
            Dichotomy::TF => self.tf = value,
            Dichotomy::JP => self.jp = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dichotomy, DichotomyScores};

    #[test]
    fn letters_follow_sign_convention() {
        let code = Dichotomy::ALL
            .iter()
            .map(|d| d.positive_letter())
            .collect::<String>();
        assert_eq!(code, "ENTJ");
        let code = Dichotomy::ALL
            .iter()
            .map(|d| d.negative_letter())
            .collect::<String>();
        assert_eq!(code, "ISFP");
    }

    #[test]
    fn scores_serialize_with_pair_names() {
        let mut s = DichotomyScores::default();
        s.set(Dichotomy::TF, -1.25);
        assert_eq!(s.get(Dichotomy::TF), -1.25);
        let json = serde_json::to_value(s).expect("serialize");
        assert_eq!(json["TF"], -1.25);
        assert_eq!(json["EI"], 0.0);
    }
}
