use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Answer, CoreError, Item, ItemSet, QuizKind, validate_selection};

/// One quiz attempt: the items shown, their presentation order and the answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub kind: QuizKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<ItemSet>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<Item>,
    /// Item ids in presentation order.
    pub order: Vec<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Session {
    /// Starts a session with a fresh id. `seed == 0` keeps source order;
    /// any other seed shuffles deterministically.
    pub fn start(
        kind: QuizKind,
        set: Option<ItemSet>,
        items: Vec<Item>,
        seed: u32,
    ) -> Result<Self, CoreError> {
        validate_selection(kind, set)?;
        check_unique_items(&items)?;
        let ids = items.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
        let order = if seed == 0 { ids } else { shuffle(&ids, seed) };
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind,
            set: if kind == QuizKind::Advanced { set } else { None },
            created_at: Utc::now(),
            items,
            order,
            answers: Vec::new(),
        })
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Records or replaces the answer for a known item.
    pub fn answer(&mut self, id: &str, value: f64) -> Result<(), CoreError> {
        if self.item(id).is_none() {
            return Err(CoreError::UnknownItem(id.to_string()));
        }
        match self.answers.iter_mut().find(|a| a.id == id) {
            Some(existing) => existing.value = value,
            None => self.answers.push(Answer::new(id, value)),
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.items
            .iter()
            .all(|item| self.answers.iter().any(|a| a.id == item.id))
    }

    /// Every answer names exactly one item, at most once.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_unique_items(&self.items)?;
        let mut seen = BTreeSet::new();
        for answer in &self.answers {
            if self.item(&answer.id).is_none() {
                return Err(CoreError::UnknownItem(answer.id.clone()));
            }
            if !seen.insert(answer.id.as_str()) {
                return Err(CoreError::DuplicateAnswer(answer.id.clone()));
            }
        }
        Ok(())
    }
}

fn check_unique_items(items: &[Item]) -> Result<(), CoreError> {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(CoreError::DuplicateItem(item.id.clone()));
        }
    }
    Ok(())
}

/// Fisher-Yates driven by xorshift32. Returns a new vector.
pub fn shuffle<T: Clone>(values: &[T], seed: u32) -> Vec<T> {
    let mut out = values.to_vec();
    let mut x = if seed == 0 { 1 } else { seed };
    let mut next = move || {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        x as f64 / 4_294_967_296.0
    };
    for i in (1..out.len()).rev() {
        let j = ((next() * (i + 1) as f64) as usize).min(i);
        out.swap(i, j);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Session, shuffle};
    use crate::{CoreError, Item, ItemSet, QuizKind};

    fn items(n: usize) -> Vec<Item> {
        (1..=n)
            .map(|i| Item {
                id: format!("T{i:02}"),
                stem: format!("statement {i}"),
                options: None,
            })
            .collect()
    }

    #[test]
    fn shuffle_is_a_deterministic_permutation() {
        let ids = (0..20).collect::<Vec<_>>();
        let a = shuffle(&ids, 42);
        let b = shuffle(&ids, 42);
        assert_eq!(a, b);
        assert_ne!(a, ids);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn start_assigns_id_and_order() {
        let s = Session::start(QuizKind::Basic, Some(ItemSet::B), items(4), 0).expect("start");
        assert_eq!(s.order, ["T01", "T02", "T03", "T04"]);
        assert_eq!(s.set, None);
        assert_eq!(s.id.len(), 36);

        let other = Session::start(QuizKind::Basic, None, items(4), 0).expect("start");
        assert_ne!(s.id, other.id);
    }

    #[test]
    fn answers_are_checked_against_items() {
        let mut s = Session::start(QuizKind::Advanced, Some(ItemSet::A), items(2), 7).expect("start");
        s.answer("T01", 2.0).expect("answer");
        s.answer("T01", 4.0).expect("replace");
        assert_eq!(s.answers.len(), 1);
        assert_eq!(s.answers[0].value, 4.0);
        assert!(!s.is_complete());
        assert_eq!(s.answer("ZZ", 1.0), Err(CoreError::UnknownItem("ZZ".to_string())));

        s.answer("T02", 1.0).expect("answer");
        assert!(s.is_complete());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicates() {
        let mut s = Session::start(QuizKind::Basic, None, items(2), 0).expect("start");
        s.answers.push(crate::Answer::new("T01", 1.0));
        s.answers.push(crate::Answer::new("T01", 5.0));
        assert_eq!(s.validate(), Err(CoreError::DuplicateAnswer("T01".to_string())));

        let mut dup = items(2);
        dup[1].id = "T01".to_string();
        assert!(Session::start(QuizKind::Basic, None, dup, 0).is_err());
    }

    #[test]
    fn advanced_without_set_is_rejected() {
        assert_eq!(
            Session::start(QuizKind::Advanced, None, items(1), 0),
            Err(CoreError::MissingSet)
        );
    }
}
