use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use core_types::{Answer, LikertScale, Session};
use log::debug;
use scoring_engine::positional_answers;
use serde_json::Value;

use crate::error::CliError;

/// Reads `[{id, value}, ...]`, or a bare array of numbers aligned to item
/// source order (extra values are ignored). An id may appear only once.
pub fn read_answers(path: &Path, session: &Session) -> Result<Vec<Answer>, CliError> {
    let shown = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|e| CliError::io("score", &shown, e))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| CliError::answers("score", format!("{shown}: invalid JSON: {e}")))?;

    let Value::Array(rows) = &value else {
        return Err(CliError::answers(
            "score",
            format!("{shown}: answers must be a JSON array"),
        ));
    };
    if !rows.is_empty() && rows.iter().all(Value::is_number) {
        if rows.len() > session.items.len() {
            debug!(
                "{} positional answers for {} items, ignoring the rest",
                rows.len(),
                session.items.len()
            );
        }
        let values = rows.iter().filter_map(Value::as_f64).collect::<Vec<_>>();
        return Ok(positional_answers(&values, &session.items));
    }
    let answers: Vec<Answer> = serde_json::from_value(value)
        .map_err(|e| CliError::answers("score", format!("{shown}: {e}")))?;
    {
        let mut seen = BTreeSet::new();
        for answer in &answers {
            if !seen.insert(answer.id.as_str()) {
                return Err(CliError::answers(
                    "score",
                    format!("{shown}: duplicate answer for item {}", answer.id),
                ));
            }
        }
    }
    Ok(answers)
}

/// Deterministic pseudo-random answers over the scale's whole-number points,
/// one per item in presentation order.
pub fn random_answers(session: &Session, scale: LikertScale, seed: u64) -> Vec<Answer> {
    let lo = scale.min().ceil() as i64;
    let hi = scale.max().floor() as i64;
    let span = (hi - lo + 1).max(1) as u64;
    session
        .order
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let x = splitmix64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            Answer::new(id.clone(), (lo + (x % span) as i64) as f64)
        })
        .collect()
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use core_types::{Item, LikertScale, QuizKind, Session};

    use super::{random_answers, read_answers};

    fn write_answers(tag: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "quiz_answers_{tag}_{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        fs::write(&path, body).expect("write answers");
        path
    }

    fn session() -> Session {
        let items = (1..=16)
            .map(|i| Item {
                id: format!("Q{i}"),
                stem: format!("stem {i}"),
                options: None,
            })
            .collect();
        Session::start(QuizKind::Basic, None, items, 3).expect("session")
    }

    #[test]
    fn random_answers_are_seeded_and_in_range() {
        let s = session();
        let a = random_answers(&s, LikertScale::default(), 42);
        let b = random_answers(&s, LikertScale::default(), 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.iter().all(|x| (1.0..=5.0).contains(&x.value)));
        assert_eq!(a[0].id, s.order[0]);
        assert_ne!(a, random_answers(&s, LikertScale::default(), 43));

        let centered = random_answers(&s, LikertScale::centered(), 42);
        assert!(centered.iter().all(|x| (-2.0..=2.0).contains(&x.value)));
    }

    #[test]
    fn duplicate_answer_ids_are_rejected() {
        let path = write_answers("dup", r#"[{"id": "Q1", "value": 1}, {"id": "Q1", "value": 5}]"#);
        let err = read_answers(&path, &session()).expect_err("duplicate");
        let _ = fs::remove_file(&path);
        assert_eq!(err.kind, "AnswerError");
        assert!(err.message.contains("duplicate answer for item Q1"));
    }

    #[test]
    fn positional_values_follow_source_order() {
        let path = write_answers("positional", "[5, 1, 2]");
        let answers = read_answers(&path, &session()).expect("answers");
        let _ = fs::remove_file(&path);
        let ids = answers.iter().map(|a| a.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["Q1", "Q2", "Q3"]);
        assert_eq!(answers[0].value, 5.0);
    }
}
