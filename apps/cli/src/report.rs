use std::fmt::Write;

use core_types::Dichotomy;
use scoring_engine::ScoreResult;
use session_store::{SessionRecord, SessionSummary};

const BAR_WIDTH: usize = 20;

pub fn render_result(result: &ScoreResult, description: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Type: {}", result.code);
    if result.code.has_ties() {
        let _ = writeln!(out, "Ties: {} (X marks a zero score)", result.code.diagnostic());
    }
    if let Some(text) = description {
        let _ = writeln!(out, "{text}");
    }

    out.push_str("\nDichotomies:\n");
    for d in Dichotomy::ALL {
        let _ = writeln!(
            out,
            "  {}  {:+.3}  ({} / {})",
            d.as_str(),
            result.dims.get(d),
            d.negative_letter(),
            d.positive_letter()
        );
    }

    out.push_str("\nFunctions:\n");
    let peak = result.functions.max_abs();
    for key in &result.order {
        let value = result.functions[*key];
        let _ = writeln!(out, "  {:<2}  {:+.3}  {}", key.as_str(), value, bar(value, peak));
    }

    if result.is_degraded() {
        let _ = writeln!(
            out,
            "\n{} of {} answers had no weights and used the id prefix or nothing.",
            result.meta.degraded_items.len(),
            result.meta.total_items
        );
    }
    out.trim_end().to_string()
}

pub fn render_record(record: &SessionRecord, description: Option<&str>) -> String {
    let s = &record.session;
    let mut out = format!(
        "Session: {}\nKind: {}{}\nCreated: {}\nUpdated: {}\nAnswers: {}/{}\n",
        s.id,
        s.kind,
        s.set.map(|set| format!(" ({set})")).unwrap_or_default(),
        s.created_at.to_rfc3339(),
        record.updated_at.to_rfc3339(),
        s.answers.len(),
        s.items.len()
    );
    if let Some(note) = &record.note {
        let _ = writeln!(out, "Note: {note}");
    }
    match &record.result {
        Some(result) => {
            out.push('\n');
            out.push_str(&render_result(result, description));
        }
        None => out.push_str("\n(not scored)"),
    }
    out
}

pub fn render_summaries(summaries: &[SessionSummary]) -> String {
    if summaries.is_empty() {
        return "No stored sessions.".to_string();
    }
    summaries
        .iter()
        .map(|s| {
            let kind = match s.set {
                Some(set) => format!("{} {set}", s.kind),
                None => s.kind.to_string(),
            };
            let mut line = format!(
                "{}  {:<10}  {:<4}  {}",
                s.id,
                kind,
                s.code.as_deref().unwrap_or("-"),
                s.updated_at.format("%Y-%m-%d %H:%M:%S")
            );
            if let Some(note) = &s.note {
                let _ = write!(line, "  {note}");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bar(value: f64, peak: f64) -> String {
    if peak <= 0.0 {
        return String::new();
    }
    let filled = ((value.abs() / peak) * BAR_WIDTH as f64).round() as usize;
    let glyph = if value < 0.0 { '-' } else { '#' };
    std::iter::repeat_n(glyph, filled.min(BAR_WIDTH)).collect()
}

#[cfg(test)]
mod tests {
    use super::bar;

    #[test]
    fn bars_scale_to_the_peak() {
        assert_eq!(bar(2.0, 2.0).len(), 20);
        assert_eq!(bar(-1.0, 2.0), "-".repeat(10));
        assert_eq!(bar(0.0, 0.0), "");
    }
}
