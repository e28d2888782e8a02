//! Text renderings of a [`ScoringResult`]: the result sheet, the inline
//! diff and JSON.

use std::fmt;

use itertools::Itertools;

use crate::{
    align::WordOp,
    classify::{Classification, MistakeReason},
    engine::ScoringResult,
    error::Result,
    exam::ExamCatalog,
    util::format_mmss,
};

/// Inline diff: equal words plain, `[-missing-]`, `{+extra+}` and
/// `~typed~(correct)`.
pub fn diff_text(ops: &[WordOp]) -> String {
    ops.iter()
        .map(|op| match op {
            WordOp::Equal { typed, .. } => typed.clone(),
            WordOp::Delete { reference, .. } => format!("[-{reference}-]"),
            WordOp::Insert { typed, .. } => format!("{{+{typed}+}}"),
            WordOp::Substitute {
                reference, typed, ..
            } => format!("~{typed}~({reference})"),
        })
        .join(" ")
}

pub fn to_json(result: &ScoringResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Everything on the sheet that does not come from the evaluation itself.
#[derive(Debug, Clone, Default)]
pub struct SheetContext {
    pub candidate: Option<String>,
    pub time_limit_secs: Option<u64>,
    pub time_up: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSheet {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
    pub passed: bool,
    pub expected_speed: String,
    pub breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub reason: MistakeReason,
    pub classification: Classification,
    pub count: usize,
}

impl ResultSheet {
    pub fn build(result: &ScoringResult, catalog: &ExamCatalog, context: &SheetContext) -> Self {
        let test_name = result
            .exam_profile
            .as_deref()
            .and_then(|key| catalog.get(key))
            .map(|profile| profile.name.clone())
            .unwrap_or_else(|| "Practice".to_string());

        let elapsed = result.elapsed_seconds.round() as u64;
        let mut time = match context.time_limit_secs {
            Some(limit) => format!("{} / {}", format_mmss(elapsed), format_mmss(limit)),
            None => format_mmss(elapsed),
        };
        if context.time_up {
            time.push_str(" (TIME UP)");
        }

        let rows = vec![
            ("Name", context.candidate.clone().unwrap_or_else(|| "-".to_string())),
            ("Test", test_name.clone()),
            ("Time", time),
            ("Words typed", result.words_typed.to_string()),
            ("Gross speed", format!("{:.1} wpm", result.gross_wpm)),
            ("Net speed", format!("{:.1} wpm", result.net_wpm)),
            ("Accuracy", format!("{:.1}%", result.accuracy_percent)),
            ("Full mistakes", result.full_mistake_count.to_string()),
            (
                "Half mistakes",
                format!(
                    "{} (Ignored: {})",
                    result.half_mistake_count, result.ignored_mistake_count
                ),
            ),
            ("Total mistakes", format!("{:.1}", result.weighted_mistake_score)),
            (
                "Allowed",
                format!("{}% (≤ {})", result.allowed_mistake_percent, result.allowed_max),
            ),
        ];

        let level_rule = catalog.level_rule(result.level);
        let expected_speed = format!(
            "{} level: {}",
            result.level,
            level_rule.expected_speed.for_language(result.language)
        );

        let breakdown = tally_reasons(result);

        Self {
            title: format!("Result & Analysis: {test_name}"),
            rows,
            passed: result.passed,
            expected_speed,
            breakdown,
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

fn tally_reasons(result: &ScoringResult) -> Vec<BreakdownRow> {
    result
        .mistakes
        .iter()
        .map(|m| (m.reason, m.classification))
        .counts()
        .into_iter()
        .map(|((reason, classification), count)| BreakdownRow {
            reason,
            classification,
            count,
        })
        .sorted_by_key(|row| (row.classification as u8, std::cmp::Reverse(row.count), row.reason as u8))
        .collect()
}

impl fmt::Display for ResultSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            writeln!(f, "  {label:<width$}  {value}")?;
        }
        writeln!(f, "  {:<width$}  {}", "Final Result", self.verdict())?;
        writeln!(f, "  {}", self.expected_speed)?;

        if !self.breakdown.is_empty() {
            writeln!(f)?;
            writeln!(f, "Mistake breakdown")?;
            for row in &self.breakdown {
                writeln!(
                    f,
                    "  {:<30} {:<8} {}",
                    row.reason.describe(),
                    row.classification,
                    row.count
                )?;
            }
        }
        Ok(())
    }
}
