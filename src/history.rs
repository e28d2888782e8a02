use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{engine::ScoringResult, error::Result, util};

/// One line of the results log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: DateTime<Local>,
    pub candidate: String,
    pub exam: String,
    pub language: String,
    pub mode: String,
    pub elapsed_secs: f64,
    pub words_typed: usize,
    pub gross_wpm: f64,
    pub net_wpm: f64,
    pub accuracy: f64,
    pub full: usize,
    pub half: usize,
    pub ignored: usize,
    pub weighted: f64,
    pub allowed_max: usize,
    pub passed: bool,
}

impl HistoryRecord {
    pub fn from_result(result: &ScoringResult, candidate: Option<&str>, date: DateTime<Local>) -> Self {
        Self {
            date,
            candidate: candidate.unwrap_or_default().to_string(),
            exam: result.exam_profile.clone().unwrap_or_default(),
            language: result.language.to_string(),
            mode: result.scoring_mode.to_string(),
            elapsed_secs: round2(result.elapsed_seconds),
            words_typed: result.words_typed,
            gross_wpm: round2(result.gross_wpm),
            net_wpm: round2(result.net_wpm),
            accuracy: round2(result.accuracy_percent),
            full: result.full_mistake_count,
            half: result.half_mistake_count,
            ignored: result.ignored_mistake_count,
            weighted: result.weighted_mistake_score,
            allowed_max: result.allowed_max,
            passed: result.passed,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Append-only CSV log of finished attempts.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // a new file starts with the header row
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        info!(path = %self.path.display(), "result saved");
        Ok(())
    }

    /// Every record, oldest first. A missing log reads as empty.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        Ok(records)
    }

    /// The last `count` records, newest last.
    pub fn recent(&self, count: usize) -> Result<Vec<HistoryRecord>> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(count);
        Ok(records.split_off(skip))
    }
}

pub fn mean_net_wpm(records: &[HistoryRecord]) -> Option<f64> {
    let speeds: Vec<f64> = records.iter().map(|r| r.net_wpm).collect();
    util::mean(&speeds)
}

/// Spread of net speed across attempts; low means a steady pace.
pub fn net_wpm_spread(records: &[HistoryRecord]) -> Option<f64> {
    let speeds: Vec<f64> = records.iter().map(|r| r.net_wpm).collect();
    util::std_dev(&speeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{Engine, EvaluateOptions},
        language::Language,
    };
    use tempfile::tempdir;

    fn record(net_wpm: f64) -> HistoryRecord {
        let engine = Engine::with_builtin_profiles().unwrap();
        let result = engine.evaluate(
            "The quick fox",
            "The quick fox",
            60.0,
            Language::English,
            &EvaluateOptions::with_profile("SSC_D"),
        );
        let mut record = HistoryRecord::from_result(&result, Some("Asha"), Local::now());
        record.net_wpm = net_wpm;
        record
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("results.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("state").join("results.csv"));
        log.append(&record(20.0)).unwrap();
        log.append(&record(30.0)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches("candidate").count(), 1);

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].candidate, "Asha");
        assert_eq!(records[0].exam, "SSC_D");
        assert!(records[0].passed);
        assert_eq!(mean_net_wpm(&records), Some(25.0));
        assert_eq!(net_wpm_spread(&records), Some(5.0));
    }

    #[test]
    fn test_recent_keeps_newest() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("results.csv"));
        for wpm in [10.0, 20.0, 30.0] {
            log.append(&record(wpm)).unwrap();
        }
        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].net_wpm, 20.0);
        assert_eq!(recent[1].net_wpm, 30.0);
    }
}
