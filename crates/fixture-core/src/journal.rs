//! Lifecycle journal for driver-side log assertions.
//!
//! Each lifecycle step appends a JSONL record to `.fixture/lifecycle.jsonl`.
//! The external driver tails this file to confirm that steps actually ran
//! (the clear step in particular announces itself here).

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One journaled lifecycle step.
///
/// ```jsonl
/// {"ts":"2026-08-07T10:23:45Z","scenario":"Noop","step":"configure","detail":"..."}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// ISO 8601 timestamp.
    pub ts: String,

    /// Scenario name.
    pub scenario: String,

    /// Lifecycle step name.
    pub step: String,

    /// Step detail (truncated if large).
    pub detail: String,
}

impl StepRecord {
    /// Maximum detail length before truncation.
    const MAX_DETAIL_LEN: usize = 500;

    /// Creates a new record stamped with the current time.
    pub fn new(scenario: impl Into<String>, step: impl Into<String>, detail: &str) -> Self {
        let detail = if detail.len() > Self::MAX_DETAIL_LEN {
            format!(
                "{}... [truncated, {} chars total]",
                &detail[..Self::MAX_DETAIL_LEN],
                detail.len()
            )
        } else {
            detail.to_string()
        };

        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            scenario: scenario.into(),
            step: step.into(),
            detail,
        }
    }
}

/// Appends lifecycle records to a JSONL file.
pub struct Journal {
    path: PathBuf,
    file: Option<File>,
}

impl Journal {
    /// Default journal path, relative to the fixture's working directory.
    pub const DEFAULT_PATH: &'static str = ".fixture/lifecycle.jsonl";

    /// Creates a journal at the given path. The parent directory is created
    /// on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Creates a journal at the default path.
    pub fn default_path() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }

    fn ensure_open(&mut self) -> std::io::Result<&mut File> {
        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }
        Ok(self.file.as_mut().unwrap())
    }

    /// Appends a record.
    pub fn log(&mut self, record: &StepRecord) -> std::io::Result<()> {
        let file = self.ensure_open()?;
        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;
        file.flush()?;
        debug!(scenario = %record.scenario, step = %record.step, "lifecycle step journaled");
        Ok(())
    }

    /// Convenience method to journal a step directly.
    pub fn log_step(&mut self, scenario: &str, step: &str, detail: &str) -> std::io::Result<()> {
        self.log(&StepRecord::new(scenario, step, detail))
    }

    /// The journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reader for journal files.
pub struct JournalHistory {
    path: PathBuf,
}

impl JournalHistory {
    /// Creates a reader for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a reader for the default path.
    pub fn default_path() -> Self {
        Self::new(Journal::DEFAULT_PATH)
    }

    /// Returns true if the journal file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads every record, skipping unparseable lines with a warning.
    pub fn read_all(&self) -> std::io::Result<Vec<StepRecord>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line = line_num + 1, error = %e, "failed to parse journal record");
                }
            }
        }

        Ok(records)
    }

    /// Reads the last N records.
    pub fn read_last(&self, n: usize) -> std::io::Result<Vec<StepRecord>> {
        let all = self.read_all()?;
        let start = all.len().saturating_sub(n);
        Ok(all[start..].to_vec())
    }

    /// Reads records for one scenario.
    pub fn filter_by_scenario(&self, scenario: &str) -> std::io::Result<Vec<StepRecord>> {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(|r| r.scenario == scenario).collect())
    }

    /// Reads records for one lifecycle step.
    pub fn filter_by_step(&self, step: &str) -> std::io::Result<Vec<StepRecord>> {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(|r| r.step == step).collect())
    }

    /// Removes the journal file.
    pub fn clear(&self) -> std::io::Result<()> {
        if self.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
