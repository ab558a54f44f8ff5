//! Phase history storage
//!
//! Every phase that runs out is appended to a daily log:
//! - ~/.local/share/cadence/history/phases-YYYY-MM-DD.jsonl
//!
//! Only natural expiries are recorded. Manual switches and resets leave no
//! trace, matching the cycle counter.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::observer::{Observer, PhaseEnded};
use crate::phase::Phase;

/// One finished phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    /// Full length of the phase in seconds
    pub seconds: u32,
    pub ended_at: DateTime<Utc>,
}

impl PhaseRecord {
    pub fn new(phase: Phase, seconds: u32) -> Self {
        Self {
            phase,
            seconds,
            ended_at: Utc::now(),
        }
    }
}

impl From<&PhaseEnded> for PhaseRecord {
    fn from(event: &PhaseEnded) -> Self {
        Self::new(event.phase, event.seconds)
    }
}

/// Append-only phase history
#[derive(Debug, Clone)]
pub struct HistoryStore {
    data_dir: PathBuf,
}

impl HistoryStore {
    /// Create a store in the given directory, creating it if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create history directory: {}", data_dir.display())
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn log_path(&self, date: &NaiveDate) -> PathBuf {
        self.data_dir.join(format!("phases-{}.jsonl", date))
    }

    /// Append a record to the log for the day it ended
    pub fn record(&self, record: &PhaseRecord) -> Result<()> {
        let path = self.log_path(&record.ended_at.date_naive());
        let line = serde_json::to_string(record).context("Failed to serialize phase record")?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open history log: {}", path.display()))?;

        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write history log: {}", path.display()))
    }

    /// All records for one day
    pub fn records_for_date(&self, date: &NaiveDate) -> Result<Vec<PhaseRecord>> {
        let path = self.log_path(date);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&path)
            .with_context(|| format!("Failed to open history log: {}", path.display()))?;

        let mut records = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| {
                format!("Failed to read line {} of {}", line_num + 1, path.display())
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<PhaseRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        line = line_num + 1,
                        "skipping unreadable history entry: {}",
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    /// All records for the last `days` days including today, oldest first
    pub fn records_for_days(&self, days: u32) -> Result<Vec<PhaseRecord>> {
        let today = Utc::now().date_naive();
        let mut records = Vec::new();

        for i in 0..days {
            let date = today - chrono::Duration::days(i64::from(i));
            records.extend(self.records_for_date(&date)?);
        }

        records.sort_by_key(|r| r.ended_at);
        Ok(records)
    }
}

/// Writes every finished phase to a [`HistoryStore`]
pub struct HistoryObserver {
    store: HistoryStore,
}

impl HistoryObserver {
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }
}

impl Observer for HistoryObserver {
    fn phase_ended(&mut self, event: &PhaseEnded) {
        if let Err(e) = self.store.record(&PhaseRecord::from(event)) {
            warn!("Failed to record finished phase: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_store(test_name: &str) -> (HistoryStore, PathBuf) {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = env::temp_dir().join(format!(
            "cadence_history_test_{}_{}_{}",
            std::process::id(),
            test_name,
            counter
        ));
        let _ = fs::remove_dir_all(&temp_dir);
        let store = HistoryStore::new(&temp_dir).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_empty_history() {
        let (store, temp_dir) = temp_store("empty");
        assert!(store.records_for_days(7).unwrap().is_empty());
        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_record_and_read_back() {
        let (store, temp_dir) = temp_store("record");

        store.record(&PhaseRecord::new(Phase::Focus, 1500)).unwrap();
        store.record(&PhaseRecord::new(Phase::ShortRest, 300)).unwrap();

        let records = store.records_for_days(1).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phase, Phase::Focus);
        assert_eq!(records[1].seconds, 300);

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let (store, temp_dir) = temp_store("corrupt");

        let record = PhaseRecord::new(Phase::LongRest, 900);
        store.record(&record).unwrap();

        let path = store.log_path(&record.ended_at.date_naive());
        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();

        let records = store.records_for_date(&record.ended_at.date_naive()).unwrap();
        assert_eq!(records, vec![record]);

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_observer_records_phase_end() {
        let (store, temp_dir) = temp_store("observer");
        let mut observer = HistoryObserver::new(store.clone());

        observer.phase_ended(&PhaseEnded {
            phase: Phase::Focus,
            seconds: 1500,
        });

        let records = store.records_for_days(1).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phase, Phase::Focus);

        let _ = fs::remove_dir_all(&temp_dir);
    }
}
