//! Phase statistics
//!
//! Aggregates history records into totals per phase kind.

use crate::history::PhaseRecord;
use crate::phase::Phase;

/// Aggregated phase statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseStats {
    /// Completed focus phases
    pub focus_count: u32,
    pub short_rest_count: u32,
    pub long_rest_count: u32,
    /// Total focus time in seconds
    pub focus_seconds: u64,
    /// Total rest time in seconds
    pub rest_seconds: u64,
}

impl PhaseStats {
    pub fn from_records(records: &[PhaseRecord]) -> Self {
        let mut stats = Self::default();

        for record in records {
            let seconds = u64::from(record.seconds);
            match record.phase {
                Phase::Focus => {
                    stats.focus_count += 1;
                    stats.focus_seconds += seconds;
                }
                Phase::ShortRest => {
                    stats.short_rest_count += 1;
                    stats.rest_seconds += seconds;
                }
                Phase::LongRest => {
                    stats.long_rest_count += 1;
                    stats.rest_seconds += seconds;
                }
            }
        }

        stats
    }

    /// Number of full focus + rest cycles
    pub fn cycles(&self) -> u32 {
        self.focus_count
            .min(self.short_rest_count + self.long_rest_count)
    }

    /// Total focus time as (hours, minutes)
    pub fn focus_time(&self) -> (u64, u64) {
        let minutes = self.focus_seconds / 60;
        (minutes / 60, minutes % 60)
    }

    /// Share of tracked time spent focusing (0-100)
    pub fn focus_ratio(&self) -> u32 {
        let total = self.focus_seconds + self.rest_seconds;
        if total == 0 {
            return 0;
        }
        ((self.focus_seconds * 100) / total) as u32
    }
}
