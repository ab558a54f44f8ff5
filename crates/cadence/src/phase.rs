//! Phase types and their configured durations
//!
//! A cycle alternates focus with rest: most focus phases are followed by a
//! short rest, every n-th one by a long rest.

use cadence_core::Config;
use serde::{Deserialize, Serialize};

/// One of the timed segments of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Concentrated work
    Focus,
    /// Break after most focus phases
    ShortRest,
    /// Break after every n-th focus phase
    LongRest,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Focus, Phase::ShortRest, Phase::LongRest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::ShortRest => "short_rest",
            Phase::LongRest => "long_rest",
        }
    }

    /// Human readable name for display
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortRest => "Short rest",
            Phase::LongRest => "Long rest",
        }
    }

    /// Parse a phase name, accepting the short aliases used on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "focus" | "f" | "pomodoro" => Some(Phase::Focus),
            "short_rest" | "short-rest" | "short" | "sr" => Some(Phase::ShortRest),
            "long_rest" | "long-rest" | "long" | "lr" => Some(Phase::LongRest),
            _ => None,
        }
    }

    pub fn is_rest(&self) -> bool {
        !matches!(self, Phase::Focus)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Full length of each phase, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub focus: u32,
    pub short_rest: u32,
    pub long_rest: u32,
}

impl PhaseDurations {
    pub fn new(focus: u32, short_rest: u32, long_rest: u32) -> Self {
        Self {
            focus,
            short_rest,
            long_rest,
        }
    }

    /// Reset duration for a phase
    pub fn of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus,
            Phase::ShortRest => self.short_rest,
            Phase::LongRest => self.long_rest,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::new(1500, 300, 900)
    }
}

/// Everything the scheduler needs to know up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub durations: PhaseDurations,
    /// Every n-th completed focus phase is followed by a long rest
    pub long_rest_interval: u32,
    /// Start the next phase as soon as one expires
    pub auto_start: bool,
}

impl Settings {
    pub fn with_durations(durations: PhaseDurations) -> Self {
        Self {
            durations,
            ..Default::default()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::default(),
            long_rest_interval: 4,
            auto_start: true,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            durations: PhaseDurations::new(
                config.focus_seconds,
                config.short_rest_seconds,
                config.long_rest_seconds,
            ),
            long_rest_interval: config.long_rest_interval,
            auto_start: config.auto_start,
        }
    }
}
