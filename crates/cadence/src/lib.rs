//! cadence - Focus/rest phase timer
//!
//! "Work in rhythm, rest on schedule."
//!
//! A single countdown moves through focus and rest phases:
//! - Focus, then a short rest, repeated
//! - Every fourth completed focus phase earns a long rest instead
//! - The next phase starts on its own when the current one runs out
//!
//! The state machine lives in [`scheduler`]. It never touches a timer or the
//! terminal: a [`runner::Runner`] feeds it ticks from a [`clock::Clock`] and
//! an [`observer::Observer`] receives what it reports.

pub mod clock;
pub mod history;
pub mod observer;
pub mod phase;
pub mod runner;
pub mod scheduler;
pub mod stats;

pub use clock::{Clock, IntervalClock};
pub use history::{HistoryObserver, HistoryStore, PhaseRecord};
pub use observer::{Event, Fanout, LogObserver, NullObserver, Observer, PhaseEnded};
pub use phase::{Phase, PhaseDurations, Settings};
pub use runner::{Command, Runner};
pub use scheduler::{PhaseScheduler, Snapshot};
pub use stats::PhaseStats;
