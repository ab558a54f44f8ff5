//! Phase scheduler state machine
//!
//! Tracks one countdown at a time. The host calls [`PhaseScheduler::tick`]
//! once per second while [`PhaseScheduler::is_running`] is true; when the
//! countdown runs out the scheduler picks the next phase itself:
//!
//! - after focus: a long rest every `long_rest_interval` completed focus
//!   phases, a short rest otherwise
//! - after any rest: focus
//!
//! Every operation is defined for every state. Calls that make no sense in the
//! current state (pausing a paused timer, ticking while paused) do nothing.

use tracing::{debug, info};

use crate::observer::{NullObserver, Observer, PhaseEnded};
use crate::phase::{Phase, Settings};

/// Read-only copy of the scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub completed_focus_count: u64,
}

/// Owns the phase, the countdown and the cycle counter
pub struct PhaseScheduler {
    settings: Settings,
    state: Snapshot,
    observer: Box<dyn Observer>,
}

impl PhaseScheduler {
    /// Create a paused scheduler at the start of a focus phase
    pub fn new(settings: Settings) -> Self {
        Self::with_observer(settings, Box::new(NullObserver))
    }

    pub fn with_observer(settings: Settings, observer: Box<dyn Observer>) -> Self {
        Self {
            state: Snapshot {
                phase: Phase::Focus,
                remaining_seconds: settings.durations.of(Phase::Focus),
                is_running: false,
                completed_focus_count: 0,
            },
            settings,
            observer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn completed_focus_count(&self) -> u64 {
        self.state.completed_focus_count
    }

    /// Begin counting down. Does nothing if already running.
    pub fn start(&mut self) {
        if self.state.is_running {
            return;
        }
        self.state.is_running = true;
        debug!(
            phase = self.state.phase.as_str(),
            remaining = self.state.remaining_seconds,
            "timer started"
        );
        self.publish();
    }

    /// Stop counting down, keeping the remaining time. Does nothing if paused.
    pub fn pause(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.state.is_running = false;
        debug!(
            phase = self.state.phase.as_str(),
            remaining = self.state.remaining_seconds,
            "timer paused"
        );
        self.publish();
    }

    /// Stop and rewind the current phase to its full length
    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.remaining_seconds = self.settings.durations.of(self.state.phase);
        debug!(phase = self.state.phase.as_str(), "timer reset");
        self.publish();
    }

    /// Stop and jump to `target` at its full length
    ///
    /// Selecting the phase that is already active behaves like [`reset`].
    /// The cycle counter is never touched.
    ///
    /// [`reset`]: PhaseScheduler::reset
    pub fn switch_phase(&mut self, target: Phase) {
        self.state.is_running = false;
        self.state.phase = target;
        self.state.remaining_seconds = self.settings.durations.of(target);
        debug!(phase = target.as_str(), "switched phase");
        self.publish();
    }

    /// Advance the countdown by one second
    ///
    /// Ignored while paused. A tick that finds the countdown already at zero
    /// expires the phase instead of decrementing; a tick that brings it to
    /// zero expires the phase right away, so a running timer never sits at
    /// zero.
    pub fn tick(&mut self) {
        if !self.state.is_running {
            return;
        }

        if self.state.remaining_seconds == 0 {
            self.expire();
            return;
        }

        self.state.remaining_seconds -= 1;
        if self.state.remaining_seconds == 0 {
            self.expire();
        } else {
            self.publish();
        }
    }

    /// Phase that follows the current one if it expires now
    pub fn upcoming(&self) -> Phase {
        match self.state.phase {
            Phase::Focus => {
                let completed = self.state.completed_focus_count + 1;
                self.rest_after(completed)
            }
            Phase::ShortRest | Phase::LongRest => Phase::Focus,
        }
    }

    fn rest_after(&self, completed_focus_count: u64) -> Phase {
        let interval = u64::from(self.settings.long_rest_interval.max(1));
        if completed_focus_count % interval == 0 {
            Phase::LongRest
        } else {
            Phase::ShortRest
        }
    }

    fn expire(&mut self) {
        let ended = self.state.phase;
        self.state.is_running = false;

        self.observer.phase_ended(&PhaseEnded {
            phase: ended,
            seconds: self.settings.durations.of(ended),
        });

        let next = self.upcoming();
        if ended == Phase::Focus {
            self.state.completed_focus_count += 1;
        }
        info!(
            ended = ended.as_str(),
            next = next.as_str(),
            completed_focus = self.state.completed_focus_count,
            "phase expired"
        );

        self.switch_phase(next);
        if self.settings.auto_start {
            self.start();
        }
    }

    fn publish(&mut self) {
        let snapshot = self.state;
        self.observer.state_changed(&snapshot);
    }
}

impl std::fmt::Debug for PhaseScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseScheduler")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
