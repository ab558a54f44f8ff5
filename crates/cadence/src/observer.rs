//! Collaborators that watch the scheduler
//!
//! The scheduler never renders or alerts on its own. It reports to an
//! [`Observer`] and carries on without waiting for it.

use tokio::sync::mpsc;
use tracing::info;

use crate::phase::Phase;
use crate::scheduler::Snapshot;

/// Signal emitted when a phase runs out, before the next one is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEnded {
    /// The phase that just expired
    pub phase: Phase,
    /// Its full configured length in seconds
    pub seconds: u32,
}

/// Receives scheduler output
pub trait Observer: Send {
    /// A phase reached natural expiry
    fn phase_ended(&mut self, event: &PhaseEnded);

    /// Called after every mutation with the resulting state
    fn state_changed(&mut self, _snapshot: &Snapshot) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn phase_ended(&mut self, _event: &PhaseEnded) {}
}

/// Logs phase completions through `tracing`
#[derive(Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn phase_ended(&mut self, event: &PhaseEnded) {
        info!(phase = event.phase.as_str(), seconds = event.seconds, "phase finished");
    }
}

/// Forwards to several observers in order
#[derive(Default)]
pub struct Fanout {
    observers: Vec<Box<dyn Observer>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl Observer + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn push(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Observer for Fanout {
    fn phase_ended(&mut self, event: &PhaseEnded) {
        for observer in &mut self.observers {
            observer.phase_ended(event);
        }
    }

    fn state_changed(&mut self, snapshot: &Snapshot) {
        for observer in &mut self.observers {
            observer.state_changed(snapshot);
        }
    }
}

/// Scheduler output as a single stream, for consumers on another task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    StateChanged(Snapshot),
    PhaseEnded(PhaseEnded),
}

impl Observer for mpsc::UnboundedSender<Event> {
    fn phase_ended(&mut self, event: &PhaseEnded) {
        // A closed receiver only means nobody is displaying anymore
        let _ = self.send(Event::PhaseEnded(*event));
    }

    fn state_changed(&mut self, snapshot: &Snapshot) {
        let _ = self.send(Event::StateChanged(*snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Counting {
        ended: Arc<Mutex<u32>>,
        changed: Arc<Mutex<u32>>,
    }

    impl Observer for Counting {
        fn phase_ended(&mut self, _event: &PhaseEnded) {
            *self.ended.lock().unwrap() += 1;
        }

        fn state_changed(&mut self, _snapshot: &Snapshot) {
            *self.changed.lock().unwrap() += 1;
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            phase: Phase::Focus,
            remaining_seconds: 10,
            is_running: false,
            completed_focus_count: 0,
        }
    }

    #[test]
    fn test_fanout_reaches_every_observer() {
        let a = Counting::default();
        let b = Counting::default();
        let mut fanout = Fanout::new().with(a.clone()).with(b.clone()).with(NullObserver);
        assert_eq!(fanout.len(), 3);

        let event = PhaseEnded {
            phase: Phase::Focus,
            seconds: 1500,
        };
        fanout.phase_ended(&event);
        fanout.state_changed(&snapshot());
        fanout.state_changed(&snapshot());

        for counting in [a, b] {
            assert_eq!(*counting.ended.lock().unwrap(), 1);
            assert_eq!(*counting.changed.lock().unwrap(), 2);
        }
    }

    #[test]
    fn test_channel_observer_forwards_events() {
        let (mut tx, mut rx) = mpsc::unbounded_channel::<Event>();
        tx.state_changed(&snapshot());
        tx.phase_ended(&PhaseEnded {
            phase: Phase::LongRest,
            seconds: 900,
        });

        assert_eq!(rx.try_recv().unwrap(), Event::StateChanged(snapshot()));
        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::PhaseEnded(PhaseEnded {
                phase: Phase::LongRest,
                ..
            })
        ));
    }

    #[test]
    fn test_channel_observer_survives_closed_receiver() {
        let (mut tx, rx) = mpsc::unbounded_channel::<Event>();
        drop(rx);
        tx.state_changed(&snapshot());
    }
}
