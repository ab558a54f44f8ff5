//! Tick sources for the runner
//!
//! The scheduler has no timer of its own. A [`Clock`] resolves once per unit
//! of time and the runner forwards each resolution as a tick.

use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Fires once per unit of time
pub trait Clock: Send {
    /// Resolve at the next tick
    fn tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Push the next tick a full period away, called when the timer starts
    fn restart(&mut self);
}

/// Wall clock backed by a tokio interval
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        // A late tick is still one second of countdown, never a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

impl Clock for IntervalClock {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    fn restart(&mut self) {
        self.interval.reset();
    }
}
