//! Host loop that owns the scheduler
//!
//! The runner is the only place scheduler operations are called from, so
//! they are applied one at a time. Other tasks talk to it through a
//! [`Command`] channel. The clock is only polled while the timer runs.

use tokio::sync::mpsc;
use tracing::debug;

use crate::clock::Clock;
use crate::phase::Phase;
use crate::scheduler::{PhaseScheduler, Snapshot};

/// Requests accepted by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Start when paused, pause when running
    Toggle,
    Reset,
    Switch(Phase),
    Quit,
}

impl Command {
    /// Parse one line of interactive input
    ///
    /// An empty line toggles, mirroring a single start/pause button.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        match input.as_str() {
            "" | "t" | "toggle" => Some(Command::Toggle),
            "s" | "start" => Some(Command::Start),
            "p" | "pause" => Some(Command::Pause),
            "r" | "reset" => Some(Command::Reset),
            "q" | "quit" | "exit" => Some(Command::Quit),
            other => Phase::parse(other).map(Command::Switch),
        }
    }
}

/// Drives a [`PhaseScheduler`] from a clock and a command stream
pub struct Runner<C: Clock> {
    scheduler: PhaseScheduler,
    clock: C,
    commands: mpsc::Receiver<Command>,
}

impl<C: Clock> Runner<C> {
    pub fn new(scheduler: PhaseScheduler, clock: C, commands: mpsc::Receiver<Command>) -> Self {
        Self {
            scheduler,
            clock,
            commands,
        }
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    /// Run until [`Command::Quit`] or until every sender is dropped
    ///
    /// Returns the final state.
    pub async fn run(mut self) -> Snapshot {
        if self.scheduler.is_running() {
            self.clock.restart();
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.apply(command),
                },
                _ = self.clock.tick(), if self.scheduler.is_running() => {
                    self.scheduler.tick();
                }
            }
        }

        debug!("runner stopped");
        self.scheduler.snapshot()
    }

    /// Apply one command to the scheduler
    pub fn apply(&mut self, command: Command) {
        debug!(?command, "applying command");
        let was_running = self.scheduler.is_running();

        match command {
            Command::Start => self.scheduler.start(),
            Command::Pause => self.scheduler.pause(),
            Command::Toggle if was_running => self.scheduler.pause(),
            Command::Toggle => self.scheduler.start(),
            Command::Reset => self.scheduler.reset(),
            Command::Switch(phase) => self.scheduler.switch_phase(phase),
            Command::Quit => {}
        }

        if !was_running && self.scheduler.is_running() {
            self.clock.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::IntervalClock;
    use crate::observer::Event;
    use crate::phase::{PhaseDurations, Settings};
    use std::time::Duration;
    use tokio::time::sleep;

    fn spawn_runner(
        scheduler: PhaseScheduler,
    ) -> (
        mpsc::Sender<Command>,
        tokio::task::JoinHandle<Snapshot>,
    ) {
        let (tx, rx) = mpsc::channel(16);
        let runner = Runner::new(scheduler, IntervalClock::every_second(), rx);
        (tx, tokio::spawn(runner.run()))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(""), Some(Command::Toggle));
        assert_eq!(Command::parse("s"), Some(Command::Start));
        assert_eq!(Command::parse(" Pause "), Some(Command::Pause));
        assert_eq!(Command::parse("r"), Some(Command::Reset));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("f"), Some(Command::Switch(Phase::Focus)));
        assert_eq!(Command::parse("sr"), Some(Command::Switch(Phase::ShortRest)));
        assert_eq!(Command::parse("lr"), Some(Command::Switch(Phase::LongRest)));
        assert_eq!(Command::parse("coffee"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second_while_running() {
        let (tx, handle) = spawn_runner(PhaseScheduler::new(Settings::default()));

        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(3500)).await;
        tx.send(Command::Quit).await.unwrap();

        let snapshot = handle.await.unwrap();
        assert_eq!(snapshot.phase, Phase::Focus);
        assert_eq!(snapshot.remaining_seconds, 1497);
        assert!(snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_while_paused() {
        let (tx, handle) = spawn_runner(PhaseScheduler::new(Settings::default()));

        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        tx.send(Command::Pause).await.unwrap();
        sleep(Duration::from_secs(10)).await;
        tx.send(Command::Toggle).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        tx.send(Command::Quit).await.unwrap();

        let snapshot = handle.await.unwrap();
        assert_eq!(snapshot.remaining_seconds, 1497);
        assert!(snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_stops_ticking() {
        let (tx, handle) = spawn_runner(PhaseScheduler::new(Settings::default()));

        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(5500)).await;
        tx.send(Command::Switch(Phase::LongRest)).await.unwrap();
        sleep(Duration::from_secs(5)).await;
        tx.send(Command::Quit).await.unwrap();

        let snapshot = handle.await.unwrap();
        assert_eq!(snapshot.phase, Phase::LongRest);
        assert_eq!(snapshot.remaining_seconds, 900);
        assert!(!snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phases_advance_and_report() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<Event>();
        let settings = Settings::with_durations(PhaseDurations::new(2, 1, 5));
        let scheduler = PhaseScheduler::with_observer(settings, Box::new(events_tx));
        let (tx, handle) = spawn_runner(scheduler);

        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(3500)).await;
        tx.send(Command::Quit).await.unwrap();

        let snapshot = handle.await.unwrap();
        assert_eq!(snapshot.phase, Phase::Focus);
        assert_eq!(snapshot.remaining_seconds, 2);
        assert!(snapshot.is_running);
        assert_eq!(snapshot.completed_focus_count, 1);

        let mut ended = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            if let Event::PhaseEnded(event) = event {
                ended.push(event.phase);
            }
        }
        assert_eq!(ended, vec![Phase::Focus, Phase::ShortRest]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_senders_dropped() {
        let (tx, handle) = spawn_runner(PhaseScheduler::new(Settings::default()));

        tx.send(Command::Reset).await.unwrap();
        drop(tx);

        let snapshot = handle.await.unwrap();
        assert_eq!(snapshot.remaining_seconds, 1500);
        assert!(!snapshot.is_running);
    }
}
