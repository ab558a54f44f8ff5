//! cadence - Focus/rest phase timer
//!
//! Usage:
//!   cadence [run]               Run the interactive timer (default)
//!   cadence run --start         Start the first focus phase right away
//!   cadence stats [DAYS]        Show finished phases for the last DAYS days
//!   cadence config [--init]     Show or create the configuration file

use anyhow::{bail, Context, Result};
use cadence_core::{format, Config, Paths};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use cadence::{
    Command, Event, Fanout, HistoryObserver, HistoryStore, IntervalClock, LogObserver,
    PhaseScheduler, PhaseStats, Runner, Settings, Snapshot,
};

/// cadence - Focus/rest phase timer
#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Focus/rest phase timer with automatic long rests")]
#[command(version)]
#[command(after_help = r#"RHYTHM:
    Focus 25 min, then rest 5 min. Every 4th finished focus phase is
    followed by a 15 min rest instead. The next phase starts by itself.

INTERACTIVE KEYS (type, then Enter):
    <Enter>, t   start/pause
    s            start
    p            pause
    r            reset current phase
    f, sr, lr    switch to focus / short rest / long rest
    q            quit

EXAMPLES:
    cadence                          # Open the timer, paused
    cadence run --start              # Start focusing immediately
    cadence run --focus 3000 --short 600
    cadence stats 30                 # Finished phases over 30 days
    cadence config --init            # Write ~/.config/cadence/config.json

LOGGING:
    RUST_LOG=cadence=debug cadence   # Trace every transition on stderr
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive timer
    #[command(alias = "r")]
    Run(RunArgs),

    /// Show statistics of finished phases
    #[command(alias = "statistics")]
    Stats {
        /// Number of days to show (default: 7)
        #[arg(default_value = "7")]
        days: u32,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Focus length in seconds
    #[arg(long, value_name = "SECS")]
    focus: Option<u32>,

    /// Short rest length in seconds
    #[arg(long, value_name = "SECS")]
    short: Option<u32>,

    /// Long rest length in seconds
    #[arg(long, value_name = "SECS")]
    long: Option<u32>,

    /// Long rest after every N focus phases
    #[arg(long, value_name = "N")]
    interval: Option<u32>,

    /// Wait for input when a phase ends instead of starting the next one
    #[arg(long)]
    no_auto_start: bool,

    /// Start the first focus phase immediately
    #[arg(long)]
    start: bool,

    /// Don't record finished phases
    #[arg(long)]
    no_history: bool,
}

impl RunArgs {
    /// Layer command line flags over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.focus {
            config.focus_seconds = secs;
        }
        if let Some(secs) = self.short {
            config.short_rest_seconds = secs;
        }
        if let Some(secs) = self.long {
            config.long_rest_seconds = secs;
        }
        if let Some(n) = self.interval {
            config.long_rest_interval = n;
        }
        if self.no_auto_start {
            config.auto_start = false;
        }
    }
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const YELLOW: &str = "\x1b[0;33m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the timer display
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = Paths::new();

    match cli.command {
        Some(Commands::Run(args)) => cmd_run(&paths, &args).await,
        Some(Commands::Stats { days }) => cmd_stats(&paths, days),
        Some(Commands::Config { init, force }) => cmd_config(&paths, init, force),
        None => cmd_run(&paths, &RunArgs::default()).await,
    }
}

/// Run the interactive timer until the user quits
async fn cmd_run(paths: &Paths, args: &RunArgs) -> Result<()> {
    let config_path = paths.config_file();
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    args.apply(&mut config);
    config.validate().context("Invalid timer settings")?;

    let settings = Settings::from(&config);
    tracing::info!(?settings, "starting timer");

    let (events_tx, events_rx) = mpsc::unbounded_channel::<Event>();
    let mut observers = Fanout::new().with(LogObserver).with(events_tx);
    if !args.no_history {
        let store = HistoryStore::new(&paths.history())?;
        observers.push(Box::new(HistoryObserver::new(store)));
    }

    let mut scheduler = PhaseScheduler::with_observer(settings, Box::new(observers));
    println!("{}", color(BOLD, "cadence"));
    println!("Enter toggles start/pause, 'q' quits, '?' lists keys.");
    println!();
    let display_task = tokio::spawn(display(events_rx, scheduler.snapshot()));

    if args.start {
        scheduler.start();
    }

    let (commands_tx, commands_rx) = mpsc::channel(16);
    spawn_input(commands_tx);

    let runner = Runner::new(scheduler, IntervalClock::every_second(), commands_rx);
    let last = runner.run().await;

    // The runner dropped the scheduler and with it the event sender
    display_task.await.context("Display task failed")?;

    println!(
        "{} {} finished focus phase(s)",
        color(GREEN, "[ok]"),
        last.completed_focus_count
    );
    Ok(())
}

/// Read commands from stdin on a plain thread
///
/// Blocking reads would otherwise hold the runtime open at shutdown.
fn spawn_input(commands: mpsc::Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };

            if line.trim() == "?" {
                println!("\n{}", KEY_HELP);
                continue;
            }

            match Command::parse(&line) {
                Some(command) => {
                    if commands.blocking_send(command).is_err() || command == Command::Quit {
                        return;
                    }
                }
                None => println!("\nUnknown command: {}", line.trim()),
            }
        }

        let _ = commands.blocking_send(Command::Quit);
    });
}

const KEY_HELP: &str = "<Enter>/t start-pause, s start, p pause, r reset, f/sr/lr switch, q quit";

/// Render scheduler events until the scheduler goes away
async fn display(mut events: mpsc::UnboundedReceiver<Event>, initial: Snapshot) {
    let redraw = use_colors();
    draw(&initial, redraw);

    while let Some(event) = events.recv().await {
        match event {
            Event::StateChanged(snapshot) => draw(&snapshot, redraw),
            Event::PhaseEnded(ended) => {
                if redraw {
                    print!("\r\x1b[2K");
                }
                println!(
                    "{} {} finished ({})",
                    color(GREEN, "[done]"),
                    ended.phase.label(),
                    format::duration(u64::from(ended.seconds))
                );
            }
        }
    }

    if redraw {
        println!();
    }
}

fn draw(snapshot: &Snapshot, redraw: bool) {
    let line = status_line(snapshot);
    if redraw {
        let phase_color = if snapshot.phase.is_rest() { GREEN } else { MAGENTA };
        print!("\r\x1b[2K{}{}{}", phase_color, line, NC);
        let _ = std::io::stdout().flush();
    } else {
        println!("{}", line);
    }
}

/// One line summary of the timer: phase, mm:ss, state and cycle count
fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "{:<10}  {}  {:<7}  focus done: {}",
        snapshot.phase.label(),
        format::clock(snapshot.remaining_seconds),
        if snapshot.is_running { "running" } else { "paused" },
        snapshot.completed_focus_count
    )
}

/// Show phase statistics
fn cmd_stats(paths: &Paths, days: u32) -> Result<()> {
    if days == 0 {
        bail!("DAYS must be at least 1");
    }

    let store = HistoryStore::new(&paths.history())?;
    let records = store.records_for_days(days)?;
    let stats = PhaseStats::from_records(&records);
    let (hours, mins) = stats.focus_time();

    println!("{}Phase Statistics (Last {} days){}", BOLD, days, NC);
    println!();
    println!("  {}     {}", color(CYAN, "Focus phases:"), stats.focus_count);
    println!("  {}      {}", color(CYAN, "Short rests:"), stats.short_rest_count);
    println!("  {}       {}", color(CYAN, "Long rests:"), stats.long_rest_count);
    println!("  {}           {}", color(CYAN, "Cycles:"), stats.cycles());
    println!("  {}       {}h {}m", color(CYAN, "Focus time:"), hours, mins);
    println!(
        "  {}        {}",
        color(CYAN, "Rest time:"),
        format::duration(stats.rest_seconds)
    );

    if let Some(last) = records.last() {
        println!();
        println!(
            "  {} {} at {}",
            color(YELLOW, "Last finished:"),
            last.phase.label(),
            format::time(last.ended_at)
        );
    }

    Ok(())
}

/// Show or initialise the configuration file
fn cmd_config(paths: &Paths, init: bool, force: bool) -> Result<()> {
    let path = paths.config_file();

    if init {
        if path.exists() && !force {
            bail!(
                "Config already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        Config::default()
            .save(&path)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        println!("{} Wrote {}", color(GREEN, "[ok]"), path.display());
        return Ok(());
    }

    let config = Config::load(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;

    if path.exists() {
        println!("{} {}", color(CYAN, "Config file:"), path.display());
    } else {
        println!(
            "{} {} (not found, using defaults)",
            color(CYAN, "Config file:"),
            path.display()
        );
    }
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
