mod api;
mod app;
mod assistant;
mod config;
mod domain;
mod focus;
mod input;
mod notifications;
mod process;
mod ticker;
mod timetable;
mod ui;

use anyhow::{Context, Result};
use api::{ApiWorker, HttpTaskApi, TaskApi};
use app::{AppOptions, AppState, Effect};
use assistant::{CommandRecognizer, Recognizer, Speaker, SystemSpeaker, VoiceRunner};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{iso_date, priority_badge, project, Tab};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use ticker::Ticker;
use timetable::{resolve_day, SlotContent};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowdesk")]
#[command(about = "A terminal client for your task service: inbox, daily timetable, and focus timer", long_about = None)]
struct Cli {
    /// Task service base URL (overrides config and FLOWDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file path. Defaults to <config dir>/flowdesk/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tasks of one view
    List {
        #[arg(short, long, value_enum, default_value = "inbox")]
        tab: Tab,
    },
    /// Create a task from a natural-language command, e.g. "Gym friday 6pm 90m P1"
    Command {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print the timetable for a day, ghost suggestions included
    Timetable {
        /// Date (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Book the ghost suggestion at a time slot
    Solidify {
        /// Slot time (HH:MM), as shown by `timetable`
        time: String,
        /// Date (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(command) => {
            init_stderr_logging(cli.verbose);
            let config = Config::load(cli.config.as_deref(), cli.api_url.as_deref())?;
            let api = HttpTaskApi::new(&config.api_url, config.request_timeout())?;
            run_command(&api, command)
        }
        None => {
            let config = Config::load(cli.config.as_deref(), cli.api_url.as_deref())?;
            init_file_logging(&config, cli.verbose)?;
            run_tui(config)
        }
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(io::stderr)
        .init();
}

/// The terminal belongs to the UI, so the TUI logs to a file
fn init_file_logging(config: &Config, verbose: bool) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    info!(path = %log_path.display(), "logging to file");
    Ok(())
}

fn run_command(api: &HttpTaskApi, command: Commands) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Commands::List { tab } => {
            let tasks = api.fetch_tasks()?;
            let visible = project(&tasks, tab, &iso_date(today));
            println!("{} ({})", tab.page_title(), visible.len());
            for task in visible {
                let subtitle = task.subtitle();
                println!("  {:>5}  {}  {}", task.id, priority_badge(task.priority), task.name);
                if !subtitle.is_empty() {
                    println!("                {}", subtitle);
                }
            }
            Ok(())
        }
        Commands::Command { text } => {
            let text = text.join(" ");
            match api.run_command(&text) {
                Ok(()) => {
                    println!("Created: {}", text);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", e.user_message(app::COMMAND_FALLBACK_ERROR));
                    std::process::exit(1);
                }
            }
        }
        Commands::Timetable { date } => {
            let date = parse_date_arg(date, today)?;
            let tasks = api.fetch_tasks()?;
            let ghosts = api.fetch_ghosts(date)?;

            println!("Daily Flow {}", date.format("%a %d %b %Y"));
            for slot in resolve_day(&tasks, &ghosts, &iso_date(date)) {
                match slot.content {
                    SlotContent::Booking(task) => println!(
                        "  {} │ {}  {} • {}m",
                        slot.label,
                        task.name,
                        priority_badge(task.priority),
                        task.duration
                    ),
                    SlotContent::Ghost(ghost) => println!(
                        "  {} ┆ ghost: {}  {} • {}m",
                        slot.label,
                        ghost.name,
                        priority_badge(ghost.priority),
                        ghost.duration
                    ),
                    SlotContent::Empty => println!("  {} │", slot.label),
                }
            }
            Ok(())
        }
        Commands::Solidify { time, date } => {
            let date = parse_date_arg(date, today)?;
            let ghosts = api.fetch_ghosts(date)?;
            let ghost = ghosts
                .iter()
                .find(|g| g.suggested_time.trim() == time.trim())
                .ok_or_else(|| anyhow::anyhow!("No ghost suggestion at {} on {}", time, date))?;

            let tasks = match timetable::solidify(api, ghost, date) {
                Ok(tasks) => tasks,
                Err(e) => {
                    eprintln!("{}", e.api_error().user_message(&e.to_string()));
                    std::process::exit(1);
                }
            };
            let booked = tasks.iter().any(|t| t.id == ghost.task_id && t.is_scheduled());
            println!(
                "Booked {} at {} on {}{}",
                ghost.name,
                ghost.suggested_time,
                iso_date(date),
                if booked { "" } else { " (not yet visible)" }
            );
            Ok(())
        }
    }
}

fn parse_date_arg(raw: Option<String>, today: NaiveDate) -> Result<NaiveDate> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e)),
        None => Ok(today),
    }
}

fn run_tui(config: Config) -> Result<()> {
    let api = HttpTaskApi::new(&config.api_url, config.request_timeout())?;
    info!(api_url = api.base_url(), "starting flowdesk");
    let worker = ApiWorker::spawn(api)?;

    let recognizer = config.voice_command.as_deref().map(CommandRecognizer::new);
    let options = AppOptions {
        notifications: config.notifications,
        speak_responses: config.speak_responses,
        voice_available: recognizer.is_some(),
    };
    let mut app = AppState::new(options, Local::now().date_naive());
    app.request_reload();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runtime = Runtime::new(worker, recognizer);
    let result = run_app(&mut terminal, &mut app, &mut runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        warn!(error = %err, "event loop failed");
        eprintln!("Error: {}", err);
    }
    info!("flowdesk stopped");

    result
}

/// Everything the event loop owns besides the state
struct Runtime {
    worker: ApiWorker,
    ticker: Ticker,
    speaker: SystemSpeaker,
    voice: VoiceRunner,
}

impl Runtime {
    fn new(worker: ApiWorker, recognizer: Option<CommandRecognizer>) -> Self {
        let recognizer = recognizer.map(|r| Box::new(r) as Box<dyn Recognizer>);
        Self {
            worker,
            ticker: Ticker::new(),
            speaker: SystemSpeaker::new(),
            voice: VoiceRunner::new(recognizer),
        }
    }

    fn perform(&mut self, effect: Effect, app: &mut AppState) {
        match effect {
            Effect::NotifySessionComplete => notifications::notify_session_complete(),
            Effect::Speak(text) => {
                if let Err(e) = self.speaker.speak(&text) {
                    warn!(error = %e, "could not speak reply");
                }
            }
            Effect::Listen(session) => {
                match self.voice.start(session) {
                    Ok(()) => info!(pid = ?self.voice.live_pid(), "listening for voice input"),
                    Err(e) => app.on_voice_result(session, Err(e)),
                }
            }
            Effect::StopListening => self.voice.stop(),
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    runtime: &mut Runtime,
) -> Result<()> {
    loop {
        // Hand queued requests to the worker before drawing the loading state
        for job in app.take_jobs() {
            runtime.worker.submit(job);
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Block until a key, the next timer tick, or the UI poll interval
        let timeout = runtime.ticker.poll_timeout(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        while let Some(event) = runtime.worker.try_next() {
            app.apply_event(event);
        }
        if let Some((session, result)) = runtime.voice.poll() {
            app.on_voice_result(session, result);
        }

        let now = Instant::now();
        runtime.ticker.sync(app.wants_ticks(), now);
        for _ in 0..runtime.ticker.due_ticks(now) {
            app.on_timer_tick();
        }
        // A completed session stops the timer; drop the deadline right away
        runtime.ticker.sync(app.wants_ticks(), now);

        for effect in app.take_effects() {
            runtime.perform(effect, app);
        }

        app.expire_notice(now);
        app.sync_today(Local::now().date_naive());
    }
}
