//! windowed-chat - terminal driver for the chat window manager
//!
//! Reads chat lines from stdin, ticks the window manager at the configured
//! rate and prints the chat window's transcript to stdout.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use windowed_chat::commands::{tokenize, ChatCommandSet};
use windowed_chat::config::{self, Config};
use windowed_chat::core::{NetworkMode, Session, WindowManager};
use windowed_chat::data::WindowId;

#[derive(ClapParser)]
#[command(name = "windowed-chat")]
#[command(about = "Host-authoritative chat windows with slash commands", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.windowed-chat)
    /// Can also be set via WINDOWED_CHAT_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Session role (overrides session.mode)
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Player name (overrides session.player_name)
    #[arg(short, long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ModeArg {
    Host,
    Client,
}

impl From<ModeArg> for NetworkMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Host => NetworkMode::Host,
            ModeArg::Client => NetworkMode::Client,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a command line and print the invocation as JSON
    Tokenize {
        /// Text to parse, e.g. "/invite 123456789"
        text: String,
    },
    /// Run the interactive chat loop (default)
    Run,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(mode) = cli.mode {
        config.session.mode = mode.into();
    }
    if let Some(name) = &cli.name {
        config.session.player_name = name.clone();
    }
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Tokenize { text } => {
            let invocation = tokenize(&text, config.commands.prefix)?;
            println!("{}", serde_json::to_string_pretty(&invocation)?);
            Ok(())
        }
        Commands::Run => {
            init_logging()?;
            if let Ok(dir) = Config::base_dir() {
                tracing::info!("Using data directory: {}", dir.display());
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run(config))
        }
    }
}

/// Log to a file; stdout carries the transcript.
/// Use RUST_LOG to control the level, e.g. RUST_LOG=debug
fn init_logging() -> Result<()> {
    let path = Config::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::sync::mpsc;

    let session = Session::new(
        config.session.mode,
        config.session.input_source(),
        config.session.player_name.clone(),
    );
    let is_host = session.is_host();
    let mut manager = WindowManager::new(session);

    let lobby = Rc::new(config.lobby.to_lobby());
    let chat_set = ChatCommandSet::with_settings(lobby, config.commands.clone());
    let chat_id = manager.request_create_window(config.chat.window_request().command_set(chat_set))?;
    tracing::info!(
        "Chat window {} as {} ({:?})",
        chat_id,
        config.session.player_name,
        config.session.mode
    );

    // Forward stdin lines to the main loop
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to read stdin");
                    break;
                }
            }
        }
    });

    let period = Duration::from_secs_f64(1.0 / f64::from(config.session.tick_rate_hz));
    let mut interval = tokio::time::interval(period);
    let mut last_tick = Instant::now();
    let mut next_index: HashMap<WindowId, u32> = HashMap::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;

                manager.tick(dt);
                if is_host {
                    print_new_messages(&manager, &mut next_index);
                } else {
                    for message in manager.take_outbound() {
                        match serde_json::to_string(&message) {
                            Ok(json) => println!("{}", json),
                            Err(e) => tracing::error!(error = ?e, "Failed to serialize outbound message"),
                        }
                    }
                }
            }
            line = line_rx.recv() => match line {
                Some(line) => {
                    let line = line.trim_end();
                    if !line.is_empty() {
                        manager.post_player_message(chat_id, line);
                    }
                }
                None => break,
            },
        }
    }

    // Let queued input drain before shutting down
    while is_host && manager.pending_message_count() > 0 {
        manager.tick(0.0);
        print_new_messages(&manager, &mut next_index);
    }
    if !is_host {
        for message in manager.take_outbound() {
            println!("{}", serde_json::to_string(&message)?);
        }
    }

    manager.end_session();
    Ok(())
}

/// Print messages appended since the last call, oldest first
fn print_new_messages(manager: &WindowManager, next_index: &mut HashMap<WindowId, u32>) {
    for id in manager.window_ids() {
        let Some(window) = manager.window(id) else {
            continue;
        };
        let cursor = next_index.entry(id).or_insert(0);
        for message in window.messages().iter().filter(|m| m.index() >= *cursor) {
            let time = message.received_at().format("%H:%M:%S");
            if window.hide_name {
                println!("[{}] {}: {}", time, message.owner(), message.text());
            } else {
                println!("[{}] [{}] {}: {}", time, window.name, message.owner(), message.text());
            }
        }
        *cursor = window.last_message_index();
    }
}
