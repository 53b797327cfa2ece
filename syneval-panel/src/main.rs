//! SynEval evaluation panel - interactive demo entry point
//!
//! Drives one listening-test session from stdin commands, mapping them onto
//! browser-style key codes. Useful for exercising the panel without any UI
//! layer.
//!
//! Commands: `1`..`9` select an option, `space` replays the first clip,
//! `enter` submits, `all` plays every clip in order, `stop` cancels a
//! running sequence, `quit` exits.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syneval_common::events::{EventBus, ScreenMode};
use syneval_panel::session::load_tasks;
use syneval_panel::{
    AudioClip, EvalForm, InputDispatcher, PanelConfig, SequentialPlayer, SessionManager, SimClip,
    SubmitOutcome, Task,
};

/// Command-line arguments for syneval-panel
#[derive(Parser, Debug)]
#[command(name = "syneval-panel")]
#[command(about = "Keyboard-driven listening test panel for SynEval")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "SYNEVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the JSON task list (overrides the config file)
    #[arg(short, long, env = "SYNEVAL_TASKS")]
    tasks: Option<PathBuf>,

    /// Inter-clip pause in milliseconds (overrides the config file)
    #[arg(long)]
    delay_ms: Option<u64>,
}

/// Parsed stdin command
enum Command {
    Key(u32),
    PlayAll,
    Stop,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line {
        "" => None,
        "space" | "s" => Some(Command::Key(syneval_panel::input::keys::SPACE)),
        "enter" | "e" => Some(Command::Key(syneval_panel::input::keys::RETURN)),
        "all" | "a" => Some(Command::PlayAll),
        "stop" => Some(Command::Stop),
        "quit" | "q" => Some(Command::Quit),
        _ => {
            let digit: u32 = line.parse().ok().filter(|d| (1..=9).contains(d))?;
            Some(Command::Key(48 + digit))
        }
    }
}

fn build_form(task: &Task, clip_duration: Duration) -> Arc<EvalForm> {
    let options = task
        .shuffled_options()
        .into_iter()
        .map(|value| {
            let clip: Arc<dyn AudioClip> = Arc::new(SimClip::new(clip_duration));
            (value, clip)
        })
        .collect();
    Arc::new(EvalForm::from_options(options))
}

fn build_player(
    form: Arc<EvalForm>,
    delay: Duration,
    bus: EventBus,
) -> Arc<SequentialPlayer> {
    Arc::new(SequentialPlayer::new(form, delay, bus))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syneval_panel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration: explicit path must exist, the platform default
    // may be absent (built-in defaults apply then)
    let config = match &args.config {
        Some(path) => PanelConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let path = syneval_common::config::default_config_path();
            if path.exists() {
                PanelConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            } else {
                PanelConfig::default()
            }
        }
    };

    let tasks_path = args.tasks.unwrap_or_else(|| config.tasks_path.clone());
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.inter_clip_delay());

    let tasks = load_tasks(&tasks_path)
        .with_context(|| format!("Failed to load tasks {}", tasks_path.display()))?;
    info!("Loaded {} tasks from {}", tasks.len(), tasks_path.display());

    let state = Arc::new(syneval_panel::SharedState::new(config.event_capacity));
    let session = Arc::new(SessionManager::new(tasks, state.event_bus().clone()));
    info!(session_id = %session.session_id(), "Session created");

    // Log every bus event
    let mut events = state.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(event = ?event, "panel event");
        }
    });

    let first_task = session
        .task(0)
        .context("Task list is empty, nothing to evaluate")?;
    let mut form = build_form(first_task, config.clip_duration());
    let mut player = build_player(Arc::clone(&form), delay, state.event_bus().clone());
    let dispatcher = Arc::new(InputDispatcher::new(
        Arc::clone(&state),
        Arc::clone(&session),
        Arc::clone(&form),
    ));

    state.set_screen(ScreenMode::Eval).await;
    info!(
        "Page 1/{}: {} options. Type a command (1-9, space, enter, all, stop, quit).",
        session.total_pages(),
        form.len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown_signal() => break,
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
        };

        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            Command::Quit => break,
            Command::PlayAll => {
                let player = Arc::clone(&player);
                tokio::spawn(async move {
                    if let Err(e) = player.play_all(0).await {
                        tracing::error!("Sequential playback failed: {}", e);
                    }
                });
            }
            Command::Stop => {
                player.cancel_token().cancel();
                // A cancelled token is spent; next `all` needs a fresh player
                player = build_player(Arc::clone(&form), delay, state.event_bus().clone());
            }
            Command::Key(code) => match dispatcher.handle_key(code).await {
                Ok(Some(SubmitOutcome::Advanced { page })) => {
                    let task = session
                        .task(page)
                        .context("Session advanced past its task list")?;
                    form = build_form(task, config.clip_duration());
                    player = build_player(Arc::clone(&form), delay, state.event_bus().clone());
                    dispatcher.attach_form(Arc::clone(&form)).await;
                    info!("Page {}/{}", page + 1, session.total_pages());
                }
                Ok(Some(SubmitOutcome::Completed)) => {
                    state.set_screen(ScreenMode::Thanks).await;
                    info!("All pages answered, thanks!");
                    break;
                }
                Ok(Some(SubmitOutcome::SelectionRequired)) => {
                    info!("Don't forget to make a selection!");
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Key handling failed: {}", e),
            },
        }
    }

    info!("Panel shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
