// Gavel entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries the JSON feed)
// 2. Load config, copying defaults on first run
// 3. Load the roster and build the engine
// 4. Create mpsc channels
// 5. Spawn the auction event loop and the output printer
// 6. Read operator commands from stdin until quit, EOF or Ctrl+C
// 7. Cleanup on exit

use std::time::Duration;

use anyhow::Context;
use gavel_app::app::{self, AppState};
use gavel_app::console::{self, ParseError};
use gavel_app::protocol::{UiUpdate, UserCommand};
use gavel_core::auction::picker::RandomPicker;
use gavel_core::config;
use gavel_core::roster;
use gavel_core::AuctionEngine;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Gavel starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: auction={}, {} teams",
        config.auction.name,
        config.teams.len()
    );

    // 3. Load the roster and build the engine
    let roster = roster::load_roster(&config).context("failed to load roster")?;
    let picker = match config.auction.seed {
        Some(seed) => {
            info!("Using fixed selection seed {}", seed);
            RandomPicker::with_seed(seed)
        }
        None => RandomPicker::from_entropy(),
    };
    let engine = AuctionEngine::from_roster(roster, config.rules.clone(), picker)
        .context("roster cannot seed an auction")?;
    let app_state = AppState::new(&config, engine);

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Spawn the event loop and the printer
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });
    let printer_handle = tokio::spawn(print_updates(ui_rx));

    info!("Application ready, reading commands from stdin");
    eprintln!("{}", console::USAGE);
    let _ = cmd_tx.send(UserCommand::Snapshot).await;

    // 6. Console loop (blocks until quit, EOF or Ctrl+C)
    if let Err(e) = read_console(cmd_tx).await {
        error!("Console error: {}", e);
    }

    // 7. Cleanup: the command channel is closed; wait for the loop to drain.
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;
    let _ = tokio::time::timeout(Duration::from_secs(1), printer_handle).await;

    info!("Gavel shut down cleanly");
    Ok(())
}

/// Forward parsed stdin lines to the event loop. Consumes the sender so the
/// channel closes when this returns.
async fn read_console(cmd_tx: mpsc::Sender<UserCommand>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("stdin closed, shutting down");
                    break;
                };
                match console::parse_line(&line) {
                    Ok(cmd) => {
                        let quit = cmd == UserCommand::Quit;
                        if cmd_tx.send(cmd).await.is_err() || quit {
                            break;
                        }
                    }
                    Err(ParseError::Empty) => {}
                    Err(e) => {
                        warn!("Unparseable input {:?}: {}", line, e);
                        eprintln!("{e}\n{}", console::USAGE);
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("Ctrl+C received, shutting down");
                let _ = cmd_tx.send(UserCommand::Quit).await;
                break;
            }
        }
    }
    Ok(())
}

/// Print every update as one JSON line on stdout.
async fn print_updates(mut ui_rx: mpsc::Receiver<UiUpdate>) {
    while let Some(update) = ui_rx.recv().await {
        match serde_json::to_string(&update) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Failed to serialize update: {}", e),
        }
    }
}

/// Initialize tracing to log to a file so stdout stays machine-readable.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gavel.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gavel=info,warn")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
