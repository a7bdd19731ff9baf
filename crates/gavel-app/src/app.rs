// Application orchestrator: owns the auction engine, serialises operator
// commands, and drives the one-second countdown while the timer runs.

use std::time::Duration;

use gavel_core::auction::player::Player;
use gavel_core::auction::state::TimerEvent;
use gavel_core::auction::summary;
use gavel_core::config::Config;
use gavel_core::{AuctionEngine, AuctionError};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::protocol::{AuctionSnapshot, UiUpdate, UserCommand};

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Everything the event loop owns.
pub struct AppState {
    pub engine: AuctionEngine,
    pub auction_name: String,
    pub quick_bid_increments: Vec<u64>,
}

impl AppState {
    pub fn new(config: &Config, engine: AuctionEngine) -> Self {
        AppState {
            engine,
            auction_name: config.auction.name.clone(),
            quick_bid_increments: config.auction.quick_bid_increments.clone(),
        }
    }

    /// Build a read-only projection of the auction for the output feed.
    pub fn build_snapshot(&self) -> AuctionSnapshot {
        let engine = &self.engine;
        let state = engine.state();
        let current_bid = state.current_bid();
        let lot_open = state.has_active_lot();

        let quick_bids = if lot_open {
            self.quick_bid_increments
                .iter()
                .map(|inc| current_bid.saturating_add(*inc))
                .collect()
        } else {
            Vec::new()
        };
        let affordable_team_ids = if lot_open {
            summary::affordable_teams(engine.teams(), current_bid)
                .into_iter()
                .map(|t| t.id.clone())
                .collect()
        } else {
            Vec::new()
        };

        AuctionSnapshot {
            auction_name: self.auction_name.clone(),
            phase: state.phase(),
            active_player: engine.active_player().cloned(),
            current_bid,
            timer: state.timer(),
            timer_running: state.is_timer_running(),
            last_bid_team_id: state.last_bid_team_id().map(str::to_string),
            bid_history: state.bid_history().to_vec(),
            quick_bids,
            affordable_team_ids,
            counts: engine.status_counts(),
            players: engine.players().to_vec(),
            teams: summary::team_summaries(engine.players(), engine.teams()),
            can_start_reauction: engine.can_start_reauction(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the auction event loop.
///
/// Listens on two sources using `tokio::select!`:
/// 1. Operator commands from the console
/// 2. The countdown interval, which only exists while the timer runs
///
/// Pushes UI updates through `ui_tx`. Returns when `Quit` arrives or the
/// command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Auction event loop started");

    let mut countdown: Option<Interval> = None;

    loop {
        tokio::select! {
            // --- Operator commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Countdown ---
            _ = next_tick(&mut countdown) => {
                handle_tick(&mut state, &ui_tx).await;
            }
        }

        sync_countdown(&state.engine, &mut countdown);
    }

    if countdown.take().is_some() {
        debug!("Countdown dropped on shutdown");
    }
    info!("Auction event loop exiting");
    Ok(())
}

/// Wait for the next countdown tick, or forever when no countdown exists.
async fn next_tick(countdown: &mut Option<Interval>) {
    match countdown {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Create or drop the countdown so it exists exactly while the engine's
/// timer is running. A fresh countdown first fires one full period later.
fn sync_countdown(engine: &AuctionEngine, countdown: &mut Option<Interval>) {
    let running = engine.state().is_timer_running();
    match (running, countdown.is_some()) {
        (true, false) => {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *countdown = Some(interval);
            debug!("Countdown started at {}s", engine.state().timer());
        }
        (false, true) => {
            *countdown = None;
            debug!("Countdown stopped at {}s", engine.state().timer());
        }
        _ => {}
    }
}

async fn handle_tick(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    match state.engine.tick() {
        TimerEvent::Idle => return,
        TimerEvent::Expired => {
            let _ = ui_tx.send(UiUpdate::TimerExpired).await;
        }
        TimerEvent::Ticked { .. } => {}
    }
    send_snapshot(state, ui_tx).await;
}

/// Handle a user command from the console.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Auction(command) => {
            let name = command.name();
            match state.engine.apply(command) {
                Ok(()) => send_snapshot(state, ui_tx).await,
                Err(AuctionError::EmptyPool { phase }) => {
                    info!("No eligible players left in the {} pool", phase);
                    let _ = ui_tx
                        .send(UiUpdate::PoolExhausted {
                            phase,
                            can_start_reauction: state.engine.can_start_reauction(),
                        })
                        .await;
                }
                Err(e) => {
                    warn!("Rejected `{}`: {}", name, e);
                    let _ = ui_tx
                        .send(UiUpdate::Rejected {
                            command: name.to_string(),
                            error: e.to_string(),
                            kind: e.kind(),
                        })
                        .await;
                }
            }
        }
        UserCommand::Snapshot => send_snapshot(state, ui_tx).await,
        UserCommand::Search(term) => {
            let players: Vec<Player> = summary::search_players(state.engine.players(), &term)
                .into_iter()
                .cloned()
                .collect();
            debug!("Search {:?}: {} match(es)", term, players.len());
            let _ = ui_tx.send(UiUpdate::SearchResults { term, players }).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}
