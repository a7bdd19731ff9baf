// Messages between the operator console, the event loop and the output feed.

use gavel_core::auction::command::Command;
use gavel_core::auction::player::Player;
use gavel_core::auction::state::{BidRecord, Phase};
use gavel_core::auction::summary::{StatusCounts, TeamSummary};
use gavel_core::ErrorKind;
use serde::Serialize;

/// Input to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// A state-changing engine command.
    Auction(Command),
    /// Re-send the current state without changing it.
    Snapshot,
    /// Case-insensitive player-name search.
    Search(String),
    Quit,
}

/// Output of the event loop, one per applied command or timer tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiUpdate {
    Snapshot(Box<AuctionSnapshot>),
    /// The engine refused a command; nothing changed.
    Rejected {
        command: String,
        error: String,
        kind: ErrorKind,
    },
    /// `next` found nobody eligible in the current round.
    PoolExhausted {
        phase: Phase,
        can_start_reauction: bool,
    },
    /// The countdown reached zero. The lot stays open.
    TimerExpired,
    /// Players whose name contains `term`, in roster order.
    SearchResults { term: String, players: Vec<Player> },
}

/// Read-only projection of the auction for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionSnapshot {
    pub auction_name: String,
    pub phase: Phase,
    pub active_player: Option<Player>,
    pub current_bid: u64,
    pub timer: u32,
    pub timer_running: bool,
    pub last_bid_team_id: Option<String>,
    pub bid_history: Vec<BidRecord>,
    /// Next bid for each configured quick-bid increment; empty with no lot.
    pub quick_bids: Vec<u64>,
    /// Teams whose purse covers the current bid; empty with no lot.
    pub affordable_team_ids: Vec<String>,
    pub counts: StatusCounts,
    /// The full roster with each player's current status.
    pub players: Vec<Player>,
    pub teams: Vec<TeamSummary>,
    pub can_start_reauction: bool,
}
