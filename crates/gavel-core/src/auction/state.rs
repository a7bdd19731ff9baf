// Auction state: phase, active lot, bid history and countdown timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the bidding countdown, in seconds.
pub const LOT_TIMER_SECONDS: u32 = 10;

/// Phase of the auction as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Roster loaded, bidding not opened yet.
    Setup,
    /// First pass over every available player.
    LiveInitial,
    /// Further passes over players that went unsold.
    LiveReauction,
    /// Declared for completeness; no command transitions into it.
    Completed,
}

impl Phase {
    /// Whether lots can be opened and the timer run in this phase.
    pub fn is_live(&self) -> bool {
        matches!(self, Phase::LiveInitial | Phase::LiveReauction)
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Phase::Setup => "SETUP",
            Phase::LiveInitial => "LIVE_INITIAL",
            Phase::LiveReauction => "LIVE_REAUCTION",
            Phase::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// One bid placed on the current lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub amount: u64,
    pub timestamp: DateTime<Utc>,
}

/// Operator control over the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
    /// Reserved; accepted and ignored.
    Add,
}

impl TimerAction {
    pub fn from_str_action(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(TimerAction::Start),
            "pause" | "stop" => Some(TimerAction::Pause),
            "reset" => Some(TimerAction::Reset),
            "add" => Some(TimerAction::Add),
            _ => None,
        }
    }
}

/// What a single timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The countdown moved down by one second and is still running.
    Ticked { remaining: u32 },
    /// The countdown reached zero and stopped.
    Expired,
    /// The timer was not running; nothing changed.
    Idle,
}

/// The engine's mutable root.
///
/// Fields are private: they change only through [`crate::AuctionEngine`]
/// commands, which keep them consistent with the player and team records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionState {
    phase: Phase,
    active_player_id: Option<String>,
    current_bid: u64,
    timer: u32,
    is_timer_running: bool,
    last_bid_team_id: Option<String>,
    /// Most recent bid first. Scoped to the active lot.
    bid_history: Vec<BidRecord>,
}

impl Default for AuctionState {
    fn default() -> Self {
        AuctionState {
            phase: Phase::Setup,
            active_player_id: None,
            current_bid: 0,
            timer: LOT_TIMER_SECONDS,
            is_timer_running: false,
            last_bid_team_id: None,
            bid_history: Vec::new(),
        }
    }
}

impl AuctionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_player_id(&self) -> Option<&str> {
        self.active_player_id.as_deref()
    }

    pub fn has_active_lot(&self) -> bool {
        self.active_player_id.is_some()
    }

    pub fn current_bid(&self) -> u64 {
        self.current_bid
    }

    /// Seconds left on the countdown.
    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn is_timer_running(&self) -> bool {
        self.is_timer_running
    }

    /// Team that won the most recently settled lot, until the next lot opens.
    pub fn last_bid_team_id(&self) -> Option<&str> {
        self.last_bid_team_id.as_deref()
    }

    pub fn bid_history(&self) -> &[BidRecord] {
        &self.bid_history
    }

    /// The latest bid on the current lot, if any was placed.
    pub fn last_bid(&self) -> Option<&BidRecord> {
        self.bid_history.first()
    }

    // --- Transitions (engine only) ---

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn open_lot(&mut self, player_id: &str, base_price: u64) {
        self.active_player_id = Some(player_id.to_string());
        self.current_bid = base_price;
        self.timer = LOT_TIMER_SECONDS;
        self.is_timer_running = false;
        self.last_bid_team_id = None;
        self.bid_history.clear();
    }

    pub(crate) fn record_bid(&mut self, amount: u64, at: DateTime<Utc>) {
        self.current_bid = amount;
        self.bid_history.insert(0, BidRecord { amount, timestamp: at });
    }

    /// Clear the active lot after settlement. The countdown value is left
    /// where it stopped; the next lot resets it.
    pub(crate) fn close_lot(&mut self, winner: Option<&str>) {
        self.active_player_id = None;
        self.current_bid = 0;
        self.is_timer_running = false;
        self.last_bid_team_id = winner.map(str::to_string);
        self.bid_history.clear();
    }

    pub(crate) fn control_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::Start => {
                // An expired countdown cannot run; it must be reset first.
                self.is_timer_running = self.timer > 0;
            }
            TimerAction::Pause => self.is_timer_running = false,
            TimerAction::Reset => {
                self.timer = LOT_TIMER_SECONDS;
                self.is_timer_running = false;
            }
            TimerAction::Add => {}
        }
    }

    pub(crate) fn tick(&mut self) -> TimerEvent {
        if !self.is_timer_running {
            return TimerEvent::Idle;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.is_timer_running = false;
            TimerEvent::Expired
        } else {
            TimerEvent::Ticked {
                remaining: self.timer,
            }
        }
    }
}
