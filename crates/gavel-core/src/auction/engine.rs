// The auction engine: phase control, lot lifecycle and settlement.
//
// Every command either applies completely or returns an `AuctionError` and
// leaves the players, teams and auction state exactly as they were. Checks
// always run before the first mutation.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::command::Command;
use super::picker::IndexPicker;
use super::player::{Player, PlayerStatus};
use super::rules::{AuctionRules, BidPolicy};
use super::state::{AuctionState, Phase, TimerAction, TimerEvent};
use super::summary::StatusCounts;
use super::team::Team;
use crate::error::AuctionError;
use crate::roster::{Roster, RosterError};

/// Owns the roster and the auction state; the only way to change either.
pub struct AuctionEngine {
    players: Vec<Player>,
    teams: Vec<Team>,
    state: AuctionState,
    rules: AuctionRules,
    picker: Box<dyn IndexPicker>,
}

impl AuctionEngine {
    /// Create an engine in the SETUP phase over a static roster.
    ///
    /// Player and team ids must be unique; lots and sales are resolved by
    /// id. Use [`AuctionEngine::from_roster`] for unchecked input.
    pub fn new(
        players: Vec<Player>,
        teams: Vec<Team>,
        rules: AuctionRules,
        picker: impl IndexPicker + 'static,
    ) -> Self {
        AuctionEngine {
            players,
            teams,
            state: AuctionState::default(),
            rules,
            picker: Box::new(picker),
        }
    }

    /// Validate `roster` and create an engine over it.
    pub fn from_roster(
        roster: Roster,
        rules: AuctionRules,
        picker: impl IndexPicker + 'static,
    ) -> Result<Self, RosterError> {
        roster.validate()?;
        Ok(Self::new(roster.players, roster.teams, rules, picker))
    }

    // --- Queries ---

    pub fn state(&self) -> &AuctionState {
        &self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn rules(&self) -> &AuctionRules {
        &self.rules
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// The player currently under the hammer.
    pub fn active_player(&self) -> Option<&Player> {
        self.active_index().map(|i| &self.players[i])
    }

    /// Team that won the last settled lot, if it is still being shown.
    pub fn last_bid_team(&self) -> Option<&Team> {
        self.state.last_bid_team_id().and_then(|id| self.team(id))
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::of(&self.players)
    }

    /// Whether the operator may move on to the re-auction round now.
    pub fn can_start_reauction(&self) -> bool {
        self.state.phase() == Phase::LiveInitial
            && (!self.rules.require_exhausted_pool
                || self.status_counts().initial_round_exhausted())
    }

    // --- Commands ---

    /// Dispatch an operator command.
    pub fn apply(&mut self, command: Command) -> Result<(), AuctionError> {
        match command {
            Command::StartAuction => self.start_auction(),
            Command::NextPlayer => self.select_next_player().map(|_| ()),
            Command::StartReauction => self.start_reauction(),
            Command::PlaceBid { amount } => self.place_bid(amount),
            Command::RaiseBid { increment } => self.raise_bid(increment),
            Command::Timer { action } => self.control_timer(action),
            Command::Sold { team_id, amount } => {
                let amount = amount.unwrap_or(self.state.current_bid());
                self.settle_sold(&team_id, amount)
            }
            Command::Unsold => self.settle_unsold(),
        }
    }

    /// Open bidding: SETUP -> LIVE_INITIAL.
    pub fn start_auction(&mut self) -> Result<(), AuctionError> {
        self.require_phase("start", &[Phase::Setup])?;
        self.state.set_phase(Phase::LiveInitial);
        info!(
            "Auction started with {} players and {} teams",
            self.players.len(),
            self.teams.len()
        );
        Ok(())
    }

    /// Pick a random player from the current round's pool and open a lot.
    ///
    /// The initial round draws from AVAILABLE players, the re-auction round
    /// from UNSOLD ones. Returns `EmptyPool` when nobody is eligible.
    pub fn select_next_player(&mut self) -> Result<&Player, AuctionError> {
        let phase = self.state.phase();
        let wanted = match phase {
            Phase::LiveInitial => PlayerStatus::Available,
            Phase::LiveReauction => PlayerStatus::Unsold,
            Phase::Setup | Phase::Completed => {
                return Err(AuctionError::WrongPhase {
                    command: "next",
                    actual: phase,
                })
            }
        };
        if let Some(player_id) = self.state.active_player_id() {
            return Err(AuctionError::LotInProgress {
                player_id: player_id.to_string(),
            });
        }

        let eligible: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.status == wanted)
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            return Err(AuctionError::EmptyPool { phase });
        }

        let pick = self.picker.pick_index(eligible.len()) % eligible.len();
        let idx = eligible[pick];
        let player = &self.players[idx];
        self.state.open_lot(&player.id, player.base_price);
        info!(
            "Lot opened: {} ({}, base {}) from a pool of {}",
            player.name,
            player.role,
            player.base_price,
            eligible.len()
        );
        Ok(player)
    }

    /// Move to the re-auction round: LIVE_INITIAL -> LIVE_REAUCTION.
    pub fn start_reauction(&mut self) -> Result<(), AuctionError> {
        self.require_phase("reauction", &[Phase::LiveInitial])?;
        if self.rules.require_exhausted_pool {
            let remaining = self.status_counts().available;
            if remaining > 0 {
                return Err(AuctionError::RoundNotExhausted { remaining });
            }
        }
        self.state.set_phase(Phase::LiveReauction);
        info!(
            "Re-auction round started with {} unsold players",
            self.status_counts().unsold
        );
        Ok(())
    }

    /// Record a bid on the active lot, timestamped now.
    pub fn place_bid(&mut self, amount: u64) -> Result<(), AuctionError> {
        self.place_bid_at(amount, Utc::now())
    }

    /// Record a bid on the active lot with an explicit timestamp.
    pub fn place_bid_at(&mut self, amount: u64, at: DateTime<Utc>) -> Result<(), AuctionError> {
        self.require_lot("bid")?;
        if self.rules.bid_policy == BidPolicy::Increasing {
            let current = self.state.current_bid();
            // The opening bid may match the base price.
            let minimum = if self.state.bid_history().is_empty() {
                current
            } else {
                current.saturating_add(1)
            };
            if amount < minimum {
                return Err(AuctionError::BidTooLow { amount, minimum });
            }
        }
        self.state.record_bid(amount, at);
        debug!("Bid {} recorded ({} in history)", amount, self.state.bid_history().len());
        Ok(())
    }

    /// Quick bid: current bid plus `increment`.
    pub fn raise_bid(&mut self, increment: u64) -> Result<(), AuctionError> {
        self.require_lot("raise")?;
        if increment == 0 {
            return Err(AuctionError::ZeroIncrement);
        }
        self.place_bid(self.state.current_bid().saturating_add(increment))
    }

    /// Start, pause or reset the countdown.
    ///
    /// Starting requires a live phase; pausing and resetting are accepted in
    /// any phase and are idempotent.
    pub fn control_timer(&mut self, action: TimerAction) -> Result<(), AuctionError> {
        if action == TimerAction::Start && !self.state.phase().is_live() {
            return Err(AuctionError::WrongPhase {
                command: "timer start",
                actual: self.state.phase(),
            });
        }
        self.state.control_timer(action);
        debug!(
            "Timer {:?}: {}s, running={}",
            action,
            self.state.timer(),
            self.state.is_timer_running()
        );
        Ok(())
    }

    /// Advance the countdown by one second. Called by the timer driver.
    pub fn tick(&mut self) -> TimerEvent {
        let event = self.state.tick();
        match event {
            TimerEvent::Expired => info!("Timer expired"),
            TimerEvent::Ticked { remaining } => debug!("Timer: {}s left", remaining),
            TimerEvent::Idle => {}
        }
        event
    }

    /// Sell the active lot to `team_id` for `amount`.
    pub fn settle_sold(&mut self, team_id: &str, amount: u64) -> Result<(), AuctionError> {
        let player_idx = self.require_lot("sold")?;
        let team_idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or_else(|| AuctionError::UnknownTeam {
                team_id: team_id.to_string(),
            })?;
        let team = &self.teams[team_idx];
        if self.rules.enforce_budget && !team.can_afford(amount) {
            return Err(AuctionError::InsufficientPurse {
                team_id: team_id.to_string(),
                amount,
                purse: team.purse(),
            });
        }
        // Both the team's spend and the league-wide total must stay representable.
        let total_spent = self
            .teams
            .iter()
            .try_fold(0u64, |acc, t| acc.checked_add(t.spent));
        if team.spent.checked_add(amount).is_none()
            || total_spent.and_then(|total| total.checked_add(amount)).is_none()
        {
            return Err(AuctionError::SpendOverflow { amount });
        }

        self.players[player_idx].mark_sold(team_id, amount);
        self.teams[team_idx].charge(amount);
        self.state.close_lot(Some(team_id));
        info!(
            "SOLD: {} -> {} for {} (purse now {})",
            self.players[player_idx].name,
            self.teams[team_idx].name,
            amount,
            self.teams[team_idx].purse()
        );
        Ok(())
    }

    /// Close the active lot without a buyer.
    pub fn settle_unsold(&mut self) -> Result<(), AuctionError> {
        let player_idx = self.require_lot("unsold")?;
        self.players[player_idx].mark_unsold();
        self.state.close_lot(None);
        info!("UNSOLD: {}", self.players[player_idx].name);
        Ok(())
    }

    // --- Helpers ---

    fn active_index(&self) -> Option<usize> {
        let id = self.state.active_player_id()?;
        self.players.iter().position(|p| p.id == id)
    }

    /// Index of the active lot's player, or `NoActiveLot`.
    fn require_lot(&self, command: &'static str) -> Result<usize, AuctionError> {
        self.active_index()
            .ok_or(AuctionError::NoActiveLot { command })
    }

    fn require_phase(&self, command: &'static str, allowed: &[Phase]) -> Result<(), AuctionError> {
        let actual = self.state.phase();
        if allowed.contains(&actual) {
            Ok(())
        } else {
            Err(AuctionError::WrongPhase { command, actual })
        }
    }
}
