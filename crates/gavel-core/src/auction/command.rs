// Operator commands accepted by the engine.

use serde::{Deserialize, Serialize};

use super::state::TimerAction;

/// A state-changing request from the operator.
///
/// The timer tick is not listed here: it comes from the timer driver, not
/// the operator, and goes through [`crate::AuctionEngine::tick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    StartAuction,
    NextPlayer,
    StartReauction,
    PlaceBid { amount: u64 },
    /// Quick bid: raise the current bid by a fixed increment.
    RaiseBid { increment: u64 },
    Timer { action: TimerAction },
    /// Sell the active lot. `amount` defaults to the current bid.
    Sold {
        team_id: String,
        #[serde(default)]
        amount: Option<u64>,
    },
    Unsold,
}

impl Command {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartAuction => "start",
            Command::NextPlayer => "next",
            Command::StartReauction => "reauction",
            Command::PlaceBid { .. } => "bid",
            Command::RaiseBid { .. } => "raise",
            Command::Timer { .. } => "timer",
            Command::Sold { .. } => "sold",
            Command::Unsold => "unsold",
        }
    }
}
