// Error types for engine commands.

use serde::Serialize;
use thiserror::Error;

use crate::auction::state::Phase;

/// Coarse classification of a rejected command.
///
/// Every [`AuctionError`] maps onto exactly one kind so callers can decide
/// how to react (e.g. prompt a round transition on `EmptyPool`) without
/// matching on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The command was issued in a phase or lot state it does not accept.
    PreconditionViolation,
    /// No eligible player remains in the current round's pool.
    EmptyPool,
    /// A team or player id did not resolve.
    UnknownReference,
}

/// A command rejected by the auction engine. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("`{command}` is not allowed during the {actual} phase")]
    WrongPhase {
        command: &'static str,
        actual: Phase,
    },

    #[error("`{command}` requires an active lot")]
    NoActiveLot { command: &'static str },

    #[error("lot for player {player_id} is still in progress")]
    LotInProgress { player_id: String },

    #[error("initial round still has {remaining} available player(s)")]
    RoundNotExhausted { remaining: usize },

    #[error("no eligible players left in the {phase} pool")]
    EmptyPool { phase: Phase },

    #[error("unknown team: {team_id}")]
    UnknownTeam { team_id: String },

    #[error("team {team_id} cannot pay {amount}: purse is {purse}")]
    InsufficientPurse {
        team_id: String,
        amount: u64,
        purse: u64,
    },

    #[error("bid of {amount} is below the minimum of {minimum}")]
    BidTooLow { amount: u64, minimum: u64 },

    #[error("bid increment must be greater than zero")]
    ZeroIncrement,

    #[error("sale of {amount} would overflow recorded spend")]
    SpendOverflow { amount: u64 },
}

impl AuctionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::EmptyPool { .. } => ErrorKind::EmptyPool,
            AuctionError::UnknownTeam { .. } => ErrorKind::UnknownReference,
            AuctionError::WrongPhase { .. }
            | AuctionError::NoActiveLot { .. }
            | AuctionError::LotInProgress { .. }
            | AuctionError::RoundNotExhausted { .. }
            | AuctionError::InsufficientPurse { .. }
            | AuctionError::BidTooLow { .. }
            | AuctionError::ZeroIncrement
            | AuctionError::SpendOverflow { .. } => ErrorKind::PreconditionViolation,
        }
    }
}
