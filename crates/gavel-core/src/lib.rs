// Library root: the auction engine, its model, and roster/config loading.

pub mod auction;
pub mod config;
pub mod error;
pub mod roster;

pub use auction::engine::AuctionEngine;
pub use error::{AuctionError, ErrorKind};
