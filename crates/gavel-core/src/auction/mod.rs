// Auction engine: model types, commands and state transitions.

pub mod command;
pub mod engine;
pub mod picker;
pub mod player;
pub mod rules;
pub mod state;
pub mod summary;
pub mod team;
