// Static roster loading: teams from config, players from CSV.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::auction::player::{Player, Role};
use crate::auction::team::Team;
use crate::config::{Config, TeamConfig};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

/// The teams and players an auction starts with.
#[derive(Debug, Clone)]
pub struct Roster {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
}

/// Player CSV row: `id,name,base_price,category,role,image`.
#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: String,
    name: String,
    base_price: u64,
    #[serde(default)]
    category: String,
    role: String,
    #[serde(default)]
    image: String,
}

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                let Some(role) = Role::from_label(&raw.role) else {
                    warn!("skipping player '{}': unknown role '{}'", raw.name, raw.role);
                    continue;
                };
                if raw.base_price == 0 {
                    warn!("skipping player '{}': base price must be positive", raw.name);
                    continue;
                }
                players.push(Player::new(
                    raw.id,
                    raw.name,
                    raw.base_price,
                    raw.category,
                    role,
                    raw.image,
                ));
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Load players from a CSV file. Every player starts AVAILABLE.
pub fn load_players(path: &Path) -> Result<Vec<Player>, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| RosterError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Teams from the config, each with nothing spent.
pub fn teams_from_config(teams: &[TeamConfig]) -> Vec<Team> {
    teams
        .iter()
        .map(|t| Team::new(t.id.clone(), t.name.clone(), t.logo.clone(), t.budget))
        .collect()
}

/// Load and validate the full roster described by `config`.
pub fn load_roster(config: &Config) -> Result<Roster, RosterError> {
    let players = load_players(&config.players_path())?;
    let roster = Roster {
        players,
        teams: teams_from_config(&config.teams),
    };
    roster.validate()?;
    info!(
        "Roster loaded: {} players, {} teams",
        roster.players.len(),
        roster.teams.len()
    );
    Ok(roster)
}

impl Roster {
    /// Check the roster can seed an auction: non-empty, unique ids,
    /// positive prices and budgets.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.players.is_empty() {
            return Err(RosterError::Validation("roster has no players".into()));
        }
        if self.teams.is_empty() {
            return Err(RosterError::Validation("roster has no teams".into()));
        }

        let mut ids = HashSet::new();
        for p in &self.players {
            if !ids.insert(p.id.as_str()) {
                return Err(RosterError::Validation(format!(
                    "duplicate player id '{}'",
                    p.id
                )));
            }
            if p.base_price == 0 {
                return Err(RosterError::Validation(format!(
                    "player '{}' has a zero base price",
                    p.id
                )));
            }
        }

        let mut ids = HashSet::new();
        for t in &self.teams {
            if !ids.insert(t.id.as_str()) {
                return Err(RosterError::Validation(format!(
                    "duplicate team id '{}'",
                    t.id
                )));
            }
            if t.budget == 0 {
                return Err(RosterError::Validation(format!(
                    "team '{}' has a zero budget",
                    t.id
                )));
            }
        }
        Ok(())
    }
}
