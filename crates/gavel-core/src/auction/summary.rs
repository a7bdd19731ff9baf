// Read-side aggregates over the player and team records.
//
// Nothing here mutates state; these are the derived numbers the dashboards
// show (pool counts, purses, squads, affordability, name search).

use serde::Serialize;

use super::player::{Player, PlayerStatus};
use super::team::Team;

/// Number of players in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub available: usize,
    pub sold: usize,
    pub unsold: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn of(players: &[Player]) -> Self {
        let mut counts = StatusCounts {
            total: players.len(),
            ..Default::default()
        };
        for p in players {
            match p.status {
                PlayerStatus::Available => counts.available += 1,
                PlayerStatus::Sold => counts.sold += 1,
                PlayerStatus::Unsold => counts.unsold += 1,
            }
        }
        counts
    }

    /// The initial round is over once nobody is left AVAILABLE.
    pub fn initial_round_exhausted(&self) -> bool {
        self.available == 0
    }
}

/// A team's standing for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    pub team_id: String,
    pub team_name: String,
    pub budget: u64,
    pub spent: u64,
    pub purse: u64,
    pub squad_size: usize,
    /// Ids of the players bought, in roster order.
    pub squad: Vec<String>,
}

/// Players bought by `team_id`, in roster order.
pub fn squad<'a>(players: &'a [Player], team_id: &str) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|p| p.status == PlayerStatus::Sold && p.team_id.as_deref() == Some(team_id))
        .collect()
}

pub fn team_summaries(players: &[Player], teams: &[Team]) -> Vec<TeamSummary> {
    teams
        .iter()
        .map(|t| {
            let bought: Vec<String> = squad(players, &t.id).iter().map(|p| p.id.clone()).collect();
            TeamSummary {
                team_id: t.id.clone(),
                team_name: t.name.clone(),
                budget: t.budget,
                spent: t.spent,
                purse: t.purse(),
                squad_size: bought.len(),
                squad: bought,
            }
        })
        .collect()
}

/// Teams whose purse covers `amount`.
pub fn affordable_teams(teams: &[Team], amount: u64) -> Vec<&Team> {
    teams.iter().filter(|t| t.can_afford(amount)).collect()
}

/// Case-insensitive substring match on player names. An empty term matches
/// everyone.
pub fn search_players<'a>(players: &'a [Player], term: &str) -> Vec<&'a Player> {
    let needle = term.trim().to_lowercase();
    players
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Sum of sale prices across sold players.
pub fn total_sold_value(players: &[Player]) -> u64 {
    players.iter().filter_map(|p| p.sold_price).sum()
}

/// Sum of spend across teams.
pub fn total_spent(teams: &[Team]) -> u64 {
    teams.iter().map(|t| t.spent).sum()
}
