// Player records and their auction status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing role of a cricketer in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Batsman")]
    Batsman,
    #[serde(rename = "Bowler")]
    Bowler,
    #[serde(rename = "All Rounder")]
    AllRounder,
    #[serde(rename = "Wicket Keeper")]
    WicketKeeper,
}

impl Role {
    /// Parse a role label as it appears in roster files.
    ///
    /// Accepts the display labels case-insensitively, plus the short forms
    /// "BAT", "BOWL", "AR" and "WK".
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BATSMAN" | "BAT" => Some(Role::Batsman),
            "BOWLER" | "BOWL" => Some(Role::Bowler),
            "ALL ROUNDER" | "ALL-ROUNDER" | "ALLROUNDER" | "AR" => Some(Role::AllRounder),
            "WICKET KEEPER" | "WICKET-KEEPER" | "WICKETKEEPER" | "WK" => Some(Role::WicketKeeper),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::AllRounder => "All Rounder",
            Role::WicketKeeper => "Wicket Keeper",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Where a player stands in the auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    /// Not yet put under the hammer in the initial round.
    Available,
    /// Bought by a team.
    Sold,
    /// Went under the hammer without a buyer; eligible for re-auction.
    Unsold,
}

/// A player in the auction pool.
///
/// `sold_price` and `team_id` are set together at settlement and only while
/// `status` is [`PlayerStatus::Sold`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Opening price of the lot, in minor currency units.
    pub base_price: u64,
    /// Free-form grade label (e.g. "Elite", "A").
    pub category: String,
    pub role: Role,
    /// Opaque image reference, owned by the presentation layer.
    pub image: String,
    pub status: PlayerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl Player {
    /// Create a player that has not been auctioned yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: u64,
        category: impl Into<String>,
        role: Role,
        image: impl Into<String>,
    ) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            base_price,
            category: category.into(),
            role,
            image: image.into(),
            status: PlayerStatus::Available,
            sold_price: None,
            team_id: None,
        }
    }

    /// Whether the player has not been resolved to a buyer yet, i.e. can
    /// still be the subject of a lot.
    pub fn is_open(&self) -> bool {
        matches!(self.status, PlayerStatus::Available | PlayerStatus::Unsold)
    }

    pub(crate) fn mark_sold(&mut self, team_id: &str, price: u64) {
        self.status = PlayerStatus::Sold;
        self.sold_price = Some(price);
        self.team_id = Some(team_id.to_string());
    }

    pub(crate) fn mark_unsold(&mut self) {
        self.status = PlayerStatus::Unsold;
        self.sold_price = None;
        self.team_id = None;
    }
}
