// Team records and purse bookkeeping.

use serde::{Deserialize, Serialize};

/// A bidding team with a fixed budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier (e.g., "t1").
    pub id: String,
    /// Display name of the team.
    pub name: String,
    /// Opaque logo reference, owned by the presentation layer.
    pub logo: String,
    /// Total budget for the whole auction.
    pub budget: u64,
    /// Total paid for players so far. Never decreases.
    #[serde(default)]
    pub spent: u64,
}

impl Team {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        logo: impl Into<String>,
        budget: u64,
    ) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            logo: logo.into(),
            budget,
            spent: 0,
        }
    }

    /// Remaining buying power (budget minus spent).
    pub fn purse(&self) -> u64 {
        self.budget.saturating_sub(self.spent)
    }

    /// Whether the team could pay `amount` without exceeding its budget.
    pub fn can_afford(&self, amount: u64) -> bool {
        self.purse() >= amount
    }

    /// Add a sale to `spent`. The engine checks for overflow first.
    pub(crate) fn charge(&mut self, amount: u64) {
        self.spent += amount;
    }
}
