// Configurable enforcement of auction preconditions.

use serde::Deserialize;

/// How incoming bids are validated against the current bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidPolicy {
    /// Any amount is accepted, including values at or below the current bid.
    #[default]
    Any,
    /// Each bid must exceed the current bid. The opening bid of a lot may
    /// equal the base price.
    Increasing,
}

/// Which preconditions the engine enforces itself rather than trusting the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuctionRules {
    /// Reject a sale that would take a team's spend past its budget.
    pub enforce_budget: bool,
    /// Only allow the re-auction round once no player is AVAILABLE.
    pub require_exhausted_pool: bool,
    pub bid_policy: BidPolicy,
}

impl Default for AuctionRules {
    fn default() -> Self {
        AuctionRules {
            enforce_budget: true,
            require_exhausted_pool: true,
            bid_policy: BidPolicy::Any,
        }
    }
}

impl AuctionRules {
    /// Trust the caller for every precondition that is optional.
    pub fn permissive() -> Self {
        AuctionRules {
            enforce_budget: false,
            require_exhausted_pool: false,
            bid_policy: BidPolicy::Any,
        }
    }
}
