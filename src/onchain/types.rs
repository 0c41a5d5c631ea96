//! Typed views of on-chain bet state and lifecycle events.

use alloy::primitives::{Address, U256};

/// The four lifecycle events a bet can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetEventKind {
    /// Factory deployed a new bet contract (offer made).
    Created,
    /// Participant matched the stake.
    Accepted,
    /// Participant declined; funds returned to the creator.
    Declined,
    /// Judge picked a winner (or declared a tie).
    Settled,
}

impl std::fmt::Display for BetEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "BetCreated"),
            Self::Accepted => write!(f, "BetAccepted"),
            Self::Declined => write!(f, "BetDeclined"),
            Self::Settled => write!(f, "BetSettled"),
        }
    }
}

/// Snapshot of a bet contract's `betDetails()` view.
#[derive(Debug, Clone)]
pub struct BetDetails {
    /// Factory-assigned id, unique per factory.
    pub bet_id: U256,
    pub creator: Address,
    pub participant: Address,
    /// Stake in integer token units.
    pub amount: U256,
    /// ERC-20 token the stake is denominated in.
    pub token: Address,
    /// Free-text terms of the wager.
    pub message: String,
    pub judge: Address,
    /// Unix timestamp after which an unaccepted offer expires.
    pub valid_until: U256,
}
