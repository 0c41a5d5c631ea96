//! Contract event ABI definitions and topic hash classification.
//!
//! We define minimal ABIs covering just the events we need to decode,
//! using computed keccak256 topic0 hashes to classify inbound logs.

use crate::onchain::types::BetEventKind;
use alloy::primitives::{b256, keccak256, B256};

// ─── Event topic0 hashes (keccak256 of event signature) ──────────────────────
//
// Pre-computed at compile time. The factory emits BetCreated with the new
// bet contract's address in topic1; the bet contract itself emits the
// remaining three lifecycle events.

/// keccak256("BetCreated(address,address,address,uint256)")
pub const BET_CREATED_TOPIC: B256 =
    b256!("eb61722110fd856b0d96d3312d86d62fcda6eee1eee2366d2c10e1d564d120e8");

/// keccak256("BetAccepted(address)")
pub const BET_ACCEPTED_TOPIC: B256 =
    b256!("dd6dae32994530eefb2d3b21473a19ec9f41d294a4fd6353b9b16d2d2c674b96");

/// keccak256("BetDeclined(address)")
pub const BET_DECLINED_TOPIC: B256 =
    b256!("815a1274b6d601b9c13c3a4ca7a73f7f180c6808c6b73b68360880ab923d979a");

/// keccak256("BetSettled(address,address)")
pub const BET_SETTLED_TOPIC: B256 =
    b256!("1263c5e68e09cb9dfb7e7df0f53d955963a974e73d6ef177fadeb882cd9629ab");

impl BetEventKind {
    /// Classify a log by its topic0 signature hash.
    ///
    /// Total over all 32-byte values: anything outside the four known
    /// lifecycle events returns `None` and the caller skips the log.
    pub fn from_topic0(topic0: B256) -> Option<Self> {
        match topic0 {
            BET_CREATED_TOPIC => Some(Self::Created),
            BET_ACCEPTED_TOPIC => Some(Self::Accepted),
            BET_DECLINED_TOPIC => Some(Self::Declined),
            BET_SETTLED_TOPIC => Some(Self::Settled),
            _ => None,
        }
    }
}

/// Verify that our pre-computed topic hashes match the event signatures.
/// Call this at startup to catch any signature mismatches.
pub fn verify_topic_hashes() -> Vec<(String, bool)> {
    let checks = vec![
        ("BetCreated(address,address,address,uint256)", BET_CREATED_TOPIC),
        ("BetAccepted(address)", BET_ACCEPTED_TOPIC),
        ("BetDeclined(address)", BET_DECLINED_TOPIC),
        ("BetSettled(address,address)", BET_SETTLED_TOPIC),
    ];

    checks
        .into_iter()
        .map(|(sig, expected)| {
            let computed = keccak256(sig.as_bytes());
            (sig.to_string(), computed == expected)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_hashes_match_signatures() {
        for (sig, ok) in verify_topic_hashes() {
            assert!(ok, "topic hash mismatch for {sig}");
        }
    }

    #[test]
    fn classifies_all_known_topics() {
        assert_eq!(
            BetEventKind::from_topic0(BET_CREATED_TOPIC),
            Some(BetEventKind::Created)
        );
        assert_eq!(
            BetEventKind::from_topic0(BET_ACCEPTED_TOPIC),
            Some(BetEventKind::Accepted)
        );
        assert_eq!(
            BetEventKind::from_topic0(BET_DECLINED_TOPIC),
            Some(BetEventKind::Declined)
        );
        assert_eq!(
            BetEventKind::from_topic0(BET_SETTLED_TOPIC),
            Some(BetEventKind::Settled)
        );
    }

    #[test]
    fn unknown_topic_is_unrecognized() {
        assert_eq!(BetEventKind::from_topic0(B256::ZERO), None);
        assert_eq!(
            BetEventKind::from_topic0(keccak256(b"Transfer(address,address,uint256)")),
            None
        );
    }
}
