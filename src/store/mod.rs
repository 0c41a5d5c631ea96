//! In-memory bet id → cast hash directory.
//!
//! Data model:
//!   bet_id (U256)  →  hash of the cast that announced the bet's creation
//!
//! Entries live from BetCreated until the bet's terminal event
//! (declined/settled), which removes them. Accept only reads. There is
//! no durability: a restart loses thread continuity for bets announced
//! before it, and the follow-up casts go out top-level instead.

use alloy::primitives::U256;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Cloneable handle to the shared directory. Operations are atomic;
/// no lock is ever held across a suspension point.
#[derive(Clone, Default)]
pub struct CastDirectory {
    inner: Arc<Mutex<HashMap<U256, String>>>,
}

impl CastDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the creation cast for a bet. At most one live entry per
    /// bet id; a duplicate creation event overwrites.
    pub fn insert(&self, bet_id: U256, cast_hash: String) {
        self.inner
            .lock()
            .expect("cast directory lock poisoned")
            .insert(bet_id, cast_hash);
    }

    pub fn get(&self, bet_id: U256) -> Option<String> {
        self.inner
            .lock()
            .expect("cast directory lock poisoned")
            .get(&bet_id)
            .cloned()
    }

    /// Atomic get-and-remove for terminal events. Two handlers racing on
    /// the same bet id see the entry exactly once between them.
    pub fn take(&self, bet_id: U256) -> Option<String> {
        self.inner
            .lock()
            .expect("cast directory lock poisoned")
            .remove(&bet_id)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("cast directory lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_take_roundtrip() {
        let directory = CastDirectory::new();
        let id = U256::from(42u64);
        assert_eq!(directory.get(id), None);

        directory.insert(id, "0xcast".to_string());
        assert_eq!(directory.get(id), Some("0xcast".to_string()));

        assert_eq!(directory.take(id), Some("0xcast".to_string()));
        assert_eq!(directory.get(id), None);
        assert_eq!(directory.take(id), None);
        assert!(directory.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let directory = CastDirectory::new();
        let other = directory.clone();
        directory.insert(U256::from(7u64), "0xabc".to_string());
        assert_eq!(other.get(U256::from(7u64)), Some("0xabc".to_string()));
    }

    #[tokio::test]
    async fn concurrent_distinct_keys_do_not_interfere() {
        let directory = CastDirectory::new();
        let mut handles = Vec::new();
        for i in 0..64u64 {
            let dir = directory.clone();
            handles.push(tokio::spawn(async move {
                let id = U256::from(i);
                dir.insert(id, format!("0xhash{i}"));
                assert_eq!(dir.get(id), Some(format!("0xhash{i}")));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(directory.len(), 64);
        for i in 0..64u64 {
            assert_eq!(directory.take(U256::from(i)), Some(format!("0xhash{i}")));
        }
        assert!(directory.is_empty());
    }
}
