//! Upstream webhook address-filter maintenance.
//!
//! The webhook provider only delivers logs for addresses on its filter
//! list. A freshly deployed bet contract is unknown to it, so the relay
//! adds the contract on creation and removes it again once the bet
//! reaches a terminal state. All of this is best-effort: a failed patch
//! costs us future events for one bet, never the current cast.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const PATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Maintains the set of contract addresses the upstream webhook watches.
#[async_trait]
pub trait AddressRegistry: Send + Sync {
    async fn add(&self, address: Address);
    async fn remove(&self, address: Address);
}

/// Registry patching an Alchemy custom webhook's address list.
pub struct AlchemyRegistry {
    api_url: String,
    webhook_id: String,
    auth_token: String,
    client: reqwest::Client,
}

impl AlchemyRegistry {
    pub fn new(api_url: String, webhook_id: String, auth_token: String) -> Self {
        Self {
            api_url,
            webhook_id,
            auth_token,
            client: reqwest::Client::new(),
        }
    }

    async fn patch(&self, add: Vec<String>, remove: Vec<String>) {
        let body = json!({
            "webhook_id": self.webhook_id,
            "addresses_to_add": add,
            "addresses_to_remove": remove,
        });
        let result = self
            .client
            .patch(format!("{}/update-webhook-addresses", self.api_url))
            .header("X-Alchemy-Token", &self.auth_token)
            .json(&body)
            .timeout(PATCH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        match result {
            Ok(_) => debug!("webhook address filter updated"),
            Err(err) => warn!(error = %err, "failed to update webhook address filter"),
        }
    }
}

#[async_trait]
impl AddressRegistry for AlchemyRegistry {
    async fn add(&self, address: Address) {
        self.patch(vec![address.to_string()], vec![]).await;
    }

    async fn remove(&self, address: Address) {
        self.patch(vec![], vec![address.to_string()]).await;
    }
}

/// No-op registry for deployments without upstream filter management.
pub struct NullRegistry;

#[async_trait]
impl AddressRegistry for NullRegistry {
    async fn add(&self, _address: Address) {}

    async fn remove(&self, _address: Address) {}
}
