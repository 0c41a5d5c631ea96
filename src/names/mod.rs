//! Address → alias resolution against the protocol's name service.
//!
//! Resolution is strictly best-effort: casts must never be blocked on a
//! name lookup, so every path degrades to a shortened hex address.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Shortened display form, e.g. `0xA1b...c3D`.
pub fn shorten_hex_address(address: Address) -> String {
    let hex = address.to_string();
    format!("{}...{}", &hex[..5], &hex[hex.len() - 3..])
}

/// Batched address → alias lookup.
#[async_trait]
pub trait AliasResolver: Send + Sync {
    /// Resolve every input address to a display alias. Duplicates in the
    /// input are fine; the result always contains an entry per distinct
    /// address, falling back to the shortened hex form.
    async fn resolve(&self, addresses: &[Address]) -> HashMap<Address, String>;
}

#[derive(Debug, Deserialize)]
struct NameEntry {
    address: Address,
    name: String,
}

/// Resolver backed by the name-lookup HTTP API (one bulk round trip).
pub struct HttpAliasResolver {
    api_url: String,
    client: reqwest::Client,
}

impl HttpAliasResolver {
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_names(&self, addresses: &[Address]) -> Result<Vec<NameEntry>, reqwest::Error> {
        let joined = addresses
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/names?addresses={}", self.api_url, joined);
        self.client
            .get(&url)
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl AliasResolver for HttpAliasResolver {
    async fn resolve(&self, addresses: &[Address]) -> HashMap<Address, String> {
        let distinct: Vec<Address> = addresses
            .iter()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut aliases: HashMap<Address, String> = HashMap::new();
        if !self.api_url.is_empty() && !distinct.is_empty() {
            match self.fetch_names(&distinct).await {
                Ok(entries) => {
                    debug!(found = entries.len(), queried = distinct.len(), "resolved aliases");
                    for entry in entries {
                        if !entry.name.is_empty() {
                            aliases.insert(entry.address, entry.name);
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "alias lookup failed, falling back to shortened addresses");
                }
            }
        }

        for addr in distinct {
            aliases
                .entry(addr)
                .or_insert_with(|| shorten_hex_address(addr));
        }
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn shortens_to_prefix_and_suffix() {
        let addr = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let short = shorten_hex_address(addr);
        assert_eq!(short, "0xaAa...aAa");
        assert_eq!(short.len(), 11);
    }

    #[tokio::test]
    async fn empty_api_url_falls_back_for_every_address() {
        let resolver = HttpAliasResolver::new(String::new());
        let a = address!("000000000000000000000000000000000000dEaD");
        let b = address!("000000000000000000000000000000000000bEEF");
        // duplicate input must not break anything
        let resolved = resolver.resolve(&[a, b, a]).await;
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[&a], shorten_hex_address(a));
        assert_eq!(resolved[&b], shorten_hex_address(b));
    }
}
