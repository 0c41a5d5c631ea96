use betcaster::cast::NeynarPublisher;
use betcaster::config::Config;
use betcaster::names::HttpAliasResolver;
use betcaster::onchain::abi::verify_topic_hashes;
use betcaster::onchain::reader::RpcBetReader;
use betcaster::registry::{AddressRegistry, AlchemyRegistry, NullRegistry};
use betcaster::relay::Dispatcher;
use betcaster::server::{self, AppState};
use betcaster::store::CastDirectory;

use alloy::primitives::Address;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config_path = Path::new("betcaster.toml");
    let have_config_file = config_path.exists();
    let config = if have_config_file {
        Config::load(config_path)?
    } else {
        Config::from_env()?
    };

    // Initialize logging before anything worth logging happens
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    if !have_config_file {
        info!("no betcaster.toml found, using env-only config");
    }

    // Sanity-check the pre-computed event topic hashes
    for (sig, ok) in verify_topic_hashes() {
        if !ok {
            anyhow::bail!("topic hash mismatch for event signature {sig}");
        }
    }
    info!("event topic hashes verified");

    // Token display table: config keys are hex contract addresses
    let mut tokens = HashMap::new();
    for (key, info) in &config.tokens {
        match key.parse::<Address>() {
            Ok(address) => {
                tokens.insert(address, info.clone());
            }
            Err(_) => warn!(token = key.as_str(), "ignoring unparseable token address"),
        }
    }

    let reader = Arc::new(RpcBetReader::new(&config.chain.rpc_url)?);
    let resolver = Arc::new(HttpAliasResolver::new(config.names.api_url.clone()));
    let publisher = Arc::new(NeynarPublisher::new(
        config.farcaster.api_url.clone(),
        config.farcaster.api_key.clone(),
        config.farcaster.signer_uuid.clone(),
    ));
    let registry: Arc<dyn AddressRegistry> = if config.registry.enabled {
        info!(webhook_id = config.registry.webhook_id.as_str(), "webhook address registry enabled");
        Arc::new(AlchemyRegistry::new(
            config.registry.api_url.clone(),
            config.registry.webhook_id.clone(),
            config.registry.auth_token.clone(),
        ))
    } else {
        Arc::new(NullRegistry)
    };

    let dispatcher = Dispatcher::new(
        reader,
        resolver,
        publisher,
        registry,
        CastDirectory::new(),
        tokens,
        config.farcaster.frame_base_url.clone(),
        Duration::from_secs(config.relay.event_timeout_secs),
    );

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
    };
    server::serve(state, &config.server.bind_addr).await
}
