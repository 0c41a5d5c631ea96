use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required env var: {0}")]
    MissingEnv(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub farcaster: FarcasterConfig,
    #[serde(default)]
    pub names: NamesConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    /// Token contract address (lowercase hex) → display metadata.
    #[serde(default)]
    pub tokens: HashMap<String, TokenInfo>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the webhook listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint for read-only contract calls.
    pub rpc_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarcasterConfig {
    /// Cast publication API base URL.
    #[serde(default = "default_farcaster_api_url")]
    pub api_url: String,
    /// API key - loaded from env NEYNAR_API_KEY
    #[serde(default)]
    pub api_key: String,
    /// Signer UUID of the bot account - loaded from env NEYNAR_SIGNER_UUID
    #[serde(default)]
    pub signer_uuid: String,
    /// Base URL for bet frame links embedded in creation casts.
    #[serde(default)]
    pub frame_base_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamesConfig {
    /// Name-lookup API base URL. Empty disables resolution
    /// (every address falls back to its shortened form).
    #[serde(default)]
    pub api_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Enable upstream webhook address registration.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_registry_api_url")]
    pub api_url: String,
    /// Webhook id whose address filter gets patched.
    #[serde(default)]
    pub webhook_id: String,
    /// Auth token - loaded from env ALCHEMY_TOKEN
    #[serde(default)]
    pub auth_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Per-event budget covering read + resolve + publish.
    #[serde(default = "default_event_timeout")]
    pub event_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_farcaster_api_url() -> String {
    "https://api.neynar.com/v2/farcaster".to_string()
}

fn default_registry_api_url() -> String {
    "https://dashboard.alchemy.com/api".to_string()
}

fn default_event_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            event_timeout_secs: default_event_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from a TOML file, then overlay secrets from the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env();
        Ok(config)
    }

    /// Env-only construction for deployments without a config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = require_env("RPC_URL")?;
        let mut config = Config {
            server: ServerConfig::default(),
            chain: ChainConfig { rpc_url },
            farcaster: FarcasterConfig {
                api_url: default_farcaster_api_url(),
                api_key: String::new(),
                signer_uuid: String::new(),
                frame_base_url: std::env::var("FRAME_BASE_URL").unwrap_or_default(),
            },
            names: NamesConfig {
                api_url: std::env::var("NAMES_API_URL").unwrap_or_default(),
            },
            registry: RegistryConfig {
                enabled: std::env::var("WEBHOOK_ID").is_ok(),
                api_url: default_registry_api_url(),
                webhook_id: std::env::var("WEBHOOK_ID").unwrap_or_default(),
                auth_token: String::new(),
            },
            relay: RelayConfig::default(),
            tokens: HashMap::new(),
            logging: LoggingConfig::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Secrets never live in the TOML file.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("NEYNAR_API_KEY") {
            self.farcaster.api_key = key;
        }
        if let Ok(signer) = std::env::var("NEYNAR_SIGNER_UUID") {
            self.farcaster.signer_uuid = signer;
        }
        if let Ok(token) = std::env::var("ALCHEMY_TOKEN") {
            self.registry.auth_token = token;
        }
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))
}
