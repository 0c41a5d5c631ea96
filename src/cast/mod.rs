//! Farcaster cast publication via the Neynar managed-signer API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("cast request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("cast rejected by platform: status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Threading and embed options for a cast.
#[derive(Debug, Clone, Default)]
pub struct CastOptions {
    /// Hash of the cast to reply under; `None` posts top-level.
    pub reply_to: Option<String>,
    /// Frame URL embedded in the cast (creation announcements).
    pub embed_url: Option<String>,
}

/// Posts a message to the social network, returning the new cast's hash.
#[async_trait]
pub trait CastPublisher: Send + Sync {
    async fn publish(&self, text: &str, options: CastOptions) -> Result<String, PublishError>;
}

#[derive(Debug, Deserialize)]
struct CastResponse {
    cast: CastBody,
}

#[derive(Debug, Deserialize)]
struct CastBody {
    hash: String,
}

/// `CastPublisher` backed by Neynar's `POST /cast` endpoint.
pub struct NeynarPublisher {
    api_url: String,
    api_key: String,
    signer_uuid: String,
    client: reqwest::Client,
}

impl NeynarPublisher {
    pub fn new(api_url: String, api_key: String, signer_uuid: String) -> Self {
        Self {
            api_url,
            api_key,
            signer_uuid,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CastPublisher for NeynarPublisher {
    async fn publish(&self, text: &str, options: CastOptions) -> Result<String, PublishError> {
        let mut body = json!({
            "signer_uuid": self.signer_uuid,
            "text": text,
        });
        if let Some(parent) = &options.reply_to {
            body["parent"] = json!(parent);
        }
        if let Some(url) = &options.embed_url {
            body["embeds"] = json!([{ "url": url }]);
        }

        let response = self
            .client
            .post(format!("{}/cast", self.api_url))
            .header("api_key", &self.api_key)
            .json(&body)
            .timeout(PUBLISH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let cast: CastResponse = response.json().await?;
        debug!(hash = %cast.cast.hash, reply = options.reply_to.is_some(), "published cast");
        Ok(cast.cast.hash)
    }
}
