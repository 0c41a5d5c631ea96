//! Core webhook dispatcher.
//!
//! Takes one block's worth of raw logs, classifies each by topic0,
//! reads the bet contract's current state, resolves party aliases,
//! composes a human-readable message, and publishes it as a cast —
//! threading accept/decline/settle updates under the creation cast
//! recorded in the [`CastDirectory`].
//!
//! Every log in a batch is handled concurrently and independently: one
//! event's failure never aborts its siblings, and the batch is only
//! acknowledged once every outcome (success, skip, or logged failure)
//! has been collected.

pub mod payload;

use crate::cast::{CastOptions, CastPublisher, PublishError};
use crate::config::TokenInfo;
use crate::names::{shorten_hex_address, AliasResolver};
use crate::onchain::reader::{BetReader, ReadError};
use crate::onchain::types::BetEventKind;
use crate::registry::AddressRegistry;
use crate::relay::payload::{BlockLogs, LogEntry};
use crate::store::CastDirectory;

use alloy::primitives::{Address, B256, U256};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("contract read failed: {0}")]
    Read(#[from] ReadError),
    #[error("cast publish failed: {0}")]
    Publish(#[from] PublishError),
    #[error("event handling timed out after {0:?}")]
    Timeout(Duration),
}

/// Why a log was dropped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Log carried no topics at all.
    EmptyTopics,
    /// topic0 does not match any bet lifecycle event.
    UnrecognizedTopic(B256),
    /// Creation log without the indexed bet contract address.
    MissingAddressTopic,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTopics => write!(f, "log has no topics"),
            Self::UnrecognizedTopic(topic) => write!(f, "unrecognized event signature {topic}"),
            Self::MissingAddressTopic => {
                write!(f, "creation log missing contract address topic")
            }
        }
    }
}

/// Per-event result, surfaced in the batch summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Published,
    Skipped(SkipReason),
}

/// Aggregated outcome of one webhook batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub total: usize,
    pub published: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// The orchestrator: owns the cast directory and fans batches out over
/// the injected reader/resolver/publisher/registry boundaries.
pub struct Dispatcher {
    reader: Arc<dyn BetReader>,
    resolver: Arc<dyn AliasResolver>,
    publisher: Arc<dyn CastPublisher>,
    registry: Arc<dyn AddressRegistry>,
    casts: CastDirectory,
    /// Token contract → display metadata for amount formatting.
    tokens: HashMap<Address, TokenInfo>,
    frame_base_url: String,
    event_timeout: Duration,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Arc<dyn BetReader>,
        resolver: Arc<dyn AliasResolver>,
        publisher: Arc<dyn CastPublisher>,
        registry: Arc<dyn AddressRegistry>,
        casts: CastDirectory,
        tokens: HashMap<Address, TokenInfo>,
        frame_base_url: String,
        event_timeout: Duration,
    ) -> Self {
        Self {
            reader,
            resolver,
            publisher,
            registry,
            casts,
            tokens,
            frame_base_url,
            event_timeout,
        }
    }

    /// Handle every log in the block concurrently, awaiting all outcomes.
    /// Failures are contained per event; only the summary escapes.
    pub async fn dispatch_block(&self, block: &BlockLogs) -> DispatchSummary {
        info!(
            block = block.number,
            logs = block.logs.len(),
            "dispatching webhook block"
        );

        let tasks = block.logs.iter().map(|log| async move {
            let result = match tokio::time::timeout(self.event_timeout, self.handle_log(log)).await
            {
                Ok(result) => result,
                Err(_) => Err(RelayError::Timeout(self.event_timeout)),
            };
            (log, result)
        });

        let mut summary = DispatchSummary::default();
        for (log, result) in join_all(tasks).await {
            summary.total += 1;
            match result {
                Ok(EventOutcome::Published) => summary.published += 1,
                Ok(EventOutcome::Skipped(reason)) => {
                    summary.skipped += 1;
                    warn!(
                        contract = %log.account.address,
                        index = log.index,
                        reason = %reason,
                        "skipped log"
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(
                        contract = %log.account.address,
                        index = log.index,
                        error = %err,
                        "event handling failed"
                    );
                }
            }
        }
        summary
    }

    async fn handle_log(&self, log: &LogEntry) -> Result<EventOutcome, RelayError> {
        let Some(topic0) = log.topics.first().copied() else {
            return Ok(EventOutcome::Skipped(SkipReason::EmptyTopics));
        };
        let Some(kind) = BetEventKind::from_topic0(topic0) else {
            return Ok(EventOutcome::Skipped(SkipReason::UnrecognizedTopic(topic0)));
        };
        debug!(event = %kind, contract = %log.account.address, "handling event");

        match kind {
            BetEventKind::Created => self.handle_created(log).await,
            BetEventKind::Accepted => self.handle_accepted(log).await,
            BetEventKind::Declined => self.handle_declined(log).await,
            BetEventKind::Settled => self.handle_settled(log).await,
        }
    }

    /// The factory emits the new bet contract's address as topic1; the
    /// contract is unknown to the webhook filter until we register it.
    async fn handle_created(&self, log: &LogEntry) -> Result<EventOutcome, RelayError> {
        let Some(address_topic) = log.topics.get(1).copied() else {
            return Ok(EventOutcome::Skipped(SkipReason::MissingAddressTopic));
        };
        let bet_address = Address::from_word(address_topic);

        self.registry.add(bet_address).await;

        let details = self.reader.bet_details(bet_address).await?;
        let aliases = self
            .resolver
            .resolve(&[details.creator, details.participant])
            .await;
        let creator = alias_of(&aliases, details.creator);
        let participant = alias_of(&aliases, details.participant);

        let (symbol, decimals) = self.token_display(details.token);
        let amount = format_token_amount(details.amount, decimals);

        let mut text = format!("{creator} offered a new {amount} {symbol} bet to {participant}");
        if !details.message.is_empty() {
            text.push_str(&format!(": \"{}\"", details.message));
        }

        let embed_url = (!self.frame_base_url.is_empty())
            .then(|| format!("{}/bet/{}", self.frame_base_url, details.bet_id));
        let cast_hash = self
            .publisher
            .publish(
                &text,
                CastOptions {
                    reply_to: None,
                    embed_url,
                },
            )
            .await?;

        self.casts.insert(details.bet_id, cast_hash);
        Ok(EventOutcome::Published)
    }

    async fn handle_accepted(&self, log: &LogEntry) -> Result<EventOutcome, RelayError> {
        let bet_address = log.account.address;
        let details = self.reader.bet_details(bet_address).await?;
        let aliases = self.resolver.resolve(&[details.participant]).await;
        let participant = alias_of(&aliases, details.participant);

        let text = format!("{participant} accepted the bet! Awaiting the results...");
        // Threading is best-effort: without a recorded creation cast the
        // update goes out top-level.
        let reply_to = self.casts.get(details.bet_id);
        self.publisher
            .publish(
                &text,
                CastOptions {
                    reply_to,
                    embed_url: None,
                },
            )
            .await?;
        Ok(EventOutcome::Published)
    }

    async fn handle_declined(&self, log: &LogEntry) -> Result<EventOutcome, RelayError> {
        let bet_address = log.account.address;
        self.registry.remove(bet_address).await;

        let details = self.reader.bet_details(bet_address).await?;
        let aliases = self.resolver.resolve(&[details.participant]).await;
        let participant = alias_of(&aliases, details.participant);

        let text = format!("{participant} declined the bet! Funds have been returned.");
        let reply_to = self.casts.take(details.bet_id);
        self.publisher
            .publish(
                &text,
                CastOptions {
                    reply_to,
                    embed_url: None,
                },
            )
            .await?;
        Ok(EventOutcome::Published)
    }

    async fn handle_settled(&self, log: &LogEntry) -> Result<EventOutcome, RelayError> {
        let bet_address = log.account.address;
        self.registry.remove(bet_address).await;

        let (details, winner) = tokio::try_join!(
            self.reader.bet_details(bet_address),
            self.reader.winner(bet_address)
        )?;

        let is_tie = winner == Address::ZERO;
        let aliases = if is_tie {
            self.resolver.resolve(&[details.judge]).await
        } else {
            self.resolver.resolve(&[details.judge, winner]).await
        };
        let judge = alias_of(&aliases, details.judge);

        let text = if is_tie {
            format!("{judge} settled the bet. Both parties tied!")
        } else {
            let winner_alias = alias_of(&aliases, winner);
            format!("{judge} settled the bet. {winner_alias} won!")
        };

        let reply_to = self.casts.take(details.bet_id);
        self.publisher
            .publish(
                &text,
                CastOptions {
                    reply_to,
                    embed_url: None,
                },
            )
            .await?;
        Ok(EventOutcome::Published)
    }

    fn token_display(&self, token: Address) -> (String, u8) {
        match self.tokens.get(&token) {
            Some(info) => (info.symbol.clone(), info.decimals),
            // Unknown token: no symbol to show, assume the ERC-20 default
            // of 18 decimals.
            None => (shorten_hex_address(token), 18),
        }
    }
}

fn alias_of(aliases: &HashMap<Address, String>, address: Address) -> String {
    aliases
        .get(&address)
        .cloned()
        .unwrap_or_else(|| shorten_hex_address(address))
}

/// Exact decimal rendering of an integer token amount. Pure integer
/// arithmetic, so USDC-scale values never pick up float drift.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    // 10^78 overflows U256; a config with such a decimals value gets
    // the raw integer string rather than garbage.
    let Some(scale) = U256::from(10u8).checked_pow(U256::from(decimals)) else {
        return amount.to_string();
    };
    let whole = amount / scale;
    let frac = amount % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_digits = frac.to_string();
    let padded = format!("{frac_digits:0>width$}", width = decimals as usize);
    format!("{whole}.{}", padded.trim_end_matches('0'))
}
