//! Read-only contract access over JSON-RPC.
//!
//! Each bet is its own deployed contract exposing `betDetails()` and
//! `winner()` views. Reads are idempotent and carry no retry policy of
//! their own; the dispatcher decides what a failed read means.

use crate::onchain::types::BetDetails;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;
use thiserror::Error;

sol! {
    #[sol(rpc)]
    interface IBet {
        function betDetails()
            external
            view
            returns (
                uint256 betId,
                address creator,
                address participant,
                uint256 amount,
                address token,
                string memory message,
                address judge,
                uint256 validUntil
            );
        function winner() external view returns (address);
    }
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("invalid rpc url: {0}")]
    InvalidUrl(String),
    #[error("contract call failed: {0}")]
    Call(#[from] alloy::contract::Error),
    #[error("view call reverted: {0}")]
    Revert(String),
}

/// Read-only queries against a deployed bet contract.
#[async_trait]
pub trait BetReader: Send + Sync {
    async fn bet_details(&self, bet: Address) -> Result<BetDetails, ReadError>;

    /// Settled winner; the zero address signals a tie or not-yet-settled.
    async fn winner(&self, bet: Address) -> Result<Address, ReadError>;
}

/// `BetReader` backed by an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcBetReader {
    provider: DynProvider,
}

impl RpcBetReader {
    pub fn new(rpc_url: &str) -> Result<Self, ReadError> {
        let url = rpc_url
            .parse()
            .map_err(|_| ReadError::InvalidUrl(rpc_url.to_string()))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self { provider })
    }
}

#[async_trait]
impl BetReader for RpcBetReader {
    async fn bet_details(&self, bet: Address) -> Result<BetDetails, ReadError> {
        let contract = IBet::new(bet, self.provider.clone());
        let details = contract.betDetails().call().await?;
        Ok(BetDetails {
            bet_id: details.betId,
            creator: details.creator,
            participant: details.participant,
            amount: details.amount,
            token: details.token,
            message: details.message,
            judge: details.judge,
            valid_until: details.validUntil,
        })
    }

    async fn winner(&self, bet: Address) -> Result<Address, ReadError> {
        let contract = IBet::new(bet, self.provider.clone());
        Ok(contract.winner().call().await?)
    }
}
