//! Wire types for the inbound webhook payload.
//!
//! The upstream provider delivers one block's worth of logs per request,
//! GraphQL-shaped: `event.data.block.logs[]`. Fields we never touch
//! (transaction context, sequence numbers) are left to serde's unknown-
//! field handling.

use alloy::primitives::{Address, Bytes, B256};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: EventPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub block: BlockLogs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockLogs {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// One raw log: ABI-packed data, ordered topics (topic0 is the event
/// signature hash), and the emitting contract.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub data: Bytes,
    pub topics: Vec<B256>,
    #[serde(default)]
    pub index: u64,
    pub account: LogAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogAccount {
    pub address: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_payload() {
        let raw = r#"{
            "webhookId": "wh_abc",
            "id": "evt_123",
            "createdAt": "2024-05-01T00:00:00Z",
            "type": "GRAPHQL",
            "event": {
                "sequenceNumber": "100",
                "data": {
                    "block": {
                        "number": 192000000,
                        "timestamp": 1714521600,
                        "logs": [
                            {
                                "data": "0x",
                                "topics": [
                                    "0xdd6dae32994530eefb2d3b21473a19ec9f41d294a4fd6353b9b16d2d2c674b96",
                                    "0x000000000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
                                ],
                                "index": 3,
                                "account": {
                                    "address": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
                                },
                                "transaction": { "hash": "0x00" }
                            }
                        ]
                    }
                }
            }
        }"#;
        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        let block = payload.event.data.block;
        assert_eq!(block.number, 192000000);
        assert_eq!(block.logs.len(), 1);
        assert_eq!(block.logs[0].topics.len(), 2);
        assert_eq!(block.logs[0].index, 3);
    }
}
