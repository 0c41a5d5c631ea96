//! Event-driven relay that republishes on-chain bet lifecycle events
//! as Farcaster casts, threading lifecycle updates under the cast that
//! announced each bet's creation.

pub mod cast;
pub mod config;
pub mod names;
pub mod onchain;
pub mod registry;
pub mod relay;
pub mod server;
pub mod store;
