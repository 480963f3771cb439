//! Aether - Gateway Cache for Sharded Bot Clients
//!
//! Keeps a local cache of guild state in sync with gateway dispatches and
//! routes outbound commands to the right shard.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration
//! - `cache` - Moka-backed read-through caching
//! - `store` - Entity stores (memory, MongoDB, cached)
//! - `model` - Cache records
//! - `payload` - Decoded dispatch payloads and outbound commands
//! - `event` - Domain entities and events handed to listeners
//! - `dispatch` - Translates dispatches into store writes plus events
//! - `shard` - Shard connections and the shard group registry
//! - `runtime` - Replay driver used by the binary

pub mod cache;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod model;
pub mod payload;
pub mod runtime;
pub mod shard;
pub mod store;

#[cfg(test)]
mod testing;
