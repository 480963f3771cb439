//! Cache module - Moka-backed in-process caching.
//!
//! Used by [`crate::store::CachedStore`] to keep hot records in memory in
//! front of a remote store backend.
//!
//! ## Usage
//!
//! ```rust
//! use aether::cache::{CacheConfig, TypedCache};
//!
//! let guilds: TypedCache<u64, String> = TypedCache::new("guilds", CacheConfig::default());
//! guilds.insert(1, "lobby".to_string());
//! assert_eq!(guilds.get(&1).as_deref(), Some("lobby"));
//! ```

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::{CacheStats, TypedCache};
