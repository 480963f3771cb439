//! Shard connections and the registry routing commands to them.

mod connection;
mod group;

pub use connection::{ChannelConnection, GatewayConnection, Outbound};
pub use group::ShardGroup;
