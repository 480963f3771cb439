//! Shard registry.
//!
//! Maps shard index to its live connection and routes outbound commands.
//! Member-list requests additionally leave a pending marker in the store so
//! the chunks answering them can be correlated later.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::GatewayConnection;
use crate::error::GatewayError;
use crate::model::PendingMemberRequest;
use crate::payload::{GatewayCommand, ShardCommand};
use crate::store::{CompositeKey, StoreHolder};

/// Concurrent registry of shard connections.
///
/// Add, remove and find are safe to call from any task; only single-key
/// atomicity is provided.
pub struct ShardGroup {
    connections: DashMap<u32, Arc<dyn GatewayConnection>>,
    shard_count: u32,
    stores: Arc<StoreHolder>,
}

impl ShardGroup {
    pub fn new(shard_count: u32, stores: Arc<StoreHolder>) -> Self {
        Self {
            connections: DashMap::new(),
            shard_count,
            stores,
        }
    }

    /// Register a connection, replacing any previous one at `index`.
    pub fn add(&self, index: u32, connection: Arc<dyn GatewayConnection>) {
        if self.connections.insert(index, connection).is_some() {
            debug!("Replaced connection for shard {}", index);
        }
    }

    /// Unregister a connection. Unknown indices are ignored.
    pub fn remove(&self, index: u32) -> Option<Arc<dyn GatewayConnection>> {
        self.connections.remove(&index).map(|(_, connection)| connection)
    }

    pub fn find(&self, index: u32) -> Option<Arc<dyn GatewayConnection>> {
        self.connections
            .get(&index)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Total shards the client was configured with, registered or not.
    pub fn shard_count(&self) -> u32 {
        self.shard_count
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Registered shard indices, sorted.
    pub fn indices(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.connections.iter().map(|entry| *entry.key()).collect();
        indices.sort_unstable();
        indices
    }

    /// Copy out the current connections so no map guard is held across awaits.
    fn snapshot(&self) -> Vec<(u32, Arc<dyn GatewayConnection>)> {
        self.connections
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect()
    }

    /// Send `command` to every registered shard.
    ///
    /// Shards are handled concurrently and independently: a failure on one
    /// shard does not stop the others. After every shard finishes, the first
    /// failure (if any) is returned.
    pub async fn multicast(&self, command: &GatewayCommand) -> Result<(), GatewayError> {
        let shards = self.snapshot();
        let results = join_all(
            shards
                .iter()
                .map(|(index, connection)| self.send_to(*index, connection.as_ref(), command)),
        )
        .await;

        let mut first_error = None;
        for ((index, _), result) in shards.iter().zip(results) {
            if let Err(e) = result {
                warn!("Multicast to shard {} failed: {}", index, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Send a command to the shard it names.
    ///
    /// An unregistered target is not an error: nothing is sent and nothing
    /// is recorded.
    pub async fn unicast(&self, command: &ShardCommand) -> Result<(), GatewayError> {
        let Some(connection) = self.find(command.shard_index) else {
            debug!(
                "Shard {} not registered, dropping unicast",
                command.shard_index
            );
            return Ok(());
        };

        self.send_to(command.shard_index, connection.as_ref(), &command.command)
            .await
    }

    /// Gracefully close every connection.
    ///
    /// Waits for all closes to finish before reporting the first failure.
    pub async fn logout(&self) -> Result<(), GatewayError> {
        let shards = self.snapshot();
        info!("Closing {} shard connections", shards.len());

        let results = join_all(
            shards
                .iter()
                .map(|(_, connection)| connection.close(false)),
        )
        .await;

        let mut first_error = None;
        for ((index, _), result) in shards.iter().zip(results) {
            if let Err(e) = result {
                warn!("Failed to close shard {}: {}", index, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn send_to(
        &self,
        index: u32,
        connection: &dyn GatewayConnection,
        command: &GatewayCommand,
    ) -> Result<(), GatewayError> {
        connection.send(command).await?;

        if let Some(request) = command.as_member_request() {
            let key = CompositeKey::new(u64::from(index), request.guild_id);
            self.stores
                .pending_member_requests
                .put(key, PendingMemberRequest::new(index, request))
                .await?;
            debug!(
                "Recorded member request for guild {} on shard {}",
                request.guild_id, index
            );
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShardGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardGroup")
            .field("shard_count", &self.shard_count)
            .field("registered", &self.indices())
            .finish()
    }
}
