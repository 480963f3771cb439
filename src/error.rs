//! Error types.
//!
//! A cache miss is never an error: stores return `Ok(None)` for absent keys.
//! Everything here is scoped to the single operation that produced it.

/// Failure of a backing entity store call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {reason}")]
    Backend {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("record serialization failed: {reason}")]
    Serialization {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Backend failure without an underlying cause.
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Backend {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<mongodb::bson::de::Error> for StoreError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Failure on a shard connection or on the send path's side effect.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("shard {shard_index} connection is closed")]
    Closed { shard_index: u32 },

    #[error("shard {shard_index} transport error: {reason}")]
    Transport { shard_index: u32, reason: String },

    #[error("failed to record pending request: {0}")]
    SideEffect(#[from] StoreError),
}

/// Failure of a single dispatch translation.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
