//! Shard connection handles.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::GatewayError;
use crate::payload::GatewayCommand;

/// Handle to one live shard connection.
#[async_trait]
pub trait GatewayConnection: Send + Sync {
    /// Queue a command on this shard.
    async fn send(&self, command: &GatewayCommand) -> Result<(), GatewayError>;

    /// Close the connection. `force` skips the graceful close handshake.
    async fn close(&self, force: bool) -> Result<(), GatewayError>;
}

/// Frames handed from a [`ChannelConnection`] to its transport task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Command(GatewayCommand),
    Close { force: bool },
}

/// Connection handle backed by a bounded channel.
///
/// The transport task owns the receiving end and writes frames to the
/// socket. Once closed, or once the receiver is gone, sends fail.
pub struct ChannelConnection {
    shard_index: u32,
    sender: mpsc::Sender<Outbound>,
    closed: AtomicBool,
}

impl ChannelConnection {
    pub fn new(shard_index: u32, capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let connection = Self {
            shard_index,
            sender,
            closed: AtomicBool::new(false),
        };
        (connection, receiver)
    }

    pub fn shard_index(&self) -> u32 {
        self.shard_index
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.sender.is_closed()
    }
}

#[async_trait]
impl GatewayConnection for ChannelConnection {
    async fn send(&self, command: &GatewayCommand) -> Result<(), GatewayError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(GatewayError::Closed {
                shard_index: self.shard_index,
            });
        }

        self.sender
            .send(Outbound::Command(command.clone()))
            .await
            .map_err(|_| GatewayError::Closed {
                shard_index: self.shard_index,
            })
    }

    async fn close(&self, force: bool) -> Result<(), GatewayError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        // A transport that already went away is as closed as it gets.
        if self.sender.send(Outbound::Close { force }).await.is_err() {
            debug!("Shard {} transport gone before close", self.shard_index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::UpdatePresence;

    fn presence() -> GatewayCommand {
        GatewayCommand::UpdatePresence(UpdatePresence {
            status: "idle".into(),
            afk: true,
            since: None,
        })
    }

    #[tokio::test]
    async fn test_send_forwards_to_receiver() {
        let (connection, mut receiver) = ChannelConnection::new(2, 8);
        assert_eq!(connection.shard_index(), 2);
        connection.send(&presence()).await.unwrap();
        assert_eq!(receiver.recv().await, Some(Outbound::Command(presence())));
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (connection, mut receiver) = ChannelConnection::new(4, 8);
        connection.close(false).await.unwrap();
        assert_eq!(receiver.recv().await, Some(Outbound::Close { force: false }));

        let err = connection.send(&presence()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Closed { shard_index: 4 }));
        assert!(connection.is_closed());

        // Second close is a no-op.
        connection.close(true).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_fails_when_transport_dropped() {
        let (connection, receiver) = ChannelConnection::new(1, 8);
        drop(receiver);
        assert!(connection.send(&presence()).await.is_err());
        assert!(connection.close(false).await.is_ok());
    }
}
