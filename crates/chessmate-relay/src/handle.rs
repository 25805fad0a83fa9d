//! Per-connection outbound handle.
//!
//! The matchmaker never touches a socket. Each live connection hands it a
//! `ConnectionHandle` whose instructions are drained by that connection's
//! own task, so a slow client can only ever fill its own queue.

use tokio::sync::mpsc;

use chessmate_common::{ConnectionId, RelayError};

use crate::protocol::ServerMessage;

/// Instruction for a connection task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Message(ServerMessage),
    /// Send a close frame and stop.
    Close,
}

/// Sending side of one connection's outbound queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::Sender<Outbound>,
}

impl ConnectionHandle {
    /// Create a handle plus the receiver the connection task drains.
    pub fn channel(id: ConnectionId, capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue a message without waiting.
    pub fn send(&self, message: ServerMessage) -> Result<(), RelayError> {
        self.push(Outbound::Message(message))
    }

    /// Ask the connection task to close the socket.
    pub fn close(&self) -> Result<(), RelayError> {
        self.push(Outbound::Close)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn push(&self, item: Outbound) -> Result<(), RelayError> {
        self.tx.try_send(item).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => RelayError::QueueFull(self.id.clone()),
            mpsc::error::TrySendError::Closed(_) => RelayError::ConnectionClosed(self.id.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Winner;

    fn game_over() -> ServerMessage {
        ServerMessage::GameOver {
            winner: Winner::You,
        }
    }

    #[tokio::test]
    async fn send_and_close_are_delivered_in_order() {
        let (handle, mut rx) = ConnectionHandle::channel(ConnectionId::from("a"), 4);
        handle.send(game_over()).unwrap();
        handle.close().unwrap();

        assert_eq!(rx.recv().await, Some(Outbound::Message(game_over())));
        assert_eq!(rx.recv().await, Some(Outbound::Close));
    }

    #[test]
    fn full_queue_is_reported() {
        let (handle, _rx) = ConnectionHandle::channel(ConnectionId::from("a"), 1);
        handle.send(game_over()).unwrap();
        let err = handle.send(game_over()).unwrap_err();
        assert!(matches!(err, RelayError::QueueFull(ref id) if id.as_str() == "a"));
    }

    #[test]
    fn dropped_receiver_is_reported() {
        let (handle, rx) = ConnectionHandle::channel(ConnectionId::from("b"), 4);
        drop(rx);
        assert!(handle.is_closed());
        let err = handle.close().unwrap_err();
        assert!(matches!(err, RelayError::ConnectionClosed(_)));
    }

    #[tokio::test]
    async fn receiver_ends_when_all_handles_dropped() {
        let (handle, mut rx) = ConnectionHandle::channel(ConnectionId::from("c"), 4);
        drop(handle);
        assert_eq!(rx.recv().await, None);
    }
}
