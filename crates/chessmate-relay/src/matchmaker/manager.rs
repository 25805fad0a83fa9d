//! Pairing and relay engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use chessmate_common::{ConnectionId, RelayError};

use super::types::{JoinOutcome, MatchSnapshot, MatchState, MatchStats};
use crate::handle::ConnectionHandle;
use crate::protocol::{ClientMessage, Color, MoveFields, ServerMessage, Winner};

// ---------------------------------------------------------------------------
// Matchmaker
// ---------------------------------------------------------------------------

/// Pairs waiting connections and relays moves between paired peers.
///
/// Cheap to clone; every clone shares the same state. Each operation takes
/// the lock once, applies its whole read-modify-write, and releases it
/// before any message is queued to a connection.
#[derive(Clone, Default)]
pub struct Matchmaker {
    state: Arc<RwLock<MatchState>>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly opened connection.
    pub async fn register(&self, handle: ConnectionHandle) {
        let id = handle.id().clone();
        let replaced = self.state.write().await.register(handle);
        if replaced.is_some() {
            warn!(connection = %id, "Connection re-registered, replacing handle");
        }
    }

    /// Route a decoded client message.
    pub async fn dispatch(&self, id: &ConnectionId, message: ClientMessage) {
        match message {
            ClientMessage::Join => {
                self.join(id).await;
            }
            ClientMessage::Move(fields) => {
                self.forward(id, fields).await;
            }
            ClientMessage::Unknown => {
                debug!(connection = %id, "Ignoring message with unknown type");
            }
        }
    }

    /// Queue `id` for a game, or pair it with the longest-waiting connection.
    ///
    /// The waiter plays white and the joiner black. Both `start` messages
    /// are attempted even if one of them fails.
    pub async fn join(&self, id: &ConnectionId) -> JoinOutcome {
        let (opponent, opponent_handle, own_handle) = {
            let mut state = self.state.write().await;
            match state.join(id, Instant::now()) {
                JoinOutcome::Paired { opponent } => {
                    let opponent_handle = state.handle(&opponent);
                    let own_handle = state.handle(id);
                    (opponent, opponent_handle, own_handle)
                }
                JoinOutcome::Queued => {
                    info!(connection = %id, "Waiting for an opponent");
                    return JoinOutcome::Queued;
                }
                other => {
                    debug!(connection = %id, outcome = ?other, "Join ignored");
                    return other;
                }
            }
        };

        notify(
            opponent_handle.as_ref(),
            ServerMessage::Start {
                color: Color::White,
                opponent_id: id.clone(),
            },
        );
        notify(
            own_handle.as_ref(),
            ServerMessage::Start {
                color: Color::Black,
                opponent_id: opponent.clone(),
            },
        );

        info!(white = %opponent, black = %id, "Players paired");
        JoinOutcome::Paired { opponent }
    }

    /// Relay a move to the sender's opponent as `opponentMove`.
    ///
    /// Returns whether the move was queued. Moves from unpaired connections
    /// are dropped without complaint.
    pub async fn forward(&self, id: &ConnectionId, fields: MoveFields) -> bool {
        let target = self.state.read().await.peer_handle(id);
        let Some((peer, handle)) = target else {
            debug!(connection = %id, "Dropping move from unpaired connection");
            return false;
        };

        match handle.send(ServerMessage::OpponentMove(fields)) {
            Ok(()) => {
                debug!(from = %id, to = %peer, "Move relayed");
                true
            }
            Err(e) => {
                log_send_failure(&e);
                false
            }
        }
    }

    /// Forget a disconnected connection. A paired opponent is told it won,
    /// closed, and forgotten as well. Returns that opponent.
    pub async fn leave(&self, id: &ConnectionId) -> Option<ConnectionId> {
        let departed = self.state.write().await.leave(id);

        let Some((opponent, handle)) = departed else {
            debug!(connection = %id, "Connection left without a game");
            return None;
        };

        if let Some(handle) = handle {
            notify(
                Some(&handle),
                ServerMessage::GameOver {
                    winner: Winner::You,
                },
            );
            if let Err(e) = handle.close() {
                log_send_failure(&e);
            }
        }

        info!(connection = %id, opponent = %opponent, "Game ended by disconnect");
        Some(opponent)
    }

    /// Close and forget every connection that has waited at least `ttl`.
    pub async fn reap_waiting(&self, ttl: Duration) -> Vec<ConnectionId> {
        let expired = self.state.write().await.reap_waiting(ttl, Instant::now());

        expired
            .into_iter()
            .map(|(id, handle)| {
                info!(connection = %id, "Reaping connection that waited too long");
                if let Some(Err(e)) = handle.map(|h| h.close()) {
                    log_send_failure(&e);
                }
                id
            })
            .collect()
    }

    /// Periodically reap waiters older than `ttl`.
    pub fn spawn_reaper(&self, ttl: Duration, interval: Duration) -> JoinHandle<()> {
        let matchmaker = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let reaped = matchmaker.reap_waiting(ttl).await;
                let stats = matchmaker.stats().await;
                debug!(
                    reaped = reaped.len(),
                    connections = stats.connections,
                    waiting = stats.waiting,
                    games = stats.games,
                    "Reaper tick"
                );
            }
        })
    }

    pub async fn stats(&self) -> MatchStats {
        self.state.read().await.stats()
    }

    pub async fn snapshot(&self) -> MatchSnapshot {
        self.state.read().await.snapshot()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Best-effort send: failures are logged and otherwise ignored.
fn notify(handle: Option<&ConnectionHandle>, message: ServerMessage) -> bool {
    let Some(handle) = handle else {
        return false;
    };
    match handle.send(message) {
        Ok(()) => true,
        Err(e) => {
            log_send_failure(&e);
            false
        }
    }
}

fn log_send_failure(err: &RelayError) {
    match err {
        // The peer is already on its way out.
        RelayError::ConnectionClosed(_) => debug!(error = %err, "Send skipped"),
        _ => warn!(error = %err, "Send failed"),
    }
}
