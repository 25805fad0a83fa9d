//! Matchmaking state and the transitions applied to it under the lock.
//!
//! Nothing in here sends: each transition returns the handles the caller
//! must notify once the lock has been released.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

use chessmate_common::ConnectionId;

use crate::handle::ConnectionHandle;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a `join` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Nobody was waiting; the connection is now at the back of the queue.
    Queued,
    /// Paired with the connection that had been waiting longest.
    Paired { opponent: ConnectionId },
    AlreadyWaiting,
    AlreadyPaired,
    /// The connection is not (or no longer) registered.
    Unregistered,
}

/// Counts for periodic logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub connections: usize,
    pub waiting: usize,
    pub games: usize,
}

/// Point-in-time copy of the matchmaking state.
#[derive(Debug, Clone, Default)]
pub struct MatchSnapshot {
    /// Waiting connections, longest-waiting first.
    pub waiting: Vec<ConnectionId>,
    pub peers: HashMap<ConnectionId, ConnectionId>,
    pub registered: HashSet<ConnectionId>,
}

impl MatchSnapshot {
    pub fn peer_of(&self, id: &ConnectionId) -> Option<&ConnectionId> {
        self.peers.get(id)
    }

    pub fn is_waiting(&self, id: &ConnectionId) -> bool {
        self.waiting.contains(id)
    }

    /// Check the structural invariants: the peer map is symmetric, no
    /// connection is both waiting and paired or waits twice, and every
    /// tracked connection is registered.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (a, b) in &self.peers {
            if a == b {
                return Err(format!("{a} is paired with itself"));
            }
            if self.peers.get(b) != Some(a) {
                return Err(format!("peer[{a}] = {b} but peer[{b}] = {:?}", self.peers.get(b)));
            }
        }

        let mut seen = HashSet::new();
        for id in &self.waiting {
            if !seen.insert(id) {
                return Err(format!("{id} is queued more than once"));
            }
            if self.peers.contains_key(id) {
                return Err(format!("{id} is both waiting and paired"));
            }
        }

        for id in self.waiting.iter().chain(self.peers.keys()) {
            if !self.registered.contains(id) {
                return Err(format!("{id} is tracked but not registered"));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Waiter {
    id: ConnectionId,
    since: Instant,
}

/// Waiting queue, peer map, and connection registry, always mutated together.
#[derive(Debug, Default)]
pub(crate) struct MatchState {
    waiting: VecDeque<Waiter>,
    peers: HashMap<ConnectionId, ConnectionId>,
    registry: HashMap<ConnectionId, ConnectionHandle>,
}

impl MatchState {
    /// Store a connection's handle, returning the one it replaced.
    pub(crate) fn register(&mut self, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        self.registry.insert(handle.id().clone(), handle)
    }

    pub(crate) fn handle(&self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.registry.get(id).cloned()
    }

    /// Dequeue-or-enqueue. On `Paired` the symmetric peer entries exist
    /// before this returns.
    pub(crate) fn join(&mut self, id: &ConnectionId, now: Instant) -> JoinOutcome {
        if !self.registry.contains_key(id) {
            return JoinOutcome::Unregistered;
        }
        if self.peers.contains_key(id) {
            return JoinOutcome::AlreadyPaired;
        }
        if self.waiting.iter().any(|w| &w.id == id) {
            return JoinOutcome::AlreadyWaiting;
        }

        while let Some(waiter) = self.waiting.pop_front() {
            if !self.registry.contains_key(&waiter.id) {
                // Stale entry; leave() normally removes these.
                continue;
            }
            self.peers.insert(id.clone(), waiter.id.clone());
            self.peers.insert(waiter.id.clone(), id.clone());
            return JoinOutcome::Paired { opponent: waiter.id };
        }

        self.waiting.push_back(Waiter {
            id: id.clone(),
            since: now,
        });
        JoinOutcome::Queued
    }

    /// The peer of `id` and its handle, if both exist.
    pub(crate) fn peer_handle(&self, id: &ConnectionId) -> Option<(ConnectionId, ConnectionHandle)> {
        let peer = self.peers.get(id)?;
        let handle = self.registry.get(peer)?;
        Some((peer.clone(), handle.clone()))
    }

    /// Remove `id` from every structure. If it was paired, the opponent is
    /// removed too and returned along with its handle (if still registered).
    pub(crate) fn leave(
        &mut self,
        id: &ConnectionId,
    ) -> Option<(ConnectionId, Option<ConnectionHandle>)> {
        self.waiting.retain(|w| &w.id != id);

        let departed = self.peers.remove(id).map(|opponent| {
            self.peers.remove(&opponent);
            self.waiting.retain(|w| w.id != opponent);
            let handle = self.registry.remove(&opponent);
            (opponent, handle)
        });

        self.registry.remove(id);
        departed
    }

    /// Drop every waiter that has waited at least `ttl`, returning their
    /// ids and handles.
    pub(crate) fn reap_waiting(
        &mut self,
        ttl: Duration,
        now: Instant,
    ) -> Vec<(ConnectionId, Option<ConnectionHandle>)> {
        let (expired, kept): (VecDeque<Waiter>, VecDeque<Waiter>) = std::mem::take(&mut self.waiting)
            .into_iter()
            .partition(|w| now.saturating_duration_since(w.since) >= ttl);
        self.waiting = kept;

        expired
            .into_iter()
            .map(|w| {
                let handle = self.registry.remove(&w.id);
                (w.id, handle)
            })
            .collect()
    }

    pub(crate) fn stats(&self) -> MatchStats {
        MatchStats {
            connections: self.registry.len(),
            waiting: self.waiting.len(),
            games: self.peers.len() / 2,
        }
    }

    pub(crate) fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            waiting: self.waiting.iter().map(|w| w.id.clone()).collect(),
            peers: self.peers.clone(),
            registered: self.registry.keys().cloned().collect(),
        }
    }
}
