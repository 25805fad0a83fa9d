//! chessmate-relay: WebSocket matchmaking relay for two-player games.
//!
//! Clients connect, send `{"type":"join"}`, and are paired first-come
//! first-served. Paired clients exchange `move` payloads, which the relay
//! passes through as `opponentMove` without inspecting them. When either
//! player disconnects the other is told it won and is disconnected too.
//!
//! - `protocol`: client/server message types, decoded once at the socket.
//! - `handle`: per-connection outbound queue the matchmaker sends through.
//! - `matchmaker`: waiting queue, pairings, and connection registry.
//! - `connection` / `server`: the tokio-tungstenite transport.

pub mod connection;
pub mod handle;
pub mod matchmaker;
pub mod protocol;
pub mod server;

pub use handle::{ConnectionHandle, Outbound};
pub use matchmaker::{JoinOutcome, MatchSnapshot, MatchStats, Matchmaker};
pub use protocol::{ClientMessage, Color, MoveFields, ServerMessage, Winner};
