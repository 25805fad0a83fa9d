//! Matchmaking and move relay.
//!
//! Connections ask to be paired with `join`; the first connection to wait is
//! matched with the next one to join. Paired connections exchange moves via
//! `forward` until one of them disconnects, at which point `leave` tears the
//! game down on both sides.

mod manager;
mod types;


pub use manager::Matchmaker;
pub use types::{JoinOutcome, MatchSnapshot, MatchStats};
