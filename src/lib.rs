//! Rules engine for a network-building rail game on the Swiss map.
//!
//! The engine is the authoritative state holder of a 2–3 player game: it
//! validates every action, advances turns, keeps each player's hidden
//! information hidden, and computes the final scores. Rendering, transport
//! and player drivers live outside this crate and talk to it through
//! [`state::GameState`] and its projections.

pub mod card;
pub mod deck;
pub mod error;
pub mod map;
pub mod player;
pub mod score;
pub mod state;
pub mod station;
pub mod ticket;
pub mod turn;

#[macro_use]
extern crate smallvec;
