//! Room session engine for Typeduel.
//!
//! A room pairs exactly two players and runs one or more typing-duel
//! matches between them. Each room is an isolated Tokio task that owns
//! both players' connection endpoints — no other task ever touches
//! them, so the session state machine needs no locks.
//!
//! # Key types
//!
//! - [`Room`] — the session state machine (waiting → ready-up → turn
//!   loop → finished)
//! - [`RoomDirectory`] — creates rooms, admits joiners, lists the lobby
//! - [`RoomHandle`] — the directory's view of a running room
//! - [`Player`] — name, health, and the owned endpoint
//! - [`combat`] — the pure damage rules

pub mod combat;
mod config;
mod directory;
mod error;
mod player;
mod room;

pub use config::{RematchPolicy, RoomConfig, RoomState};
pub use directory::RoomDirectory;
pub use error::RoomError;
pub use player::{Player, STARTING_HEALTH};
pub use room::{Room, RoomHandle, ROOM_CAPACITY};
