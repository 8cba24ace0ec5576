//! The player record: a display name, a health pool, and the owned
//! connection endpoint.

use typeduel_net::Endpoint;

/// Health every player starts a match with. There is no upper clamp —
/// a successful counter can push the attacker's health above this.
pub const STARTING_HEALTH: i32 = 100;

/// A player in a room.
///
/// A player belongs to exactly one room for its lifetime and owns its
/// endpoint exclusively. Once removed from a room (disconnect, timeout,
/// or an invalid message) the player is dropped, which closes the
/// connection.
pub struct Player<E: Endpoint> {
    /// Display name, taken from the connect request.
    pub name: String,
    /// Current health. May go negative (defeat) or above 100 (counter).
    pub health: i32,
    /// The player's connection, driven only by the owning room's task.
    pub endpoint: E,
}

impl<E: Endpoint> Player<E> {
    /// Creates a player with full starting health.
    pub fn new(name: impl Into<String>, endpoint: E) -> Self {
        Self { name: name.into(), health: STARTING_HEALTH, endpoint }
    }

    /// A player at or below zero health has lost the match.
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}
