//! Error types for the room layer.

/// Errors that can occur during directory operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists under this key.
    #[error("room {0} not found")]
    NotFound(String),

    /// The room already has two players.
    #[error("room {0} is full")]
    Full(String),

    /// The player's own connection failed before they could be placed
    /// in a room.
    #[error("player connection closed")]
    Closed,
}
