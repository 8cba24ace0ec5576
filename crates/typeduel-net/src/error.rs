//! Error types for the endpoint layer.

use typeduel_protocol::ProtocolError;

/// Errors that can occur while sending to a player.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The connection was closed by the peer or the transport.
    #[error("connection closed")]
    Closed,

    /// The outgoing message could not be serialized.
    #[error(transparent)]
    Encode(ProtocolError),
}

/// Errors that can occur while receiving from a player.
///
/// The room treats all three identically — the player is removed —
/// but keeping them distinct makes logs and tests precise.
#[derive(Debug, thiserror::Error)]
pub enum RecvError {
    /// The connection was closed by the peer or the transport.
    #[error("connection closed")]
    Closed,

    /// No message arrived within the allowed time.
    #[error("receive timed out")]
    Timeout,

    /// A frame arrived but could not be decoded into a message.
    #[error("malformed message: {0}")]
    Malformed(ProtocolError),
}
