//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a message).
    ///
    /// Common causes: malformed JSON, an unknown `kind`, or a
    /// truncated frame. The room treats this exactly like a closed
    /// connection for that read.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
