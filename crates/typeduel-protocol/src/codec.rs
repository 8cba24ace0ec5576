//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust types and raw bytes. The rest of the
//! stack doesn't care how messages are serialized — it just needs
//! something that implements [`Codec`]. Typeduel ships [`JsonCodec`]
//! because the wire format is self-describing JSON; a binary codec
//! could be swapped in without touching any other layer.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec is held inside endpoints
/// that live in long-running Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected type. Callers treat this
    /// the same as a closed connection — it is never fatal.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON via `serde_json`.
///
/// ## Example
///
/// ```rust
/// use typeduel_protocol::{Codec, JsonCodec, Message};
///
/// let codec = JsonCodec;
/// let msg = Message::DefenseResponse { elapsed_seconds: Some(7.25) };
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: Message = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = JsonCodec;
        let msg = Message::PromptDefense { phrase: "type me".into() };

        let bytes = codec.encode(&msg).unwrap();
        let decoded: Message = codec.decode(&bytes).unwrap();

        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_invalid_bytes_is_decode_error() {
        let codec = JsonCodec;
        let result: Result<Message, _> = codec.decode(b"{\"kind\": ");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_message_is_decode_error() {
        let codec = JsonCodec;
        let bytes = codec
            .encode(&Message::Created { room_id: "ab12".into() })
            .unwrap();
        let result: Result<Message, _> = codec.decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
