//! Unified error type for the Typeduel server.

use typeduel_net::{RecvError, SendError};
use typeduel_protocol::ProtocolError;
use typeduel_room::RoomError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` attributes let `?` convert lower-layer errors
/// automatically, so callers of the server crate deal with one type.
#[derive(Debug, thiserror::Error)]
pub enum TypeduelError {
    /// Binding the listener or serving connections failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, full, closed).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An endpoint-level send error.
    #[error(transparent)]
    Send(#[from] SendError),

    /// An endpoint-level receive error.
    #[error(transparent)]
    Recv(#[from] RecvError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken");
        let unified: TypeduelError = err.into();
        assert!(matches!(unified, TypeduelError::Io(_)));
        assert!(unified.to_string().contains("taken"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound("ab12".into());
        let unified: TypeduelError = err.into();
        assert!(matches!(unified, TypeduelError::Room(_)));
        assert!(unified.to_string().contains("ab12"));
    }

    #[test]
    fn test_from_protocol_error() {
        let bad = serde_json::from_slice::<typeduel_protocol::Message>(b"{").unwrap_err();
        let unified: TypeduelError = ProtocolError::Decode(bad).into();
        assert!(matches!(unified, TypeduelError::Protocol(_)));
    }

    #[test]
    fn test_from_recv_error() {
        let err = RecvError::Timeout;
        let unified: TypeduelError = err.into();
        assert!(matches!(unified, TypeduelError::Recv(_)));
    }

    #[test]
    fn test_from_send_error() {
        let err = SendError::Closed;
        let unified: TypeduelError = err.into();
        assert!(matches!(unified, TypeduelError::Send(_)));
    }
}
