//! Connection endpoint abstraction for Typeduel.
//!
//! An [`Endpoint`] is one player's bidirectional message stream. The
//! room drives it directly — it is the only task that ever touches a
//! player's endpoint, so the implementations here need no internal
//! locking.
//!
//! Two implementations are provided:
//!
//! - [`WsEndpoint`] — a real WebSocket, decoded with the protocol's
//!   JSON codec.
//! - [`mem::pair`] — an in-memory endpoint for driving rooms in tests
//!   without a network.

mod error;
pub mod mem;
mod ws;

pub use error::{RecvError, SendError};
pub use ws::WsEndpoint;

use std::future::Future;
use std::time::Duration;

use typeduel_protocol::Message;

/// A single player's bidirectional message stream.
///
/// Send and receive operate on decoded [`Message`] values; framing and
/// codec details stay inside the implementation. Receive failures are
/// split three ways ([`RecvError`]) so callers can log the cause, but
/// the room handles all of them identically: the player is removed.
///
/// The methods return explicitly `Send` futures (implementations just
/// write `async fn`) so that rooms generic over their endpoint type can
/// run inside `tokio::spawn`.
pub trait Endpoint: Send + 'static {
    /// Sends a message to the remote peer.
    fn send(
        &mut self,
        message: &Message,
    ) -> impl Future<Output = Result<(), SendError>> + Send;

    /// Receives the next message, waiting at most `timeout` when one
    /// is given.
    fn recv(
        &mut self,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<Message, RecvError>> + Send;

    /// Returns `false` once the connection is known to be dead.
    fn is_open(&self) -> bool;
}
