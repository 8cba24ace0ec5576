//! In-memory endpoint for tests.
//!
//! [`pair`] returns a connected ([`MemEndpoint`], [`MemPeer`]) pair.
//! The endpoint side is handed to a room (it implements [`Endpoint`]);
//! the peer side plays the remote player: it can send messages, inject
//! raw bytes that fail decoding, and hang up. Frames cross the channel
//! as encoded bytes, so every test exercises the real codec path.

use std::time::Duration;

use tokio::sync::mpsc;
use typeduel_protocol::{Codec, JsonCodec, Message};

use crate::{Endpoint, RecvError, SendError};

/// Creates a connected endpoint/peer pair.
pub fn pair() -> (MemEndpoint, MemPeer) {
    let (to_room, from_peer) = mpsc::unbounded_channel();
    let (to_peer, from_room) = mpsc::unbounded_channel();
    (
        MemEndpoint {
            tx: to_peer,
            rx: from_peer,
            codec: JsonCodec,
            open: true,
        },
        MemPeer { tx: to_room, rx: from_room, codec: JsonCodec },
    )
}

/// The room-facing half: an [`Endpoint`] over in-process channels.
pub struct MemEndpoint {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    codec: JsonCodec,
    open: bool,
}

impl MemEndpoint {
    async fn recv_inner(&mut self) -> Result<Message, RecvError> {
        match self.rx.recv().await {
            Some(bytes) => self.codec.decode(&bytes).map_err(RecvError::Malformed),
            None => {
                self.open = false;
                Err(RecvError::Closed)
            }
        }
    }
}

impl Endpoint for MemEndpoint {
    async fn send(&mut self, message: &Message) -> Result<(), SendError> {
        let bytes = self.codec.encode(message).map_err(SendError::Encode)?;
        match self.tx.send(bytes) {
            Ok(()) => Ok(()),
            Err(_) => {
                self.open = false;
                Err(SendError::Closed)
            }
        }
    }

    async fn recv(&mut self, timeout: Option<Duration>) -> Result<Message, RecvError> {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, self.recv_inner()).await {
                Ok(result) => result,
                Err(_) => Err(RecvError::Timeout),
            },
            None => self.recv_inner().await,
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// The test-facing half: drives the endpoint like a remote player.
pub struct MemPeer {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    codec: JsonCodec,
}

impl MemPeer {
    /// Sends a message to the endpoint. Returns `false` if the
    /// endpoint side is gone.
    pub fn send(&self, message: &Message) -> bool {
        match self.codec.encode(message) {
            Ok(bytes) => self.tx.send(bytes).is_ok(),
            Err(_) => false,
        }
    }

    /// Sends raw bytes as-is, for exercising the malformed-frame path.
    pub fn send_raw(&self, bytes: &[u8]) -> bool {
        self.tx.send(bytes.to_vec()).is_ok()
    }

    /// Receives the next message from the endpoint, or `None` once it
    /// is gone or emits something undecodable.
    pub async fn recv(&mut self) -> Option<Message> {
        let bytes = self.rx.recv().await?;
        self.codec.decode(&bytes).ok()
    }

    /// Hangs up: the endpoint observes a closed connection on its next
    /// send or receive.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pair_delivers_messages_both_ways() {
        let (mut endpoint, mut peer) = pair();

        assert!(peer.send(&Message::ReadyUp));
        let msg = endpoint.recv(None).await.unwrap();
        assert_eq!(msg, Message::ReadyUp);

        endpoint.send(&Message::PromptAttack).await.unwrap();
        assert_eq!(peer.recv().await, Some(Message::PromptAttack));
    }

    #[tokio::test]
    async fn test_closed_peer_yields_closed() {
        let (mut endpoint, peer) = pair();
        peer.close();

        assert!(matches!(endpoint.recv(None).await, Err(RecvError::Closed)));
        assert!(matches!(
            endpoint.send(&Message::Ping).await,
            Err(SendError::Closed)
        ));
        assert!(!endpoint.is_open());
    }

    #[tokio::test]
    async fn test_raw_garbage_yields_malformed() {
        let (mut endpoint, peer) = pair();
        peer.send_raw(b"definitely not json");

        assert!(matches!(
            endpoint.recv(None).await,
            Err(RecvError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_silent_peer_yields_timeout() {
        let (mut endpoint, _peer) = pair();

        let result = endpoint.recv(Some(Duration::from_millis(10))).await;
        assert!(matches!(result, Err(RecvError::Timeout)));
    }
}
