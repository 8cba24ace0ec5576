//! WebSocket endpoint over an axum socket.

use std::time::Duration;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use typeduel_protocol::{Codec, JsonCodec, Message};

use crate::{Endpoint, RecvError, SendError};

/// An [`Endpoint`] backed by a server-side WebSocket.
///
/// Messages travel as JSON frames. Transport-level ping/pong control
/// frames are skipped on receive — the protocol has its own `ping` and
/// `pong` kinds for liveness.
pub struct WsEndpoint {
    socket: WebSocket,
    codec: JsonCodec,
    open: bool,
}

impl WsEndpoint {
    /// Wraps a freshly upgraded socket.
    pub fn new(socket: WebSocket) -> Self {
        Self { socket, codec: JsonCodec, open: true }
    }

    async fn recv_inner(&mut self) -> Result<Message, RecvError> {
        loop {
            let frame = match self.socket.recv().await {
                Some(Ok(frame)) => frame,
                Some(Err(_)) | None => {
                    self.open = false;
                    return Err(RecvError::Closed);
                }
            };

            match frame {
                WsMessage::Text(text) => {
                    return self
                        .codec
                        .decode(text.as_bytes())
                        .map_err(RecvError::Malformed);
                }
                WsMessage::Binary(data) => {
                    return self.codec.decode(&data).map_err(RecvError::Malformed);
                }
                WsMessage::Close(_) => {
                    self.open = false;
                    return Err(RecvError::Closed);
                }
                // Control frames; the transport answers pings itself.
                WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            }
        }
    }
}

impl Endpoint for WsEndpoint {
    async fn send(&mut self, message: &Message) -> Result<(), SendError> {
        let bytes = self.codec.encode(message).map_err(SendError::Encode)?;
        match self.socket.send(WsMessage::Binary(bytes.into())).await {
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
