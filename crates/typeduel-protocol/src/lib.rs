//! Wire protocol for Typeduel.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Message`], [`RoomSummary`]) — the message structures
//!   that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the endpoint (raw frames) and the
//! room (game rules). It doesn't know about connections or rooms —
//! it only knows how to serialize and deserialize messages.
//!
//! ```text
//! Endpoint (frames) → Protocol (Message) → Room (session state machine)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{Message, RoomSummary};
