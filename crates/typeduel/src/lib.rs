//! # Typeduel
//!
//! A two-player real-time typing duel. Players connect over WebSockets,
//! pair up in a room, and take turns typing phrases under time
//! pressure; typing-speed differentials convert into damage until one
//! player's health reaches zero.
//!
//! This crate is the service surface: it binds a listener, routes the
//! three endpoints (`/createRoom`, `/joinRoom`, `/getRooms`), and hands
//! freshly upgraded sockets to the room layer, which runs the actual
//! session state machine.
//!
//! ```rust,no_run
//! use typeduel::TypeduelServer;
//!
//! # async fn run() -> Result<(), typeduel::TypeduelError> {
//! let server = TypeduelServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::TypeduelError;
pub use server::{TypeduelServer, TypeduelServerBuilder};
