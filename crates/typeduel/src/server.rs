//! `TypeduelServer` builder and serve loop.
//!
//! Ties the layers together: axum routes accept connections, the
//! handlers wrap sockets into endpoints, and the room directory owns
//! every active session.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use typeduel_net::WsEndpoint;
use typeduel_room::{RoomConfig, RoomDirectory};

use crate::handler::{self, AppState};
use crate::TypeduelError;

/// Builder for configuring and starting a Typeduel server.
///
/// # Example
///
/// ```rust,no_run
/// use typeduel::TypeduelServer;
///
/// # async fn run() -> Result<(), typeduel::TypeduelError> {
/// let server = TypeduelServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct TypeduelServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl TypeduelServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the listener to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every spawned room uses.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<TypeduelServer, TypeduelError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        info!(addr = %self.bind_addr, "Typeduel server listening");
        Ok(TypeduelServer {
            listener,
            directory: Arc::new(RoomDirectory::new(self.room_config)),
        })
    }
}

impl Default for TypeduelServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Typeduel server. Call [`run()`](Self::run) to start serving.
pub struct TypeduelServer {
    listener: TcpListener,
    directory: Arc<RoomDirectory<WsEndpoint>>,
}

impl TypeduelServer {
    /// Creates a new builder.
    pub fn builder() -> TypeduelServerBuilder {
        TypeduelServerBuilder::new()
    }

    /// Returns the local address the listener is bound to. Useful with
    /// `bind("127.0.0.1:0")` in tests.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until the process is terminated.
    pub async fn run(self) -> Result<(), TypeduelError> {
        let app = router(AppState { directory: self.directory });
        info!("Typeduel server running");
        axum::serve(self.listener, app).await?;
        Ok(())
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/createRoom", get(handler::create_room))
        .route("/joinRoom", get(handler::join_room))
        .route("/getRooms", get(handler::list_rooms))
        .with_state(state)
}
