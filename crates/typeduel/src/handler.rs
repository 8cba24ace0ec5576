//! Per-route handlers: the thin glue between HTTP/WebSocket upgrades
//! and the room layer.
//!
//! The flow for both persistent routes is the same: upgrade the
//! socket, wrap it in an endpoint, build a [`Player`], and hand it to
//! the directory. The directory delivers the `created`/`joined` notice
//! before the room task ever touches the endpoint, so those arrive
//! ahead of every other protocol message.

use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use typeduel_net::WsEndpoint;
use typeduel_protocol::RoomSummary;
use typeduel_room::{Player, RoomDirectory, ROOM_CAPACITY};

/// Shared server state handed to every route.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) directory: Arc<RoomDirectory<WsEndpoint>>,
}

/// Display name used when the connect request doesn't carry one.
const DEFAULT_PLAYER_NAME: &str = "guest";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateParams {
    /// Requested room key; deduplicated by the directory.
    room_name: Option<String>,
    player_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JoinParams {
    room_key: String,
    player_name: Option<String>,
}

/// `GET /createRoom` — upgrade, then create a room owned by the caller.
pub(crate) async fn create_room(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_create(socket, state, params))
}

async fn handle_create(socket: WebSocket, state: AppState, params: CreateParams) {
    let name = params.player_name.unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
    let player = Player::new(name, WsEndpoint::new(socket));

    match Arc::clone(&state.directory)
        .create(player, params.room_name.as_deref())
        .await
    {
        Ok(key) => debug!(room_key = %key, "creator connected"),
        Err(err) => warn!(%err, "room creation failed"),
    }
}

/// `GET /joinRoom?roomKey=...` — upgrade, then join the named room.
pub(crate) async fn join_room(
    State(state): State<AppState>,
    Query(params): Query<JoinParams>,
    ws: WebSocketUpgrade,
) -> Response {
    // Reject obviously bad joins before upgrading. The directory
    // re-checks under its lock once the socket is live, so a race
    // loser just sees the connection close.
    let listed = state.directory.list().await;
    match listed.iter().find(|room| room.key == params.room_key) {
        None => return (StatusCode::BAD_REQUEST, "room not found").into_response(),
        Some(room) if room.player_count >= ROOM_CAPACITY => {
            return (StatusCode::BAD_REQUEST, "room is full").into_response();
        }
        Some(_) => {}
    }

    ws.on_upgrade(move |socket| handle_join(socket, state, params))
}

async fn handle_join(socket: WebSocket, state: AppState, params: JoinParams) {
    let name = params.player_name.unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
    let player = Player::new(name, WsEndpoint::new(socket));

    if let Err(err) = state.directory.join(&params.room_key, player).await {
        // Dropping the player closes the socket.
        warn!(room_key = %params.room_key, %err, "join failed");
    }
}

/// `GET /getRooms` — the lobby snapshot as JSON.
pub(crate) async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(state.directory.list().await)
}
