//! Room directory: creates, tracks, and admits players to rooms.
//!
//! The directory is the only shared structure in the system. The
//! key→handle map lives behind a single mutex, and every admission
//! happens under it, so a room can never be handed more than two
//! players no matter how many connection handlers race.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex;
use tracing::{debug, info};
use typeduel_net::Endpoint;
use typeduel_protocol::{Message, RoomSummary};

use crate::room::ROOM_CAPACITY;
use crate::{Player, Room, RoomConfig, RoomError, RoomHandle};

/// Maps room keys to running rooms.
pub struct RoomDirectory<E: Endpoint> {
    rooms: Mutex<HashMap<String, RoomHandle<E>>>,
    config: RoomConfig,
}

impl<E: Endpoint> RoomDirectory<E> {
    /// Creates an empty directory; every room it spawns uses `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self { rooms: Mutex::new(HashMap::new()), config }
    }

    /// Creates a room owned by `player` and returns its key. A
    /// requested key is deduplicated with a counter suffix; without
    /// one a random key is generated.
    ///
    /// The `created` notice is delivered before the room task starts,
    /// so it is ordered ahead of every other message the player will
    /// see. The room task removes its own directory entry when it
    /// exits.
    ///
    /// # Errors
    /// Returns [`RoomError::Closed`] if the player's connection is
    /// already dead; no room is created.
    pub async fn create(
        self: Arc<Self>,
        mut player: Player<E>,
        requested_key: Option<&str>,
    ) -> Result<String, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let key = unique_key(&rooms, requested_key);

        player
            .endpoint
            .send(&Message::Created { room_id: key.clone() })
            .await
            .map_err(|_| RoomError::Closed)?;

        let (room, handle) = Room::new(key.clone(), player, self.config.clone());
        rooms.insert(key.clone(), handle);
        drop(rooms);
        info!(room_key = %key, "room created");

        let directory = Arc::clone(&self);
        let room_key = key.clone();
        tokio::spawn(async move {
            room.run().await;
            directory.remove(&room_key).await;
        });

        Ok(key)
    }

    /// Admits `player` into the room under `key`.
    ///
    /// The seat is reserved before the `joined` notice goes out, so the
    /// notice is ordered ahead of every room message and a full room is
    /// never over-admitted.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no such key, or the room is gone
    /// - [`RoomError::Full`] — two players already seated
    /// - [`RoomError::Closed`] — the joiner's own connection died
    pub async fn join(&self, key: &str, mut player: Player<E>) -> Result<(), RoomError> {
        let rooms = self.rooms.lock().await;
        let handle = rooms
            .get(key)
            .ok_or_else(|| RoomError::NotFound(key.to_string()))?;

        if handle.player_count() >= ROOM_CAPACITY {
            return Err(RoomError::Full(key.to_string()));
        }
        let seat = match handle.joins.try_reserve() {
            Ok(seat) => seat,
            Err(TrySendError::Full(())) => return Err(RoomError::Full(key.to_string())),
            Err(TrySendError::Closed(())) => {
                return Err(RoomError::NotFound(key.to_string()));
            }
        };

        player
            .endpoint
            .send(&Message::Joined { room_id: key.to_string() })
            .await
            .map_err(|_| RoomError::Closed)?;

        info!(room_key = %key, player = %player.name, "player admitted");
        seat.send(player);
        Ok(())
    }

    /// Removes the room under `key`, raising its cancellation flag.
    /// Returns `false` if no such room existed.
    pub async fn remove(&self, key: &str) -> bool {
        match self.rooms.lock().await.remove(key) {
            Some(handle) => {
                handle.cancel();
                debug!(room_key = %key, "room removed");
                true
            }
            None => false,
        }
    }

    /// A lobby snapshot of every room, sorted by key.
    pub async fn list(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        let mut summaries: Vec<RoomSummary> = rooms
            .iter()
            .map(|(key, handle)| RoomSummary {
                key: key.clone(),
                player_count: handle.player_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.key.cmp(&b.key));
        summaries
    }
}

/// Picks a key not present in `rooms`: the requested key (random when
/// none was asked for), suffixed with a counter on collision.
fn unique_key(rooms: &HashMap<String, RoomHandle<impl Endpoint>>, requested: Option<&str>) -> String {
    let base = match requested.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => random_key(),
    };
    if !rooms.contains_key(&base) {
        return base;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}-{counter}");
        if !rooms.contains_key(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Four hex characters: short enough to read out to a friend, unique
/// enough for one lobby.
fn random_key() -> String {
    let bytes: [u8; 2] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
