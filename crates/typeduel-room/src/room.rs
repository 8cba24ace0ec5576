//! The room session state machine.
//!
//! A room runs as an isolated Tokio task that owns both players'
//! endpoints outright. All connection-level failures — close, timeout,
//! malformed frame, unexpected kind — are handled the same way: the
//! offending player is removed and the session carries on with whoever
//! remains. Nothing a player does can take the process down.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use typeduel_net::{Endpoint, SendError};
use typeduel_protocol::Message;

use crate::combat::{self, TurnOutcome, Winner};
use crate::{Player, RematchPolicy, RoomConfig, RoomState, STARTING_HEALTH};

/// A room never holds more than two players; the directory enforces
/// this on admission and the join channel's capacity backs it up.
pub const ROOM_CAPACITY: usize = 2;

/// How a match came to an end.
enum MatchEnd {
    /// A player was reduced to zero or below; `winner` is a slot index.
    Completed { winner: usize },
    /// A player was removed mid-match (disconnect, timeout, malformed
    /// or unexpected message).
    Aborted,
}

// ---------------------------------------------------------------------------
// RoomHandle
// ---------------------------------------------------------------------------

/// The directory's view of a running room: a join channel, the live
/// player count, and the cooperative cancellation flag.
pub struct RoomHandle<E: Endpoint> {
    pub(crate) key: String,
    pub(crate) joins: mpsc::Sender<Player<E>>,
    pub(crate) player_count: Arc<AtomicUsize>,
    pub(crate) cancelled: Arc<AtomicBool>,
}

// Manual impl: `#[derive(Clone)]` would demand `E: Clone`, which
// endpoints don't implement.
impl<E: Endpoint> Clone for RoomHandle<E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            joins: self.joins.clone(),
            player_count: Arc::clone(&self.player_count),
            cancelled: Arc::clone(&self.cancelled),
        }
    }
}

impl<E: Endpoint> RoomHandle<E> {
    /// The room's directory key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of players currently seated in the room.
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    /// Raises the cancellation flag. The room task notices at its next
    /// loop boundary; in-flight reads are left to fail naturally.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A session pairing exactly two players for one or more matches.
pub struct Room<E: Endpoint> {
    key: String,
    config: RoomConfig,
    state: RoomState,
    /// At most two, ordered: slot 0 is the creator while waiting.
    players: Vec<Player<E>>,
    joins: mpsc::Receiver<Player<E>>,
    player_count: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl<E: Endpoint> Room<E> {
    /// Creates a room holding its creator, plus the handle the
    /// directory keeps.
    pub fn new(
        key: impl Into<String>,
        creator: Player<E>,
        config: RoomConfig,
    ) -> (Self, RoomHandle<E>) {
        let key = key.into();
        let (join_tx, join_rx) = mpsc::channel(1);
        let player_count = Arc::new(AtomicUsize::new(1));
        let cancelled = Arc::new(AtomicBool::new(false));

        let handle = RoomHandle {
            key: key.clone(),
            joins: join_tx,
            player_count: Arc::clone(&player_count),
            cancelled: Arc::clone(&cancelled),
        };
        let room = Self {
            key,
            config,
            state: RoomState::WaitingForPlayers,
            players: vec![creator],
            joins: join_rx,
            player_count,
            cancelled,
        };
        (room, handle)
    }

    /// Runs the session until no players remain, the room is cancelled,
    /// or (under [`RematchPolicy::SingleMatch`]) one match has run.
    pub async fn run(mut self) {
        info!(room_key = %self.key, "room opened");

        loop {
            if self.is_cancelled() {
                break;
            }
            if !self.wait_for_opponent().await {
                break;
            }
            if !self.ready_up().await {
                continue;
            }

            let end = self.play_match().await;
            self.finish_match(&end).await;

            if self.config.rematch == RematchPolicy::SingleMatch {
                break;
            }
        }

        self.state = RoomState::Finished;
        self.cancelled.store(true, Ordering::Relaxed);
        info!(room_key = %self.key, state = %self.state, "room closed");
    }

    // -----------------------------------------------------------------
    // WaitingForPlayers
    // -----------------------------------------------------------------

    /// Waits until the room holds two players, polling the resident's
    /// liveness every `poll_interval`. Returns `false` when the room
    /// should shut down (cancelled, or nobody left).
    async fn wait_for_opponent(&mut self) -> bool {
        if self.players.len() == ROOM_CAPACITY {
            return true;
        }

        self.state = RoomState::WaitingForPlayers;
        debug!(room_key = %self.key, state = %self.state, "waiting for an opponent");
        if !self.players.is_empty()
            && self.send_to(0, &Message::WaitingForOpponent).await.is_err()
        {
            self.drop_player(0, "send failed");
        }

        while self.players.len() < ROOM_CAPACITY {
            if self.is_cancelled() {
                return false;
            }
            if self.players.is_empty() {
                self.cancelled.store(true, Ordering::Relaxed);
                return false;
            }

            let joined =
                tokio::time::timeout(self.config.poll_interval, self.joins.recv()).await;
            match joined {
                Ok(Some(player)) => self.admit(player),
                // The directory dropped its handle; nobody can join.
                Ok(None) => {
                    self.cancelled.store(true, Ordering::Relaxed);
                    return false;
                }
                Err(_) => {
                    if !self.ping_resident().await {
                        self.drop_player(0, "unresponsive");
                    }
                }
            }
        }
        true
    }

    /// Pings the waiting resident and expects a `pong` within
    /// `ping_timeout`. Anything else counts as unresponsive.
    async fn ping_resident(&mut self) -> bool {
        let player = &mut self.players[0];
        if !player.endpoint.is_open() {
            return false;
        }
        if player.endpoint.send(&Message::Ping).await.is_err() {
            return false;
        }
        matches!(
            player.endpoint.recv(Some(self.config.ping_timeout)).await,
            Ok(Message::Pong)
        )
    }

    // -----------------------------------------------------------------
    // ReadyUp
    // -----------------------------------------------------------------

    /// Prompts both players and waits for both acknowledgments
    /// concurrently, failing fast as soon as either player drops.
    /// Returns `true` when the match can start; on failure the loser is
    /// removed, the survivor is notified, and the caller loops back to
    /// waiting.
    async fn ready_up(&mut self) -> bool {
        debug_assert_eq!(self.players.len(), ROOM_CAPACITY);
        self.state = RoomState::ReadyUp;
        debug!(room_key = %self.key, state = %self.state, "prompting ready-up");

        for idx in [0, 1] {
            if self.send_to(idx, &Message::PromptReadyUp).await.is_err() {
                self.drop_player(idx, "send failed");
                self.notify_opponent_left().await;
                return false;
            }
        }

        // The acknowledgment wait itself has no deadline; instead each
        // branch is cancelled the moment the other fails, so a lone
        // survivor is never left hanging.
        let (first, second) = self.players.split_at_mut(1);
        let acknowledged = futures_util::try_join!(
            await_ready(&mut first[0], 0),
            await_ready(&mut second[0], 1),
        );

        match acknowledged {
            Ok(_) => true,
            Err(loser) => {
                self.drop_player(loser, "no ready-up");
                self.notify_opponent_left().await;
                false
            }
        }
    }

    // -----------------------------------------------------------------
    // Active: the turn loop
    // -----------------------------------------------------------------

    /// Plays one match to completion. Any failed read or send removes
    /// that player and aborts the match.
    async fn play_match(&mut self) -> MatchEnd {
        self.state = RoomState::Active;
        let mut attacker = usize::from(
            self.config.randomize_first_attacker && rand::rng().random_bool(0.5),
        );
        info!(
            room_key = %self.key,
            attacker = %self.players[attacker].name,
            "match started"
        );

        for idx in [0, 1] {
            let start = Message::Start { room_id: self.key.clone() };
            if self.send_to(idx, &start).await.is_err() {
                return self.abort(idx);
            }
        }

        loop {
            let defender = 1 - attacker;

            if self.send_to(attacker, &Message::PromptAttack).await.is_err() {
                return self.abort(attacker);
            }

            // Attack phase: previews stream to the defender until the
            // final submission arrives.
            let (phrase, attack_time) = loop {
                let Some(msg) = self.recv_turn(attacker).await else {
                    return self.abort(attacker);
                };
                match msg {
                    Message::PendingPhrase { phrase } => {
                        let preview = Message::PendingPhrase { phrase };
                        if self.send_to(defender, &preview).await.is_err() {
                            return self.abort(defender);
                        }
                    }
                    Message::AttackResponse { phrase, elapsed_seconds } => {
                        break (phrase, elapsed_seconds);
                    }
                    other => {
                        warn!(
                            room_key = %self.key,
                            kind = %other,
                            "unexpected message during attack"
                        );
                        return self.abort(attacker);
                    }
                }
            };

            // An empty phrase forfeits the turn: no damage, roles swap.
            let phrase = match phrase {
                Some(p) if combat::phrase_is_valid(&p) => p,
                _ => {
                    debug!(
                        room_key = %self.key,
                        attacker = %self.players[attacker].name,
                        "invalid phrase, turn forfeited"
                    );
                    attacker = defender;
                    continue;
                }
            };

            let prompt = Message::PromptDefense { phrase };
            if self.send_to(defender, &prompt).await.is_err() {
                return self.abort(defender);
            }

            // Defense phase: previews mirror back to the attacker.
            let defense_time = loop {
                let Some(msg) = self.recv_turn(defender).await else {
                    return self.abort(defender);
                };
                match msg {
                    Message::PendingDefense { phrase } => {
                        let preview = Message::PendingDefense { phrase };
                        if self.send_to(attacker, &preview).await.is_err() {
                            return self.abort(attacker);
                        }
                    }
                    Message::DefenseResponse { elapsed_seconds } => break elapsed_seconds,
                    other => {
                        warn!(
                            room_key = %self.key,
                            kind = %other,
                            "unexpected message during defense"
                        );
                        return self.abort(defender);
                    }
                }
            };

            // Absent times count as zero; combat::resolve turns a
            // zeroed attacker time into a dodge rather than dividing.
            let attack_time = attack_time.unwrap_or(0.0);
            let defense_time = defense_time.unwrap_or(0.0);
            let outcome = combat::resolve(attack_time, defense_time);
            match outcome {
                TurnOutcome::Landed { damage } => self.players[defender].health -= damage,
                TurnOutcome::Countered { recoil } => self.players[attacker].health += recoil,
                TurnOutcome::Dodged => {}
            }
            debug!(room_key = %self.key, outcome = outcome.label(), "turn resolved");

            let summary = combat::summary(attack_time, defense_time, &outcome);
            for idx in [attacker, defender] {
                let result = Message::TurnResult {
                    health: self.players[idx].health,
                    result_text: summary.clone(),
                };
                if self.send_to(idx, &result).await.is_err() {
                    return self.abort(idx);
                }
            }

            if self.players[attacker].is_defeated() || self.players[defender].is_defeated() {
                let winner = match combat::winner(
                    self.players[attacker].health,
                    self.players[defender].health,
                ) {
                    Winner::Attacker => attacker,
                    Winner::Defender => defender,
                };
                info!(
                    room_key = %self.key,
                    winner = %self.players[winner].name,
                    "match finished"
                );
                for idx in [0, 1] {
                    let text = if idx == winner { "You win!" } else { "You lose!" };
                    let ended = Message::GameEnded { result_text: text.into() };
                    // The match is already decided; a failed delivery
                    // here surfaces on the next ready-up instead.
                    let _ = self.send_to(idx, &ended).await;
                }
                return MatchEnd::Completed { winner };
            }

            attacker = defender;
        }
    }

    /// End-of-match bookkeeping: tell a lone survivor their opponent
    /// left, then reset everyone to starting health.
    async fn finish_match(&mut self, end: &MatchEnd) {
        match end {
            MatchEnd::Completed { winner } => {
                debug!(
                    room_key = %self.key,
                    winner = %self.players[*winner].name,
                    "match complete, resetting health"
                );
            }
            MatchEnd::Aborted => self.notify_opponent_left().await,
        }
        for player in &mut self.players {
            player.health = STARTING_HEALTH;
        }
    }

    // -----------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------

    /// Tells a lone remaining player that their opponent disconnected.
    /// Sent at most once per match, and never followed by further match
    /// messages.
    async fn notify_opponent_left(&mut self) {
        if self.players.len() == 1
            && self.send_to(0, &Message::OpponentDisconnected).await.is_err()
        {
            self.drop_player(0, "send failed");
        }
    }

    /// Receives the next message from the player in `idx` under the
    /// turn deadline. `None` means the player must be removed.
    async fn recv_turn(&mut self, idx: usize) -> Option<Message> {
        let player = &mut self.players[idx];
        match player.endpoint.recv(Some(self.config.turn_timeout)).await {
            Ok(msg) => Some(msg),
            Err(err) => {
                warn!(
                    room_key = %self.key,
                    player = %player.name,
                    %err,
                    "turn read failed"
                );
                None
            }
        }
    }

    async fn send_to(&mut self, idx: usize, message: &Message) -> Result<(), SendError> {
        let player = &mut self.players[idx];
        let result = player.endpoint.send(message).await;
        if let Err(err) = &result {
            warn!(room_key = %self.key, player = %player.name, %err, "send failed");
        }
        result
    }

    /// Removes the player in `idx` and ends the current match.
    fn abort(&mut self, idx: usize) -> MatchEnd {
        self.drop_player(idx, "left mid-match");
        MatchEnd::Aborted
    }

    fn admit(&mut self, player: Player<E>) {
        info!(room_key = %self.key, player = %player.name, "player joined");
        self.players.push(player);
        self.sync_count();
    }

    fn drop_player(&mut self, idx: usize, reason: &str) {
        let player = self.players.remove(idx);
        self.sync_count();
        info!(room_key = %self.key, player = %player.name, reason, "player removed");
    }

    fn sync_count(&self) {
        self.player_count.store(self.players.len(), Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One side of the ready-up fan-in. A stray `pong` left over from the
/// waiting poll is skipped; anything else that isn't a `readyUp`
/// forfeits the player's seat.
async fn await_ready<E: Endpoint>(player: &mut Player<E>, idx: usize) -> Result<(), usize> {
    loop {
        match player.endpoint.recv(None).await {
            Ok(Message::ReadyUp) => return Ok(()),
            Ok(Message::Pong) => continue,
            Ok(other) => {
                warn!(
                    player = %player.name,
                    kind = %other,
                    "unexpected message during ready-up"
                );
                return Err(idx);
            }
            Err(err) => {
                warn!(player = %player.name, %err, "ready-up read failed");
                return Err(idx);
            }
        }
    }
}
