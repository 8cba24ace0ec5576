//! Room configuration and the session state machine.

use std::time::Duration;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// What a room does after a match ends.
///
/// The two policies are never mixed: a room either keeps looping for
/// rematches or tears down after its first match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RematchPolicy {
    /// Reset health and return to waiting/ready-up for another match.
    #[default]
    Rematch,
    /// Tear the room down after one match.
    SingleMatch,
}

/// Configuration for a room instance.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// How often the waiting room checks its resident's liveness.
    pub poll_interval: Duration,

    /// How long a pinged resident has to answer with `pong`.
    pub ping_timeout: Duration,

    /// Deadline for every turn-critical read in the match loop.
    pub turn_timeout: Duration,

    /// Whether the room outlives its first match.
    pub rematch: RematchPolicy,

    /// Fair-coin assignment of the first attacker. Turned off in tests
    /// so the creator always attacks first.
    pub randomize_first_attacker: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            ping_timeout: Duration::from_secs(5),
            turn_timeout: Duration::from_secs(20),
            rematch: RematchPolicy::Rematch,
            randomize_first_attacker: true,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room session.
///
/// ```text
/// WaitingForPlayers → ReadyUp → Active → Finished
///         ↑              │         │
///         └──────────────┴─────────┘  (player lost, or rematch)
/// ```
///
/// - **WaitingForPlayers**: one resident, polled for liveness.
/// - **ReadyUp**: both players must acknowledge before a match starts.
/// - **Active**: the turn loop is running.
/// - **Finished**: the run loop has exited; the room is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    WaitingForPlayers,
    ReadyUp,
    Active,
    Finished,
}

impl RoomState {
    /// Returns `true` while a match is being played.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` once the room has shut down for good.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::ReadyUp => write!(f, "ReadyUp"),
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
