//! Core protocol types for Typeduel's wire format.
//!
//! Every message exchanged between a player and the server is one
//! [`Message`]. The wire encoding is self-describing JSON: the `kind`
//! field carries the symbolic message name (never a numeric code, so
//! the protocol stays stable across client versions), and payload
//! fields are present only for the kinds that use them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A message sent between a player and the server.
///
/// `#[serde(tag = "kind")]` produces internally tagged JSON, so a
/// defense submission looks like:
///
/// ```json
/// { "kind": "defenseResponse", "elapsedSeconds": 7.25 }
/// ```
///
/// Optional fields carry `#[serde(default, skip_serializing_if = ...)]`
/// so that an absent field stays absent on the wire and decodes back to
/// `None` — never to zero or an empty string. Unknown kinds fail to
/// decode, which callers treat like a closed connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Message {
    // -- Liveness --
    /// Server → Player: "are you still there?" Sent while a room waits
    /// for an opponent.
    Ping,

    /// Player → Server: reply to [`Message::Ping`].
    Pong,

    // -- Lobby --
    /// Server → Player: the room was created; `room_id` is the key
    /// other players use to join.
    Created {
        room_id: String,
    },

    /// Server → Player: you joined the room with this key.
    Joined {
        room_id: String,
    },

    /// Server → Player: the room has a single resident and is waiting
    /// for a second player.
    WaitingForOpponent,

    // -- Match setup --
    /// Server → Player: a second player arrived; acknowledge with
    /// [`Message::ReadyUp`] to start the match.
    PromptReadyUp,

    /// Player → Server: ready-up acknowledgment.
    ReadyUp,

    /// Server → Player: both players acknowledged; the match begins.
    Start {
        room_id: String,
    },

    /// Server → Player: your opponent's connection was lost; sent at
    /// most once per match.
    OpponentDisconnected,

    // -- Turn loop --
    /// Server → Attacker: it is your turn to type an attack phrase.
    PromptAttack,

    /// Attacker → Server → Defender: a live preview of the phrase
    /// being typed, forwarded verbatim.
    PendingPhrase {
        phrase: String,
    },

    /// Attacker → Server: the finished phrase and how long it took.
    /// Both fields are optional on the wire; an absent phrase fails
    /// validation and forfeits the turn.
    AttackResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phrase: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elapsed_seconds: Option<f64>,
    },

    /// Server → Defender: type this phrase under time pressure.
    PromptDefense {
        phrase: String,
    },

    /// Defender → Server → Attacker: a live preview of the defense
    /// being typed, mirrored back to the attacker.
    PendingDefense {
        phrase: String,
    },

    /// Defender → Server: how long the defense took.
    DefenseResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elapsed_seconds: Option<f64>,
    },

    /// Server → Player: the turn outcome. `health` is the recipient's
    /// own health after damage was applied.
    #[serde(rename = "result")]
    TurnResult {
        health: i32,
        result_text: String,
    },

    /// Server → Player: the match is over; `result_text` says whether
    /// the recipient won or lost.
    GameEnded {
        result_text: String,
    },
}

impl Message {
    /// The symbolic kind name as it appears on the wire. Handy for
    /// logging a message without dumping its payload.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Created { .. } => "created",
            Self::Joined { .. } => "joined",
            Self::WaitingForOpponent => "waitingForOpponent",
            Self::PromptReadyUp => "promptReadyUp",
            Self::ReadyUp => "readyUp",
            Self::Start { .. } => "start",
            Self::OpponentDisconnected => "opponentDisconnected",
            Self::PromptAttack => "promptAttack",
            Self::PendingPhrase { .. } => "pendingPhrase",
            Self::AttackResponse { .. } => "attackResponse",
            Self::PromptDefense { .. } => "promptDefense",
            Self::PendingDefense { .. } => "pendingDefense",
            Self::DefenseResponse { .. } => "defenseResponse",
            Self::TurnResult { .. } => "result",
            Self::GameEnded { .. } => "gameEnded",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

// ---------------------------------------------------------------------------
// RoomSummary
// ---------------------------------------------------------------------------

/// A summary of a room returned by the lobby listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// The room's directory-unique key.
    pub key: String,
    /// Number of players currently in the room.
    pub player_count: usize,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire format is consumed by independently-shipped clients, so
    //! these tests pin the exact JSON shapes: kind names, field names,
    //! and the absent-stays-absent rule for optional fields.

    use super::*;

    // =====================================================================
    // Kind names — exchanged verbatim on the wire
    // =====================================================================

    #[test]
    fn test_kind_tags_match_wire_names() {
        let cases = [
            (Message::Ping, "ping"),
            (Message::Pong, "pong"),
            (Message::WaitingForOpponent, "waitingForOpponent"),
            (Message::PromptReadyUp, "promptReadyUp"),
            (Message::ReadyUp, "readyUp"),
            (Message::OpponentDisconnected, "opponentDisconnected"),
            (Message::PromptAttack, "promptAttack"),
        ];
        for (msg, expected) in cases {
            let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["kind"], expected);
            assert_eq!(msg.kind(), expected);
        }
    }

    #[test]
    fn test_result_kind_is_plain_result() {
        // The variant is named TurnResult in Rust (to stay clear of
        // std's Result) but the wire name is "result".
        let msg = Message::TurnResult {
            health: 85,
            result_text: "attack landed".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "result");
        assert_eq!(json["health"], 85);
        assert_eq!(json["resultText"], "attack landed");
    }

    #[test]
    fn test_payload_fields_are_camel_case() {
        let msg = Message::Created { room_id: "ab12".into() };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "created");
        assert_eq!(json["roomId"], "ab12");

        let msg = Message::AttackResponse {
            phrase: Some("the quick brown fox".into()),
            elapsed_seconds: Some(6.5),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["phrase"], "the quick brown fox");
        assert_eq!(json["elapsedSeconds"], 6.5);
    }

    // =====================================================================
    // Optional fields — absent stays absent
    // =====================================================================

    #[test]
    fn test_absent_optional_fields_are_omitted() {
        let msg = Message::AttackResponse {
            phrase: None,
            elapsed_seconds: None,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("phrase"));
        assert!(!obj.contains_key("elapsedSeconds"));
    }

    #[test]
    fn test_missing_optional_fields_decode_as_none() {
        // A bare submission must decode with the fields absent, not
        // coerced to zero or empty.
        let msg: Message =
            serde_json::from_str(r#"{"kind": "attackResponse"}"#).unwrap();
        assert_eq!(
            msg,
            Message::AttackResponse { phrase: None, elapsed_seconds: None }
        );

        let msg: Message =
            serde_json::from_str(r#"{"kind": "defenseResponse"}"#).unwrap();
        assert_eq!(msg, Message::DefenseResponse { elapsed_seconds: None });
    }

    #[test]
    fn test_round_trip_preserves_present_fields() {
        let original = Message::AttackResponse {
            phrase: Some("hello world".into()),
            elapsed_seconds: Some(3.75),
        };
        let bytes = serde_json::to_vec(&original).unwrap();
        let decoded: Message = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_round_trip_preserves_absent_fields() {
        let original = Message::DefenseResponse { elapsed_seconds: None };
        let bytes = serde_json::to_vec(&original).unwrap();
        let decoded: Message = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(original, decoded);
    }

    // =====================================================================
    // Malformed input
    // =====================================================================

    #[test]
    fn test_decode_garbage_returns_error() {
        let result: Result<Message, _> =
            serde_json::from_slice(b"not json at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_kind_returns_error() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"kind": "teleport", "x": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_kind_returns_error() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"phrase": "hello"}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // RoomSummary
    // =====================================================================

    #[test]
    fn test_room_summary_json_format() {
        let summary = RoomSummary { key: "ab12".into(), player_count: 1 };
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["key"], "ab12");
        assert_eq!(json["playerCount"], 1);
    }

    #[test]
    fn test_room_summary_round_trip() {
        let summary = RoomSummary { key: "duel-2".into(), player_count: 2 };
        let bytes = serde_json::to_vec(&summary).unwrap();
        let decoded: RoomSummary = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(summary, decoded);
    }
}
