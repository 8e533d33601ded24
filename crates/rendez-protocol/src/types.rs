//! Core protocol types for the Rendez wire format.
//!
//! Every structure here is part of the contract with clients: inbound
//! events arrive as internally tagged JSON objects (`"event"` selects
//! the variant), and outbound events are produced the same way. Field
//! names on the wire are camelCase to match the client application.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier for a connected client.
///
/// Assigned by the transport when a connection is accepted; the
/// coordinator never interprets it, only uses it as a map key. On the
/// wire a `ClientId(42)` is the plain number `42`
/// (`#[serde(transparent)]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl ClientId {
    /// Creates a new `ClientId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role slots
// ---------------------------------------------------------------------------

/// One of the two fixed role positions a client may occupy in a room.
///
/// Serialized as `"p1"` / `"p2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    P1,
    P2,
}

impl Role {
    /// Resolves a raw role string from a join request.
    ///
    /// Only the exact string `"p2"` selects [`Role::P2`]; anything else,
    /// including an absent role, falls back to [`Role::P1`].
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            Some("p2") => Self::P2,
            _ => Self::P1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => write!(f, "p1"),
            Self::P2 => write!(f, "p2"),
        }
    }
}

/// The two role slots of a room, each holding a client or empty.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
pub struct PlayerSlots {
    /// Occupant of the `p1` slot.
    pub p1: Option<ClientId>,
    /// Occupant of the `p2` slot.
    pub p2: Option<ClientId>,
}

impl PlayerSlots {
    /// Returns the occupant of the given slot.
    pub fn get(&self, role: Role) -> Option<ClientId> {
        match role {
            Role::P1 => self.p1,
            Role::P2 => self.p2,
        }
    }

    /// Sets the occupant of the given slot.
    pub fn set(&mut self, role: Role, client: ClientId) {
        match role {
            Role::P1 => self.p1 = Some(client),
            Role::P2 => self.p2 = Some(client),
        }
    }

    /// Vacates every slot held by `client`.
    pub fn clear_of(&mut self, client: ClientId) {
        if self.p1 == Some(client) {
            self.p1 = None;
        }
        if self.p2 == Some(client) {
            self.p2 = None;
        }
    }

    /// Returns `true` if neither slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.p1.is_none() && self.p2.is_none()
    }

    /// Returns the occupants in slot order (`p1` before `p2`).
    pub fn occupants(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.p1.into_iter().chain(self.p2)
    }

    /// Returns the first occupied slot, preferring `p1`.
    ///
    /// This is the host-migration tie-break: deterministic even though
    /// both slots can never be vacated by a single departure.
    pub fn first_occupant(&self) -> Option<ClientId> {
        self.p1.or(self.p2)
    }
}

// ---------------------------------------------------------------------------
// Room snapshot
// ---------------------------------------------------------------------------

/// A full snapshot of a room's membership, broadcast to the whole room
/// whenever it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// The room's normalized code.
    pub room_code: String,
    /// The current host, if any slot holds one.
    pub host_id: Option<ClientId>,
    /// Slot occupancy.
    pub players: PlayerSlots,
    /// Display names keyed by client.
    pub names: HashMap<ClientId, String>,
}

// ---------------------------------------------------------------------------
// Inbound events (client → server)
// ---------------------------------------------------------------------------

/// An event sent by a client.
///
/// `#[serde(tag = "event")]` produces internally tagged JSON, e.g.
/// `{ "event": "createOrJoin", "roomCode": "ABCDE", "role": "p2" }`.
/// The `role` field of `createOrJoin` stays a raw string because any
/// value other than exactly `"p2"` must resolve to `p1` rather than be
/// rejected (see [`Role::resolve`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Rendezvous under a room code, creating the room if needed.
    CreateOrJoin {
        #[serde(default)]
        room_code: Option<String>,
        #[serde(default)]
        role: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },

    /// A host-authoritative command to relay to the room.
    Cmd {
        room_code: String,
        name: String,
        payload: serde_json::Value,
    },

    /// A peer-originated action to relay to the room.
    Action {
        room_code: String,
        game: String,
        payload: serde_json::Value,
    },

    /// Replace the sender's display name.
    UpdateName { room_code: String, name: String },
}

// ---------------------------------------------------------------------------
// Outbound events (server → client)
// ---------------------------------------------------------------------------

/// An event sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Join rejected; sent to the requester only.
    JoinError { message: String },

    /// Join succeeded; sent to the requester only.
    RoomJoined {
        room_code: String,
        role: Role,
        is_host: bool,
        seed: u32,
    },

    /// Current room membership; broadcast to the whole room.
    RoomState(RoomSnapshot),

    /// A relayed host command; broadcast to the whole room.
    Cmd {
        name: String,
        payload: serde_json::Value,
    },

    /// A relayed player action; broadcast to the whole room.
    Action {
        game: String,
        payload: serde_json::Value,
    },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The client application depends on exact JSON shapes — a renamed
    //! field or tag here silently breaks every client. These tests pin
    //! the wire format.

    use super::*;
    use serde_json::json;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_client_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&ClientId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_client_id_display() {
        assert_eq!(ClientId(7).to_string(), "c-7");
    }

    #[test]
    fn test_client_id_works_as_json_map_key() {
        // `names` maps are keyed by ClientId; serde_json must stringify
        // the numeric key rather than reject it.
        let mut names = HashMap::new();
        names.insert(ClientId(3), "Alice".to_string());
        let value = serde_json::to_value(&names).unwrap();
        assert_eq!(value, json!({ "3": "Alice" }));

        let back: HashMap<ClientId, String> =
            serde_json::from_value(value).unwrap();
        assert_eq!(back[&ClientId(3)], "Alice");
    }

    // =====================================================================
    // Role
    // =====================================================================

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::P1).unwrap(), "\"p1\"");
        assert_eq!(serde_json::to_string(&Role::P2).unwrap(), "\"p2\"");
    }

    #[test]
    fn test_role_resolve_exact_p2_only() {
        assert_eq!(Role::resolve(Some("p2")), Role::P2);
        assert_eq!(Role::resolve(Some("p1")), Role::P1);
        assert_eq!(Role::resolve(Some("P2")), Role::P1);
        assert_eq!(Role::resolve(Some("p3")), Role::P1);
        assert_eq!(Role::resolve(Some("")), Role::P1);
        assert_eq!(Role::resolve(None), Role::P1);
    }

    // =====================================================================
    // PlayerSlots
    // =====================================================================

    #[test]
    fn test_player_slots_set_get_clear() {
        let mut slots = PlayerSlots::default();
        assert!(slots.is_empty());

        slots.set(Role::P1, ClientId(1));
        slots.set(Role::P2, ClientId(2));
        assert_eq!(slots.get(Role::P1), Some(ClientId(1)));
        assert_eq!(slots.get(Role::P2), Some(ClientId(2)));

        slots.clear_of(ClientId(1));
        assert_eq!(slots.get(Role::P1), None);
        assert!(!slots.is_empty());
    }

    #[test]
    fn test_player_slots_first_occupant_prefers_p1() {
        let mut slots = PlayerSlots::default();
        slots.set(Role::P2, ClientId(2));
        assert_eq!(slots.first_occupant(), Some(ClientId(2)));

        slots.set(Role::P1, ClientId(1));
        assert_eq!(slots.first_occupant(), Some(ClientId(1)));
    }

    #[test]
    fn test_player_slots_occupants_in_slot_order() {
        let mut slots = PlayerSlots::default();
        slots.set(Role::P2, ClientId(9));
        slots.set(Role::P1, ClientId(4));
        let order: Vec<_> = slots.occupants().collect();
        assert_eq!(order, vec![ClientId(4), ClientId(9)]);
    }

    // =====================================================================
    // ClientEvent — one test per variant to verify JSON shape
    // =====================================================================

    #[test]
    fn test_create_or_join_full_json_format() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "createOrJoin",
            "roomCode": "abcde",
            "role": "p2",
            "name": "Bob"
        }))
        .unwrap();

        assert_eq!(
            event,
            ClientEvent::CreateOrJoin {
                room_code: Some("abcde".into()),
                role: Some("p2".into()),
                name: Some("Bob".into()),
            }
        );
    }

    #[test]
    fn test_create_or_join_all_fields_optional() {
        // A bare `{"event": "createOrJoin"}` is valid: empty code means
        // "generate one for me", absent role means p1.
        let event: ClientEvent =
            serde_json::from_value(json!({ "event": "createOrJoin" }))
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::CreateOrJoin {
                room_code: None,
                role: None,
                name: None,
            }
        );
    }

    #[test]
    fn test_cmd_json_format() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "cmd",
            "roomCode": "ABCDE",
            "name": "start",
            "payload": { "round": 1 }
        }))
        .unwrap();

        match event {
            ClientEvent::Cmd {
                room_code,
                name,
                payload,
            } => {
                assert_eq!(room_code, "ABCDE");
                assert_eq!(name, "start");
                assert_eq!(payload, json!({ "round": 1 }));
            }
            other => panic!("expected Cmd, got {other:?}"),
        }
    }

    #[test]
    fn test_action_round_trip() {
        let event = ClientEvent::Action {
            room_code: "ABCDE".into(),
            game: "pong".into(),
            payload: json!([1, 2, 3]),
        };
        let text = serde_json::to_string(&event).unwrap();
        let decoded: ClientEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_update_name_json_format() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "updateName",
            "roomCode": "ABCDE",
            "name": "  Alice  "
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::UpdateName {
                room_code: "ABCDE".into(),
                name: "  Alice  ".into(),
            }
        );
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_room_joined_json_format() {
        let event = ServerEvent::RoomJoined {
            room_code: "ABCDE".into(),
            role: Role::P2,
            is_host: false,
            seed: 12345,
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["event"], "roomJoined");
        assert_eq!(value["roomCode"], "ABCDE");
        assert_eq!(value["role"], "p2");
        assert_eq!(value["isHost"], false);
        assert_eq!(value["seed"], 12345);
    }

    #[test]
    fn test_room_state_flattens_snapshot() {
        let mut names = HashMap::new();
        names.insert(ClientId(1), "Alice".to_string());
        let event = ServerEvent::RoomState(RoomSnapshot {
            room_code: "ABCDE".into(),
            host_id: Some(ClientId(1)),
            players: PlayerSlots {
                p1: Some(ClientId(1)),
                p2: None,
            },
            names,
        });
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["event"], "roomState");
        assert_eq!(value["roomCode"], "ABCDE");
        assert_eq!(value["hostId"], 1);
        assert_eq!(value["players"]["p1"], 1);
        assert!(value["players"]["p2"].is_null());
        assert_eq!(value["names"]["1"], "Alice");
    }

    #[test]
    fn test_join_error_json_format() {
        let event = ServerEvent::JoinError {
            message: "Role already taken. Choose the other player.".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "joinError");
        assert_eq!(
            value["message"],
            "Role already taken. Choose the other player."
        );
    }

    #[test]
    fn test_relay_events_round_trip() {
        let cmd = ServerEvent::Cmd {
            name: "start".into(),
            payload: json!({}),
        };
        let action = ServerEvent::Action {
            game: "pong".into(),
            payload: json!({ "x": 0.5 }),
        };
        for event in [cmd, action] {
            let text = serde_json::to_string(&event).unwrap();
            let decoded: ServerEvent = serde_json::from_str(&text).unwrap();
            assert_eq!(event, decoded);
        }
    }

    // =====================================================================
    // Error cases — malformed input
    // =====================================================================

    #[test]
    fn test_decode_garbage_returns_error() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str("not json at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_event_returns_error() {
        let result: Result<ClientEvent, _> =
            serde_json::from_value(json!({ "event": "flyToMoon" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_required_field_returns_error() {
        // `cmd` without a roomCode is malformed, unlike createOrJoin
        // where everything is optional.
        let result: Result<ClientEvent, _> = serde_json::from_value(json!({
            "event": "cmd",
            "name": "start",
            "payload": {}
        }));
        assert!(result.is_err());
    }
}
