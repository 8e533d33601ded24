//! The registry: creates, tracks, and tears down rooms, and relays
//! events to their members.
//!
//! # Concurrency note
//!
//! `Registry` is NOT thread-safe by itself — plain `HashMap`s, no
//! locks. This is intentional: it is owned by the server behind a
//! single mutex, and every inbound event mutates it to completion
//! before the next one is handled. Outbound events are pushed onto
//! unbounded per-client channels, so no operation ever blocks while
//! the registry is borrowed.

use std::collections::HashMap;

use rendez_protocol::{ClientId, Role, RoomSnapshot, ServerEvent};
use tokio::sync::mpsc;

use crate::room::Room;
use crate::{RegistryError, code};

/// Channel sender for delivering outbound events to one client.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// The fields of a `createOrJoin` request.
#[derive(Debug, Clone, Default)]
pub struct JoinRequest {
    /// Raw room code; empty or absent means "generate one".
    pub room_code: Option<String>,
    /// Raw role string; resolved via [`Role::resolve`].
    pub role: Option<String>,
    /// Raw display name; trimmed, defaulted when blank.
    pub name: Option<String>,
}

/// What a successful join resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The final (possibly generated) room code.
    pub code: String,
    /// The resolved role slot.
    pub role: Role,
    /// Whether the requester now holds host status.
    pub is_host: bool,
    /// The room's seed.
    pub seed: u32,
}

/// A client's current room/role association, tracked for disconnect
/// handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Normalized code of the room the client occupies.
    pub code: String,
    /// The slot the client holds there.
    pub role: Role,
}

/// Owns every room and routes events to room members.
///
/// This is the entry point for all coordinator operations; the
/// per-connection handler calls into it for each inbound event.
pub struct Registry {
    /// Active rooms, keyed by normalized room code.
    rooms: HashMap<String, Room>,

    /// Maps each client to the room and slot it currently occupies.
    /// A client is in at most ONE room at a time; joining another room
    /// overwrites the association.
    memberships: HashMap<ClientId, Membership>,

    /// Per-client outbound channels. Registered when the transport
    /// accepts a connection, dropped on disconnect. The set of outboxes
    /// belonging to a room's occupants is that room's broadcast group.
    outboxes: HashMap<ClientId, ClientSender>,
}

impl Registry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            outboxes: HashMap::new(),
        }
    }

    /// Registers a newly accepted client's outbound channel.
    pub fn register(&mut self, client: ClientId, sender: ClientSender) {
        self.outboxes.insert(client, sender);
        tracing::debug!(%client, "client registered");
    }

    /// Handles `createOrJoin`: resolves the code and role, lazily
    /// creates the room, claims the slot, elects the host, and emits
    /// `roomJoined` to the requester plus a `roomState` broadcast.
    ///
    /// # Errors
    /// Returns [`RegistryError::RoleTaken`] if the slot is held by a
    /// different client; no state changes and nothing is broadcast.
    pub fn join(
        &mut self,
        client: ClientId,
        req: JoinRequest,
    ) -> Result<JoinOutcome, RegistryError> {
        let code = req
            .room_code
            .as_deref()
            .map(code::normalize_code)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(code::generate_code);

        let room = self.rooms.entry(code.clone()).or_insert_with(|| {
            let seed = code::generate_seed();
            tracing::info!(code = %code, seed, "room created");
            Room::new(code.clone(), client, seed)
        });

        let role = Role::resolve(req.role.as_deref());
        room.claim(role, client)?;
        room.set_name(client, req.name.as_deref());
        room.elect_host(client);

        self.memberships.insert(
            client,
            Membership {
                code: code.clone(),
                role,
            },
        );

        let outcome = JoinOutcome {
            code: code.clone(),
            role,
            is_host: room.is_host(client),
            seed: room.seed(),
        };
        let snapshot = room.snapshot();

        tracing::info!(
            %client,
            code = %code,
            %role,
            is_host = outcome.is_host,
            "client joined room"
        );

        self.send_to(
            client,
            ServerEvent::RoomJoined {
                room_code: outcome.code.clone(),
                role: outcome.role,
                is_host: outcome.is_host,
                seed: outcome.seed,
            },
        );
        self.broadcast(&code, ServerEvent::RoomState(snapshot));

        Ok(outcome)
    }

    /// Relays a host command to the room group.
    ///
    /// Silently dropped when the room is unknown (stale message) or the
    /// sender is not the room's host.
    pub fn relay_cmd(
        &self,
        client: ClientId,
        room_code: &str,
        name: String,
        payload: serde_json::Value,
    ) {
        let Some(room) = self.rooms.get(room_code) else {
            return;
        };
        if !room.is_host(client) {
            tracing::debug!(
                %client,
                code = room_code,
                cmd = %name,
                "cmd from non-host, dropping"
            );
            return;
        }
        self.broadcast(room_code, ServerEvent::Cmd { name, payload });
    }

    /// Relays a player action to the room group.
    ///
    /// No sender check — actions are peer-originated by design, unlike
    /// host-authoritative commands. Unknown rooms are silently dropped.
    pub fn relay_action(
        &self,
        _client: ClientId,
        room_code: &str,
        game: String,
        payload: serde_json::Value,
    ) {
        if !self.rooms.contains_key(room_code) {
            return;
        }
        self.broadcast(room_code, ServerEvent::Action { game, payload });
    }

    /// Replaces a client's display name and broadcasts the updated
    /// room state. Unknown rooms are silently dropped.
    pub fn update_name(
        &mut self,
        client: ClientId,
        room_code: &str,
        name: &str,
    ) {
        let Some(room) = self.rooms.get_mut(room_code) else {
            return;
        };
        room.set_name(client, Some(name));
        let snapshot = room.snapshot();
        self.broadcast(room_code, ServerEvent::RoomState(snapshot));
    }

    /// Handles a client disconnect: drops its outbox, vacates its slot,
    /// migrates host status, and tears the room down if it emptied.
    ///
    /// A disconnect is terminal for the slot — there is no grace period
    /// or session resume. Clients with no room association are a no-op.
    pub fn disconnect(&mut self, client: ClientId) {
        self.outboxes.remove(&client);

        let Some(membership) = self.memberships.remove(&client) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&membership.code) else {
            return;
        };

        room.remove(client);
        tracing::info!(%client, code = %membership.code, "client left room");

        if room.is_empty() {
            self.rooms.remove(&membership.code);
            tracing::info!(code = %membership.code, "empty room removed");
            return;
        }

        let snapshot = room.snapshot();
        self.broadcast(
            &membership.code,
            ServerEvent::RoomState(snapshot),
        );
    }

    /// Sends a `joinError` to a single client. Used by the server to
    /// surface a join rejection to the requester alone.
    pub fn send_error(&self, client: ClientId, message: String) {
        self.send_to(client, ServerEvent::JoinError { message });
    }

    /// Returns the current snapshot of a room, if it exists.
    pub fn room_state(&self, room_code: &str) -> Option<RoomSnapshot> {
        self.rooms.get(room_code).map(Room::snapshot)
    }

    /// Returns the room/role association of a client, if any.
    pub fn membership(&self, client: ClientId) -> Option<&Membership> {
        self.memberships.get(&client)
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Sends an event to a single client. Silently drops if the client
    /// has no outbox or its receiver is gone (already disconnecting).
    fn send_to(&self, client: ClientId, event: ServerEvent) {
        if let Some(sender) = self.outboxes.get(&client) {
            let _ = sender.send(event);
        }
    }

    /// Sends an event to every occupant of a room.
    fn broadcast(&self, room_code: &str, event: ServerEvent) {
        let Some(room) = self.rooms.get(room_code) else {
            return;
        };
        for occupant in room.occupants() {
            self.send_to(occupant, event.clone());
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
