//! A single room: two role slots, a host, a seed, and display names.
//!
//! `Room` holds no networking state — it is pure data plus the slot,
//! host-election, and host-migration rules. The [`Registry`] owns every
//! instance and drives the mutations.
//!
//! [`Registry`]: crate::Registry

use std::collections::HashMap;

use rendez_protocol::{ClientId, PlayerSlots, Role, RoomSnapshot};

use crate::RegistryError;

/// Placeholder display name for clients that never supplied one.
pub const DEFAULT_NAME: &str = "Player";

/// One rendezvous session identified by a short code.
#[derive(Debug, Clone)]
pub struct Room {
    code: String,
    host: Option<ClientId>,
    seed: u32,
    slots: PlayerSlots,
    names: HashMap<ClientId, String>,
}

impl Room {
    /// Creates a room with empty slots and the creator as tentative host.
    ///
    /// The seed is chosen here, once, and never changes for the room's
    /// lifetime.
    pub(crate) fn new(code: String, creator: ClientId, seed: u32) -> Self {
        Self {
            code,
            host: Some(creator),
            seed,
            slots: PlayerSlots::default(),
            names: HashMap::new(),
        }
    }

    /// The room's normalized code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The room's immutable seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The current host, if any.
    pub fn host(&self) -> Option<ClientId> {
        self.host
    }

    /// Returns `true` if `client` is the current host.
    pub fn is_host(&self, client: ClientId) -> bool {
        self.host == Some(client)
    }

    /// Returns `true` if neither slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The occupants in slot order (`p1` before `p2`).
    pub fn occupants(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.slots.occupants()
    }

    /// Assigns `client` to the requested slot.
    ///
    /// Re-claiming a slot the client already holds is idempotent.
    /// Switching roles vacates the previously held slot, so a client
    /// occupies at most one slot at a time.
    ///
    /// # Errors
    /// Returns [`RegistryError::RoleTaken`] if the slot is held by a
    /// different client. The room is left untouched in that case.
    pub(crate) fn claim(
        &mut self,
        role: Role,
        client: ClientId,
    ) -> Result<(), RegistryError> {
        if let Some(occupant) = self.slots.get(role) {
            if occupant != client {
                return Err(RegistryError::RoleTaken {
                    code: self.code.clone(),
                    role,
                });
            }
        }
        self.slots.clear_of(client);
        self.slots.set(role, client);
        Ok(())
    }

    /// Records a display name for `client`, trimming whitespace and
    /// falling back to [`DEFAULT_NAME`] when blank or absent.
    pub(crate) fn set_name(&mut self, client: ClientId, raw: Option<&str>) {
        let name = raw.map(str::trim).filter(|n| !n.is_empty());
        self.names.insert(
            client,
            name.unwrap_or(DEFAULT_NAME).to_string(),
        );
    }

    /// The recorded display name for `client`, if any.
    pub fn name(&self, client: ClientId) -> Option<&str> {
        self.names.get(&client).map(String::as_str)
    }

    /// Host election on join: the requester becomes host only if the
    /// room has no host or the requester already is the host. A second
    /// distinct client never acquires host status through this path.
    pub(crate) fn elect_host(&mut self, client: ClientId) {
        if self.host.is_none() || self.host == Some(client) {
            self.host = Some(client);
        }
    }

    /// Removes a departing client: vacates its slot, drops its name,
    /// and migrates host status if it held it.
    ///
    /// The new host is the remaining occupant, preferring `p1`; a room
    /// left with no occupants becomes hostless (and is torn down by the
    /// registry).
    pub(crate) fn remove(&mut self, client: ClientId) {
        self.slots.clear_of(client);
        self.names.remove(&client);
        if self.host == Some(client) {
            self.host = self.slots.first_occupant();
        }
    }

    /// Builds the membership snapshot broadcast as `roomState`.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_code: self.code.clone(),
            host_id: self.host,
            players: self.slots,
            names: self.names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ClientId {
        ClientId(id)
    }

    fn room() -> Room {
        Room::new("ABCDE".into(), cid(1), 777)
    }

    #[test]
    fn test_new_room_has_tentative_host_and_empty_slots() {
        let room = room();
        assert_eq!(room.host(), Some(cid(1)));
        assert!(room.is_empty());
        assert_eq!(room.seed(), 777);
    }

    #[test]
    fn test_claim_occupied_slot_by_other_fails_unchanged() {
        let mut room = room();
        room.claim(Role::P1, cid(1)).unwrap();

        let err = room.claim(Role::P1, cid(2)).unwrap_err();
        assert!(matches!(err, RegistryError::RoleTaken { .. }));
        assert_eq!(room.snapshot().players.p1, Some(cid(1)));
    }

    #[test]
    fn test_claim_same_slot_is_idempotent() {
        let mut room = room();
        room.claim(Role::P2, cid(1)).unwrap();
        room.claim(Role::P2, cid(1)).unwrap();
        assert_eq!(room.snapshot().players.p2, Some(cid(1)));
        assert_eq!(room.snapshot().players.p1, None);
    }

    #[test]
    fn test_claim_other_slot_vacates_previous() {
        // A client holds at most one slot; switching roles moves it.
        let mut room = room();
        room.claim(Role::P1, cid(1)).unwrap();
        room.claim(Role::P2, cid(1)).unwrap();

        let players = room.snapshot().players;
        assert_eq!(players.p1, None);
        assert_eq!(players.p2, Some(cid(1)));
    }

    #[test]
    fn test_elect_host_never_steals() {
        let mut room = room();
        room.claim(Role::P1, cid(1)).unwrap();
        room.elect_host(cid(1));
        room.claim(Role::P2, cid(2)).unwrap();
        room.elect_host(cid(2));

        assert_eq!(room.host(), Some(cid(1)));
    }

    #[test]
    fn test_remove_host_migrates_to_remaining_occupant() {
        let mut room = room();
        room.claim(Role::P1, cid(1)).unwrap();
        room.elect_host(cid(1));
        room.claim(Role::P2, cid(2)).unwrap();

        room.remove(cid(1));
        assert_eq!(room.host(), Some(cid(2)));
        assert_eq!(room.snapshot().players.p1, None);
    }

    #[test]
    fn test_remove_last_occupant_leaves_room_hostless_and_empty() {
        let mut room = room();
        room.claim(Role::P1, cid(1)).unwrap();
        room.elect_host(cid(1));

        room.remove(cid(1));
        assert!(room.is_empty());
        assert_eq!(room.host(), None);
    }

    #[test]
    fn test_set_name_trims_and_defaults() {
        let mut room = room();
        room.set_name(cid(1), Some("  Alice  "));
        assert_eq!(room.name(cid(1)), Some("Alice"));

        room.set_name(cid(1), Some("   "));
        assert_eq!(room.name(cid(1)), Some(DEFAULT_NAME));

        room.set_name(cid(2), None);
        assert_eq!(room.name(cid(2)), Some(DEFAULT_NAME));
    }

    #[test]
    fn test_snapshot_reflects_membership() {
        let mut room = room();
        room.claim(Role::P1, cid(1)).unwrap();
        room.elect_host(cid(1));
        room.set_name(cid(1), Some("Alice"));

        let snap = room.snapshot();
        assert_eq!(snap.room_code, "ABCDE");
        assert_eq!(snap.host_id, Some(cid(1)));
        assert_eq!(snap.players.p1, Some(cid(1)));
        assert_eq!(snap.names[&cid(1)], "Alice");
    }
}
