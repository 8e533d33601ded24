//! Error types for the registry layer.

use rendez_protocol::Role;

/// Join rejections surfaced to the requesting client.
///
/// Everything else in the registry is deliberately silent: relays into
/// unknown rooms and non-host `cmd` sends are dropped without error,
/// treated as stale or late messages rather than faults.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The requested slot is held by a different client.
    ///
    /// The display text is the exact string clients show verbatim.
    #[error("Role already taken. Choose the other player.")]
    RoleTaken {
        /// The room whose slot was contested.
        code: String,
        /// The contested slot.
        role: Role,
    },
}
