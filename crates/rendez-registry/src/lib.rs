//! Room registry and lifecycle coordination for Rendez.
//!
//! This is the core of the coordinator: it owns the mapping from room
//! code to room state, assigns role slots, elects and migrates hosts,
//! and tears rooms down the moment they empty. Every inbound transport
//! event is handled synchronously against this state and the results
//! are pushed onto per-client outboxes.
//!
//! # Key types
//!
//! - [`Registry`] — the process-wide room map and membership index
//! - [`Room`] — one rendezvous session with two role slots
//! - [`JoinRequest`] / [`JoinOutcome`] — the join operation's in/out
//! - [`RegistryError`] — join rejections

mod code;
mod error;
mod registry;
mod room;

pub use code::{CODE_LEN, generate_code, generate_seed, normalize_code};
pub use error::RegistryError;
pub use registry::{
    ClientSender, JoinOutcome, JoinRequest, Membership, Registry,
};
pub use room::{DEFAULT_NAME, Room};
