//! Wire protocol for Rendez.
//!
//! This crate defines the "language" that clients and the coordinator
//! speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`RoomSnapshot`],
//!   [`ClientId`], [`Role`]) — the message structures that travel on
//!   the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw frames) and the room
//! registry. It doesn't know about connections or rooms — it only knows
//! how to describe and serialize events.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ClientEvent, ClientId, PlayerSlots, Role, RoomSnapshot, ServerEvent,
};
