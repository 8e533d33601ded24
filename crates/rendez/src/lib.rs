//! # Rendez
//!
//! A real-time session coordinator for small multiplayer game rooms:
//! two clients rendezvous under a shared room code, each is assigned a
//! role slot, one connection is the authoritative host, and host
//! commands and player actions are relayed to all room members.
//!
//! The server simulates no game logic, persists nothing, and validates
//! no payloads — it is pure session/identity/relay plumbing on top of
//! the room lifecycle state machine in `rendez-registry`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rendez::RendezServerBuilder;
//!
//! # async fn run() -> Result<(), rendez::RendezError> {
//! let server = RendezServerBuilder::new()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::RendezError;
pub use server::{RendezServer, RendezServerBuilder};
