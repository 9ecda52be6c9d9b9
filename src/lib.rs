//! Online poker server: live tables, deterministic replay, and NPC opponents.
//!
//! This facade crate re-exports every `felt-*` library crate for convenient
//! access. `felt-server`, the gateway binary, is built and run on its own.
//!
//! ## Crate organization
//!
//! ### Core types
//! - [`core`] — type aliases, constants, shared traits
//! - [`cards`] — card primitives and hand evaluation
//!
//! ### Domain logic
//! - [`gameplay`] — poker game engine
//! - [`dto`] — wire format data transfer objects
//! - [`replay`] — deterministic `HandSpec` -> `ReplayTape` builder
//!
//! ### Infrastructure
//! - [`db`] — PostgreSQL connection pooling and schema management
//! - [`auth`] — authentication, sessions, identity
//! - [`records`] — hand history ledger, per-user audit tape
//!
//! ### Application
//! - [`npc`] — scripted NPC players
//! - [`gameroom`] — async runtime for a live table
//! - [`hosting`] — lobby, table registry, WebSocket bridging

pub use felt_auth as auth;
pub use felt_cards as cards;
pub use felt_db as db;
pub use felt_dto as dto;
pub use felt_gameplay as gameplay;
pub use felt_gameroom as gameroom;
pub use felt_hosting as hosting;
pub use felt_npc as npc;
pub use felt_records as records;
pub use felt_replay as replay;

pub use felt_core as core;
pub use felt_core::*;
