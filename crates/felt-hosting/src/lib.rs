//! WebSocket table hosting infrastructure.
//!
//! This module provides the server-side machinery for hosting live poker
//! tables over WebSocket connections: the lobby registry and the client
//! bridge between a socket and a seated [`felt_gameroom::Player`].
//!
//! ## Core Types
//!
//! - [`Casino`] — lobby registry of active tables; quick-start, story-mode
//!   chapters, idle reaping, and shutdown all live here
//! - [`Client`] — WebSocket-backed `Player` for a connected human
//! - [`TableHandle`] — channel/mailbox endpoints the casino bridges a socket
//!   through and tracks seating state with
//! - [`chapter::Chapter`] — story-mode chapter registry
//!
//! ## HTTP Handlers
//!
//! The [`handlers`] submodule exposes actix-web routes for table
//! management: start, enter, and leave operations.
mod casino;
pub mod chapter;
mod client;
mod handle;
pub mod handlers;

pub use casino::*;
pub use client::*;
pub use handle::*;
