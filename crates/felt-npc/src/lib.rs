//! Player implementations for the table actor.
//!
//! Concrete types implementing the `Player` trait from [`felt_gameroom`].
//! GTO-strength solving is out of scope here; NPC seats run a cheap
//! rule-based brain biased by a persona's style scalars, the same way a
//! human seat runs on a CLI or WebSocket client -- the table actor cannot
//! tell the difference.
//!
//! ## Implementations
//!
//! - [`Fish`] — uniform-random player, useful for filling seats and tests
//! - [`Human`] — interactive player reading input via channel (requires `cli` feature)
//! - [`RuleBrain`] — NPC brain biased by a persona's [`Style`] scalars
mod fish;
#[cfg(feature = "cli")]
mod human;
mod persona;
mod realtime;

pub use fish::*;
#[cfg(feature = "cli")]
pub use human::*;
pub use persona::*;
pub use realtime::*;
