//! Hand history ledger, per-user audit tape, and deterministic replay state.
//!
//! Three layers, from durable-identity up:
//!
//! - [`Room`] / [`Hand`] / [`Participant`] / [`Play`] — the normalized,
//!   queryable record of a table and the hands played at it.
//! - [`LedgerEvent`] — the append-only envelope stream every hand emits,
//!   keyed by `(source, scenario, hand, seq)` so live play and replay share
//!   one fact store.
//! - [`AuditHistoryItem`] — a per-user projection over that stream with
//!   quota/pin semantics, independent of the normalized hand records above.
//! - [`Replay`] — in-flight recording state a table actor accumulates while
//!   a hand is live, consumed into the records above at hand end.
mod audit;
mod hand;
mod ledger;
mod participant;
mod play;
mod replay;
mod room;

pub use audit::*;
pub use hand::*;
pub use ledger::*;
pub use participant::*;
pub use play::*;
pub use replay::*;
pub use room::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;
