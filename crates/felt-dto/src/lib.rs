//! Wire format: the `HandSpec`/`ReplayTape` replay contract and the tagged
//! `ServerEnvelope` union shared between the table actor's broadcasts and
//! the replay engine's output. Plain data, no behavior — the crates that
//! build and consume these (`felt-gameroom`, `felt-replay`, `felt-server`)
//! own the logic.
mod envelope;
mod error;
mod handspec;
mod tape;

pub use envelope::*;
pub use error::*;
pub use handspec::*;
pub use tape::*;
