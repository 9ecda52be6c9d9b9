//! Async runtime for a single live poker table.
//!
//! [`Engine`] is the functional core: a typestate machine that enforces
//! betting rules and fans hand events out to seated players over a shared
//! mailbox. [`Table`] is the imperative shell around it — it owns the
//! engine, seats and removes players, drives hands to completion, and
//! stamps every broadcast-worthy step as a `felt_dto::ServerEnvelope` that
//! it both appends to the `felt_records` ledger and folds into a per-hand
//! tape for audit replay. Transport (felt-hosting, felt-server) sits
//! outside this crate; [`HistoryRepository`] is the normalized hand/action
//! seam and `felt_records::AuditRepository` is the ledger/tape seam, both
//! implemented directly on the shared `Arc<tokio_postgres::Client>`.

mod actor;
mod channel;
mod dealer;
mod engine;
mod event;
mod mailbox;
mod player;
mod protocol;
mod repository;
mod table;

pub use actor::Actor;
pub use channel::Channel;
pub use dealer::Dealer;
pub use engine::{Dealing, Engine, EngineState, Finished, Seating, Showdown};
pub use event::Event;
pub use mailbox::{Mailbox, TableCommand, TableReply};
pub use player::Player;
pub use protocol::{Protocol, ServerMessage};
pub use repository::HistoryRepository;
pub use table::{HandEndHook, Table, TableError};
