use felt_auth::Member;
use felt_core::Chips;
use felt_core::ID;
use felt_core::Position;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use super::Player;
use super::table::TableError;

/// One request a table's single worker thread serializes against its state.
/// `Action`/`Timeout`/`StartHand` aren't modeled as mailbox commands: they
/// already travel through the engine's own per-seat channel (see
/// [`Engine::ask`](super::Engine::ask)), which is itself a single-reader
/// mailbox keyed by seat. Routing them through a second queue would just be
/// two locks for one piece of state.
pub enum TableCommand {
    /// A bridge attaching before any seat is claimed -- acknowledged so the
    /// caller knows the table is accepting connections at all.
    JoinTable,
    SitDown {
        chair: Position,
        stack: Chips,
        user: Option<ID<Member>>,
        is_npc: bool,
        player: Box<dyn Player>,
    },
    /// Queues `chair` to be removed at the next `HandEnd` rather than
    /// unseating it mid-hand (see the table's `pending_stand_ups`).
    StandUp {
        chair: Position,
    },
    ConnLost {
        chair: Position,
    },
    ConnResume {
        chair: Position,
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableReply {
    Joined,
    SeatedAt(Position),
    StandUpQueued,
    MarkedDisconnected,
    MarkedResumed,
    Closed,
}

type Reply = oneshot::Sender<Result<TableReply, TableError>>;

/// Handle submitters hold to reach a table's worker thread. Cheap to clone;
/// every clone shares the same underlying queue.
#[derive(Clone)]
pub struct Mailbox {
    tx: UnboundedSender<(TableCommand, Reply)>,
}

impl Mailbox {
    /// Enqueues `command` and awaits the table's reply. Returns
    /// [`TableError::TableClosed`] if the table's worker has already shut
    /// its receiving half down (table reaped or crashed).
    pub async fn submit(&self, command: TableCommand) -> Result<TableReply, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send((command, reply_tx)).is_err() {
            return Err(TableError::TableClosed);
        }
        reply_rx.await.unwrap_or(Err(TableError::TableClosed))
    }
}

/// The receiving half, owned by [`Table`](super::Table). Polled once per
/// iteration of the table's run loop alongside hand progression.
pub struct Inbox {
    rx: UnboundedReceiver<(TableCommand, Reply)>,
    tx: UnboundedSender<(TableCommand, Reply)>,
}

impl Default for Inbox {
    fn default() -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Inbox {
    pub fn mailbox(&self) -> Mailbox {
        Mailbox {
            tx: self.tx.clone(),
        }
    }
    /// Non-blocking drain of one pending command, if any.
    pub fn try_recv(&mut self) -> Option<(TableCommand, Reply)> {
        self.rx.try_recv().ok()
    }
    /// Awaits the next command. Used by the run loop's `select!` when the
    /// table has no hand in progress and would otherwise spin.
    pub async fn recv(&mut self) -> Option<(TableCommand, Reply)> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submit_after_inbox_drop_reports_table_closed() {
        let inbox = Inbox::default();
        let mailbox = inbox.mailbox();
        drop(inbox);
        let result = mailbox.submit(TableCommand::JoinTable).await;
        assert_eq!(result, Err(TableError::TableClosed));
    }
}
