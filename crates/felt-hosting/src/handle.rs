use super::Client;
use felt_auth::Member;
use felt_core::ID;
use felt_gameroom::Mailbox;
use felt_records::Room;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;

/// Handle to a running table, held by the [`Casino`](super::Casino). Stores
/// the channel endpoints a WebSocket bridge needs to forward bytes, plus the
/// bookkeeping the lobby needs to reuse, reconnect into, or reap this table
/// without reaching into the table's own task.
pub struct TableHandle {
    pub id: ID<Room>,
    pub tx: UnboundedSender<String>,
    pub rx: Arc<Mutex<UnboundedReceiver<String>>>,
    /// The same outgoing sender the bridged [`Client`] holds, so the lobby
    /// can push a message straight to the socket without routing it through
    /// a player's `decide` loop (which only understands action strings).
    pub out_tx: UnboundedSender<String>,
    pub start: Option<oneshot::Sender<()>>,
    /// When this table was registered. Used by
    /// [`Casino::cleanup_idle_tables`](super::Casino::cleanup_idle_tables) to
    /// reap tables nobody ever bridged into.
    pub created_at: Instant,
    /// Handle onto the table's own command queue, for `SitDown`/`StandUp`/
    /// `Close` requests issued from the lobby rather than a connected socket.
    pub mailbox: Mailbox,
    /// Table-wide seat limit, fixed at creation.
    pub max_players: usize,
    /// The registered member bridged into this table's one human seat, if
    /// any. `None` means the seat is either unclaimed or held by an NPC.
    pub user: Option<ID<Member>>,
    /// Display label for story-mode tables (`story_ch{n}_{serial}`); `None`
    /// for ordinary quick-start tables.
    pub name: Option<String>,
    /// Members who have already completed a full hand at this table, so a
    /// second `quick_start` for the same id reconnects instead of reseating.
    pub seated_users: HashSet<ID<Member>>,
}

/// Channels for table lifecycle coordination: one half goes to the
/// [`Casino`]'s registry, the other seats into the table itself.
pub struct TableChannels {
    pub handle: TableHandle,
    pub client: Client,
    pub start: oneshot::Receiver<()>,
    pub done_tx: oneshot::Sender<()>,
    pub done_rx: oneshot::Receiver<()>,
}

impl TableHandle {
    /// Creates paired channels for one table: a [`Client`] player to seat
    /// into the table, and a handle the casino keeps to bridge WebSocket
    /// traffic, reach the table's mailbox, and learn when the table is done.
    pub fn pair(id: ID<Room>, mailbox: Mailbox, max_players: usize) -> TableChannels {
        let (tx_outgoing, rx_outgoing) = unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = unbounded_channel::<String>();
        let (start_tx, start_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let out_tx = tx_outgoing.clone();
        let client = Client::new(tx_outgoing, Arc::new(Mutex::new(rx_incoming)));
        let handle = TableHandle {
            id,
            tx: tx_incoming,
            rx: Arc::new(Mutex::new(rx_outgoing)),
            out_tx,
            start: Some(start_tx),
            created_at: Instant::now(),
            mailbox,
            max_players,
            user: None,
            name: None,
            seated_users: HashSet::new(),
        };
        TableChannels {
            handle,
            client,
            start: start_rx,
            done_tx,
            done_rx,
        }
    }
}
