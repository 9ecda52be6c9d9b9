use super::*;
use crate::chapter::{Chapter, StoryProgress};
use felt_auth::Member;
use felt_core::ID;
use felt_core::Position;
use felt_core::Unique;
use felt_gameroom::ServerMessage;
use felt_gameroom::Table;
use felt_gameroom::TableCommand;
use felt_npc::Fish;
use felt_npc::PersonaRegistry;
use felt_npc::RuleBrain;
use felt_records::Room;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio_postgres::Client;

type Tx = UnboundedSender<String>;
type Rx = Arc<Mutex<UnboundedReceiver<String>>>;

/// A table's immutable seating rules. Mirrors the mailbox's `QuickStart`
/// default, `{6,50,100,0,5000,20000}` -- expressed in this table's own chip
/// scale rather than carried over literally.
#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    pub max_players: usize,
    pub small_blind: felt_core::Chips,
    pub big_blind: felt_core::Chips,
    pub dealer_chair: Position,
    pub min_buy_in: felt_core::Chips,
    pub max_buy_in: felt_core::Chips,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_players: 6,
            small_blind: felt_core::S_BLIND,
            big_blind: felt_core::B_BLIND,
            dealer_chair: 0,
            min_buy_in: felt_core::STACK,
            max_buy_in: felt_core::STACK * 4,
        }
    }
}

/// Lobby: the registry of live tables. Owns nothing about gameplay itself --
/// each table drives its own hand loop on its own task, serialized through
/// its own mailbox; the casino only tracks which tables exist and bridges
/// WebSocket bytes to their channels.
pub struct Casino {
    db: Arc<Client>,
    tables: RwLock<HashMap<ID<Room>, TableHandle>>,
    personas: PersonaRegistry,
    /// In-memory story-mode progress, keyed by (member, chapter). Not a
    /// ledger table: this is session bookkeeping the lobby owns, not a hand
    /// record.
    story_progress: RwLock<HashMap<(ID<Member>, &'static str), StoryProgress>>,
    story_serial: AtomicU32,
    /// Set once [`Casino::stop`] has run. New lobby operations refuse to
    /// open tables once this is true.
    stopped: std::sync::atomic::AtomicBool,
}

impl Casino {
    /// Loads the persona registry once, at construction, so a malformed
    /// data file fails at startup rather than mid-lobby.
    pub fn new(db: Arc<Client>) -> Self {
        let personas = PersonaRegistry::load().expect("persona registry must parse");
        Self {
            db,
            tables: RwLock::new(HashMap::new()),
            personas,
            story_progress: RwLock::new(HashMap::new()),
            story_serial: AtomicU32::new(0),
            stopped: std::sync::atomic::AtomicBool::new(false),
        }
    }
    /// Exposes the loaded personas so a gateway can render "who's at this
    /// table" before a hand starts.
    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }
}

impl Casino {
    /// Back-compat entry point for an anonymous, always-fresh heads-up
    /// table. Superseded by [`Casino::quick_start`], which the lobby's
    /// reconnect/reuse rules actually apply to.
    pub async fn start(self: &Arc<Self>) -> anyhow::Result<ID<Room>> {
        self.quick_start(None).await
    }
    /// The lobby's one-click "just get me into a hand" entry point. In
    /// order: (a) if `user` already has an open table, return it
    /// (reconnect); (b) else reuse the first open table with an unclaimed
    /// human seat; (c) else open a new table with the default config and
    /// personas auto-filling every seat but the human's and one spare.
    pub async fn quick_start(self: &Arc<Self>, user: Option<ID<Member>>) -> anyhow::Result<ID<Room>> {
        if let Some(uid) = user {
            if let Some(id) = self.find_reconnect(uid).await {
                return Ok(id);
            }
            if let Some(id) = self.claim_open_seat(uid).await {
                return Ok(id);
            }
        }
        self.open_table(TableConfig::default(), user, None).await
    }
    /// A table where `uid` is already the registered human seat.
    async fn find_reconnect(&self, uid: ID<Member>) -> Option<ID<Room>> {
        self.tables
            .read()
            .await
            .iter()
            .find(|(_, h)| h.user == Some(uid))
            .map(|(id, _)| *id)
    }
    /// The first table whose human seat hasn't been bridged into yet (its
    /// start signal is still unclaimed). Assigns `uid` as that table's
    /// human if found.
    async fn claim_open_seat(&self, uid: ID<Member>) -> Option<ID<Room>> {
        let mut tables = self.tables.write().await;
        let id = tables
            .iter()
            .find(|(_, h)| h.user.is_none() && h.start.is_some())
            .map(|(id, _)| *id)?;
        if let Some(handle) = tables.get_mut(&id) {
            handle.user = Some(uid);
            handle.seated_users.insert(uid);
        }
        Some(id)
    }
    /// Looks up the chapter, checks that `user` has completed its
    /// prerequisite (if any), and opens a dedicated table naming the boss
    /// and support cast from the chapter's persona ids. Registers a
    /// hand-end hook that tracks session counters and marks the chapter
    /// complete (persisting to `story_progress` and pushing a progress
    /// message to the human seat) once the objective is met.
    pub async fn start_story_chapter(
        self: &Arc<Self>,
        user: ID<Member>,
        chapter_id: &str,
    ) -> anyhow::Result<ID<Room>> {
        let chapter = Chapter::get(chapter_id)
            .ok_or_else(|| anyhow::anyhow!("unknown chapter {}", chapter_id))?;
        if let Some(prereq) = chapter.requires {
            let unlocked = self
                .story_progress
                .read()
                .await
                .get(&(user, prereq))
                .is_some_and(|p| p.completed);
            if !unlocked {
                anyhow::bail!("chapter {} is locked until {} is cleared", chapter.id, prereq);
            }
        }
        self.story_progress
            .write()
            .await
            .entry((user, chapter.id))
            .or_default();
        let serial = self.story_serial.fetch_add(1, Ordering::Relaxed);
        let name = format!("story_ch{}_{}", chapter.number, serial);
        let config = TableConfig::default();
        self.open_table(config, Some(user), Some((chapter, name))).await
    }
    /// Shared table-opening path for both quick-start and story-mode tables.
    /// Seats the human at chair 0, then the personas named by `chapter` (at
    /// chairs 1..4, boss first) or -- when `chapter` is `None` -- a random
    /// sample filling chairs `1..min(5, maxPlayers-1)`, leaving the table's
    /// last chair open for a future `quick_start` reuse.
    async fn open_table(
        self: &Arc<Self>,
        config: TableConfig,
        user: Option<ID<Member>>,
        chapter: Option<(&'static Chapter, String)>,
    ) -> anyhow::Result<ID<Room>> {
        if self.stopped.load(Ordering::Relaxed) {
            anyhow::bail!("lobby is shutting down");
        }
        use felt_gameroom::HistoryRepository;
        let room = Room::new(config.big_blind);
        let id = room.id();
        let mut table = Table::with_history(id, self.db.clone());
        table.set_dealer_chair(config.dealer_chair);
        let mailbox = table.mailbox();
        let channels = TableHandle::pair(id, mailbox, config.max_players);
        table
            .seat(0, channels.client, config.min_buy_in, user, false)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        match &chapter {
            Some((chapter, _)) => self.seat_chapter_cast(&mut table, chapter, config)?,
            None => self.seat_auto_fill(&mut table, config)?,
        }
        if let Some((chapter, _)) = &chapter {
            self.install_story_hook(&mut table, user.expect("story chapter always has a user"), chapter);
        }
        let mut handle = channels.handle;
        handle.user = user;
        handle.name = chapter.map(|(_, name)| name);
        if let Some(uid) = user {
            handle.seated_users.insert(uid);
        }
        self.db.create_room(&room).await?;
        self.tables.write().await.insert(id, handle);
        tokio::spawn(table.serve(channels.start, channels.done_tx));
        let casino = self.clone();
        tokio::spawn(async move {
            let _ = channels.done_rx.await;
            let _ = casino.close(id).await;
            log::info!("[casino] table {} cleaned up", id);
        });
        log::debug!("[casino] created table {}", id);
        Ok(id)
    }
    /// Fills chairs `1..min(5, maxPlayers-1)` with a random sample of
    /// distinct personas, leaving at least one chair open beyond them for a
    /// future `quick_start` reuse.
    fn seat_auto_fill(&self, table: &mut Table, config: TableConfig) -> anyhow::Result<()> {
        let last_auto_fill = (config.max_players.saturating_sub(1)).min(5).max(1);
        let npc_chairs = 1..last_auto_fill;
        let mut rng = rand::rng();
        let mut personas = self.personas.sample(npc_chairs.len(), &mut rng).into_iter();
        for chair in npc_chairs {
            let seated = match personas.next() {
                Some(persona) => table.seat(
                    chair,
                    RuleBrain::new(persona.style).with_think_delay(persona.think_delay()),
                    config.min_buy_in,
                    None,
                    true,
                ),
                None => table.seat(chair, Fish, config.min_buy_in, None, true),
            };
            seated.map_err(|e| anyhow::anyhow!("{}", e))?;
        }
        Ok(())
    }
    /// Seats the chapter's boss at chair 1 and support cast at chairs
    /// `2..5`, stopping early if the table's seat count is smaller.
    fn seat_chapter_cast(
        &self,
        table: &mut Table,
        chapter: &Chapter,
        config: TableConfig,
    ) -> anyhow::Result<()> {
        let boss = self
            .personas
            .get(chapter.boss_persona)
            .ok_or_else(|| anyhow::anyhow!("missing boss persona {}", chapter.boss_persona))?;
        table
            .seat(
                1,
                RuleBrain::new(boss.style).with_think_delay(boss.think_delay()),
                config.min_buy_in,
                None,
                true,
            )
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        for (i, persona_id) in chapter.support_personas.iter().enumerate() {
            let chair = 2 + i;
            if chair >= config.max_players {
                break;
            }
            let persona = self
                .personas
                .get(persona_id)
                .ok_or_else(|| anyhow::anyhow!("missing support persona {}", persona_id))?;
            table
                .seat(
                    chair,
                    RuleBrain::new(persona.style).with_think_delay(persona.think_delay()),
                    config.min_buy_in,
                    None,
                    true,
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?;
        }
        Ok(())
    }
    /// Wires the hand-end hook that advances this user's story session and,
    /// once the objective is met, marks the chapter complete and notifies
    /// the human seat directly (standing in for a `broadcastFn` passed into
    /// `StartStoryChapter`).
    fn install_story_hook(
        self: &Arc<Self>,
        table: &mut Table,
        user: ID<Member>,
        chapter: &'static Chapter,
    ) {
        let casino = self.clone();
        table.on_hand_end(Box::new(move |engine| {
            let game = engine.game();
            let rivals_busted = game
                .seats()
                .iter()
                .enumerate()
                .filter(|(seat, _)| *seat != 0)
                .all(|(_, seat)| seat.stack() <= 0);
            let won_pot = game
                .settlements()
                .first()
                .is_some_and(|s| s.pnl().reward() > 0);
            let stack = game.seats().first().map(|s| s.stack()).unwrap_or(0);
            let casino = casino.clone();
            tokio::spawn(async move {
                let just_completed = {
                    let mut progress = casino.story_progress.write().await;
                    let entry = progress.entry((user, chapter.id)).or_default();
                    entry.hands_played += 1;
                    entry.current_stack = stack;
                    if won_pot {
                        entry.pot_wins += 1;
                    }
                    let just_completed =
                        !entry.completed && entry.meets(chapter.objective, rivals_busted);
                    if just_completed {
                        entry.completed = true;
                    }
                    just_completed
                };
                if just_completed {
                    casino.notify_story_progress(user, chapter).await;
                }
            });
        }));
    }
    /// Pushes a `StoryProgress` envelope to `user`'s bridged socket, if
    /// they're currently connected to one of this chapter's tables.
    async fn notify_story_progress(&self, user: ID<Member>, chapter: &Chapter) {
        let tables = self.tables.read().await;
        let Some(handle) = tables.values().find(|h| h.user == Some(user)) else {
            return;
        };
        let header = felt_dto::EnvelopeHeader {
            table_id: handle.id.inner(),
            server_seq: 0,
            server_ts_ms: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as i64)
                .unwrap_or(0),
        };
        let envelope = felt_dto::ServerEnvelope::StoryProgress {
            header,
            chapter: chapter.id.to_string(),
            complete: true,
        };
        if let Ok(json) = serde_json::to_string(&envelope) {
            let _ = handle.out_tx.send(json);
        }
    }
    /// Called by a 30s ticker: removes tables that have either closed
    /// themselves or sat empty past `ttl`. Submits `Close` to each reaped
    /// table's mailbox so its run loop stops draining.
    pub async fn cleanup_idle_tables(&self, ttl: std::time::Duration) {
        let stale: Vec<ID<Room>> = self
            .tables
            .read()
            .await
            .iter()
            .filter(|(_, h)| h.start.is_none() && h.created_at.elapsed() >= ttl)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            if let Some(handle) = self.tables.write().await.remove(&id) {
                let _ = handle.mailbox.submit(TableCommand::Close).await;
                log::info!("[casino] reaped idle table {}", id);
            }
        }
    }
    /// Closes every live table and marks the lobby stopped, so no further
    /// `quick_start`/`start_story_chapter` calls open new ones.
    pub async fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
        let handles: Vec<TableHandle> = self.tables.write().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            let _ = handle.mailbox.submit(TableCommand::Close).await;
        }
    }
    /// Removes a table from the registry. Idempotent from the caller's
    /// perspective: a missing table is reported, never panics.
    pub async fn close(&self, id: ID<Room>) -> anyhow::Result<()> {
        self.tables
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("table not found"))
    }
    /// Gets channel endpoints and start signal for WebSocket bridging.
    pub async fn channels(
        &self,
        id: ID<Room>,
    ) -> anyhow::Result<(Tx, Rx, Option<tokio::sync::oneshot::Sender<()>>)> {
        self.tables
            .write()
            .await
            .get_mut(&id)
            .map(|h| (h.tx.clone(), h.rx.clone(), h.start.take()))
            .ok_or_else(|| anyhow::anyhow!("table not found"))
    }
    /// Spawns a WebSocket <-> table bridge. Sends the start signal on first
    /// connect, so a solo-seated table doesn't deal before anyone's there
    /// to see it.
    pub async fn bridge(
        &self,
        id: ID<Room>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> anyhow::Result<()> {
        use futures::StreamExt;
        let (tx, rx, start) = self.channels(id).await?;
        session
            .text(ServerMessage::connected(&id.to_string()).to_json())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        start.map(|s| s.send(()));
        log::debug!("[bridge {}] connected", id);
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = async { rx.lock().await.recv().await } => match msg {
                        Some(json) => if session.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Text(text))) => if tx.send(text.to_string()).is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            log::debug!("[bridge {}] disconnected", id);
        });
        Ok(())
    }
}
