use super::*;
use felt_auth::Member;
use felt_cards::Hand as CardSet;
use felt_cards::Strength;
use felt_core::Chips;
use felt_core::ID;
use felt_core::Position;
use felt_dto::EnvelopeHeader;
use felt_dto::ServerEnvelope;
use felt_gameplay::Game;
use felt_gameplay::{State, Turn};
use felt_records::AuditHistoryItem;
use felt_records::AuditRepository;
use felt_records::LedgerEvent;
use felt_records::Source;
use felt_records::{Hand, Participant, Play, Room};
use super::mailbox::{Inbox, Mailbox, TableCommand, TableReply};
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_postgres::Client;

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn street_str(street: felt_cards::Street) -> String {
    match street {
        felt_cards::Street::Pref => "PREFLOP",
        felt_cards::Street::Flop => "FLOP",
        felt_cards::Street::Turn => "TURN",
        felt_cards::Street::Rive => "RIVER",
    }
    .to_string()
}

/// Per-seat showdown results for the just-finished hand, in table chair
/// order. Mirrors the replay engine's own `hand_results` (see
/// `felt-replay/src/builder.rs`) so live and replayed tapes read the same
/// way to a client.
fn hand_results(game: &Game, position_to_chair: &[Position], reveal: bool) -> Vec<felt_dto::HandResult> {
    let settlements = game.settlements();
    (0..game.n())
        .map(|pos| {
            let seat = &game.seats()[pos];
            let folded = seat.state() == State::Folding;
            let settlement = &settlements[pos];
            let show = reveal && !folded;
            let (hand_type, hand_score, hand_cards) = if show {
                let combined = CardSet::add(CardSet::from(seat.cards()), CardSet::from(game.board()));
                let strength = Strength::from(combined);
                (
                    strength.ranking().to_string(),
                    strength.ranking() as i32,
                    combined.map(|c| c.to_string()).collect::<Vec<_>>(),
                )
            } else {
                ("mucked".to_string(), 0, Vec::new())
            };
            felt_dto::HandResult {
                chair: position_to_chair.get(pos).copied().unwrap_or(pos),
                hand_type,
                hand_score,
                hand_cards: hand_cards.clone(),
                best_five: hand_cards,
                is_winner: settlement.won() > 0,
                win_amount: settlement.pnl().reward().max(0),
                showed: show,
                mucked: !show,
            }
        })
        .collect()
}

/// A player accepted during the Seating phase but not yet handed to the
/// [`Engine`], keyed by table chair rather than engine seat order.
struct PendingSeat {
    player: Box<dyn Player>,
    stack: Chips,
    user: Option<ID<Member>>,
    is_npc: bool,
}

/// Errors returned by table operations that can fail on caller input, as
/// opposed to internal invariant violations (which still panic). Also the
/// error type returned over a [`Mailbox`] submission's response channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    InvalidChair(Position),
    SeatOccupied(Position),
    NotSeated(Position),
    NotEnoughPlayers,
    TooManyPlayers,
    TableClosed,
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidChair(c) => write!(f, "chair {} is out of range", c),
            Self::SeatOccupied(c) => write!(f, "chair {} is already occupied", c),
            Self::NotSeated(c) => write!(f, "chair {} is not seated", c),
            Self::NotEnoughPlayers => write!(f, "not enough seated players to start"),
            Self::TooManyPlayers => write!(f, "too many seated players"),
            Self::TableClosed => write!(f, "table closed"),
        }
    }
}

impl std::error::Error for TableError {}

/// Imperative shell around [`EngineState`]. Owns the seating list, drives a
/// hand to completion one [`Turn`] at a time, and tracks how long the table
/// has sat empty so the lobby can reap it.
pub struct Table {
    state: EngineState,
    empty_since: Option<Instant>,
    /// Set by [`Table::with_history`] for tables whose hands get written to
    /// the ledger as they finish. `None` for the unpersisted tables the
    /// unit tests below build.
    history: Option<(ID<Room>, Arc<Client>)>,
    /// Seats accepted but not yet pushed into the engine, keyed by table
    /// chair (0-indexed, sparse -- `SitDown` may fill chairs out of order).
    seats: BTreeMap<Position, PendingSeat>,
    /// Which chair the button opens on for the first hand.
    dealer_chair: Position,
    /// Engine seat index -> table chair, built by [`Table::start`] from the
    /// chairs occupied at that moment. Empty before the first hand starts.
    position_to_chair: Vec<Position>,
    /// Engine seat index -> member id, built alongside `position_to_chair`
    /// so finished hands can be attributed to real users.
    position_to_user: Vec<Option<ID<Member>>>,
    /// External command queue: `JoinTable`/`SitDown`/`StandUp`/`ConnLost`/
    /// `ConnResume`/`Close`. See [`mailbox`] for why `Action`/`Timeout` are
    /// not routed through here.
    inbox: Inbox,
    /// True once `Close` has been processed; further submissions are
    /// rejected with `TableClosed` without being queued.
    closed: bool,
    /// Chairs queued to leave at the next `HandEnd` (see §9's
    /// deferred-stand-up note). Drained by auto-disconnecting the seat --
    /// the engine already treats a disconnected seat as folding/checking on
    /// its own turn, which is as close to "not playing anymore" as the
    /// fixed-seat-count engine supports without rebuilding the hand.
    pending_stand_ups: HashSet<Position>,
    /// Invoked with the finished hand's engine once settlement completes,
    /// before the next hand is dealt. Story-mode tables use this to track
    /// session progress toward a chapter's objective; ordinary tables leave
    /// it unset.
    hand_end_hook: Option<HandEndHook>,
    /// Monotonic per-table sequence for [`ServerEnvelope`] headers. Starts
    /// at 0 and is pre-incremented by `stamp`, so the first envelope a
    /// table ever emits carries `server_seq = 1` -- `0` is reserved for a
    /// bootstrap snapshot, which this table does not yet emit over the
    /// wire (see DESIGN.md).
    envelope_seq: u64,
    /// Envelopes emitted so far in the current hand, flushed into a
    /// per-user audit tape at `HandEnd` and cleared for the next hand.
    tape: Vec<felt_dto::TapeEvent>,
    /// Ledger identity of the hand in progress. Assigned fresh by
    /// `begin_hand` and shared between the envelope ledger and the
    /// normalized `Hand` row `persist` writes.
    current_hand_id: ID<Hand>,
}

/// A callback run once per finished hand. See [`Table::on_hand_end`].
pub type HandEndHook = Box<dyn Fn(&Engine<Showdown>) + Send + Sync>;

impl Default for Table {
    fn default() -> Self {
        Self {
            state: EngineState::default(),
            empty_since: Some(Instant::now()),
            history: None,
            seats: BTreeMap::new(),
            dealer_chair: 0,
            position_to_chair: Vec::new(),
            position_to_user: Vec::new(),
            inbox: Inbox::default(),
            closed: false,
            pending_stand_ups: HashSet::new(),
            hand_end_hook: None,
            envelope_seq: 0,
            tape: Vec::new(),
            current_hand_id: ID::default(),
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }
    /// A table whose completed hands are persisted to `room`'s ledger.
    pub fn with_history(room: ID<Room>, db: Arc<Client>) -> Self {
        Self {
            history: Some((room, db)),
            ..Self::default()
        }
    }
    pub fn state(&self) -> &EngineState {
        &self.state
    }
    /// Which chairs are currently occupied (seated or, once a hand is
    /// underway, playing).
    pub fn occupied_chairs(&self) -> Vec<Position> {
        if self.position_to_chair.is_empty() {
            self.seats.keys().copied().collect()
        } else {
            self.position_to_chair.clone()
        }
    }
    /// Number of chairs filled so far, seated or playing.
    pub fn seat_count(&self) -> usize {
        if self.position_to_chair.is_empty() {
            self.seats.len()
        } else {
            self.position_to_chair.len()
        }
    }
    /// Sets which chair the button opens on for the first hand. Has no
    /// effect once the table has started.
    pub fn set_dealer_chair(&mut self, chair: Position) {
        self.dealer_chair = chair;
    }
    /// Seats a player at a specific table `chair`, with `stack` starting
    /// chips, optionally linked to a registered `user`. `is_npc` exempts
    /// them from the human action clock. Mirrors the mailbox's
    /// `SitDown(chair, userID, stack, isBot)` request.
    pub fn seat<P>(
        &mut self,
        chair: Position,
        player: P,
        stack: Chips,
        user: Option<ID<Member>>,
        is_npc: bool,
    ) -> Result<(), TableError>
    where
        P: Player + 'static,
    {
        if chair >= felt_core::MAX_PLAYERS {
            return Err(TableError::InvalidChair(chair));
        }
        if self.seats.contains_key(&chair) {
            return Err(TableError::SeatOccupied(chair));
        }
        self.seats.insert(
            chair,
            PendingSeat {
                player: Box::new(player),
                stack,
                user,
                is_npc,
            },
        );
        self.empty_since = None;
        Ok(())
    }
    /// Removes a not-yet-started seat. Has no effect once the hand has
    /// begun -- leaving mid-hand is handled as a disconnect, not a stand up.
    pub fn stand(&mut self, chair: Position) -> Result<(), TableError> {
        self.seats
            .remove(&chair)
            .map(|_| ())
            .ok_or(TableError::InvalidChair(chair))
    }
    /// Drains the pending seats (in chair order) into the engine and starts
    /// the first hand. Builds the chair/user mapping used by persistence
    /// and live broadcast translation for the lifetime of the table.
    pub async fn start(&mut self) -> Result<(), TableError> {
        if self.seats.len() < felt_core::MIN_PLAYERS {
            return Err(TableError::NotEnoughPlayers);
        }
        if self.seats.len() > felt_core::MAX_PLAYERS {
            return Err(TableError::TooManyPlayers);
        }
        let pending = std::mem::take(&mut self.seats);
        let seating = self.state.as_seating();
        let mut position_to_chair = Vec::with_capacity(pending.len());
        let mut position_to_user = Vec::with_capacity(pending.len());
        for (chair, slot) in pending {
            seating.sit(slot.player, slot.stack, slot.is_npc);
            position_to_chair.push(chair);
            position_to_user.push(slot.user);
        }
        let dealer = position_to_chair
            .iter()
            .position(|&c| c == self.dealer_chair)
            .unwrap_or(0);
        self.position_to_chair = position_to_chair;
        self.position_to_user = position_to_user;
        self.state.start(dealer);
        self.begin_hand().await;
        Ok(())
    }
    /// Translates an engine seat index to the table chair it was dealt
    /// into, once the table has started.
    pub fn chair_of(&self, position: Position) -> Position {
        self.position_to_chair
            .get(position)
            .copied()
            .unwrap_or(position)
    }
    /// The registered user dealt into `position`, if any.
    pub fn user_of(&self, position: Position) -> Option<ID<Member>> {
        self.position_to_user.get(position).copied().flatten()
    }
    /// The engine seat index a chair was dealt into, once started.
    fn position_of(&self, chair: Position) -> Option<Position> {
        self.position_to_chair.iter().position(|&c| c == chair)
    }
    /// A cloneable handle external callers (the WebSocket bridge, the
    /// lobby) use to submit `JoinTable`/`SitDown`/`StandUp`/`ConnLost`/
    /// `ConnResume`/`Close` requests against this table's single worker.
    pub fn mailbox(&self) -> Mailbox {
        self.inbox.mailbox()
    }
    /// Registers a callback run after every hand settles, replacing any
    /// hook set previously. Used by story-mode tables to track chapter
    /// progress without the engine or the run loop knowing about chapters.
    pub fn on_hand_end(&mut self, hook: HandEndHook) {
        self.hand_end_hook = Some(hook);
    }
    /// Processes one mailbox command against current table state. Called
    /// from [`Table::run`]'s drain loop, never concurrently with itself.
    fn handle_command(&mut self, command: TableCommand) -> Result<TableReply, TableError> {
        match command {
            TableCommand::JoinTable => Ok(TableReply::Joined),
            TableCommand::SitDown {
                chair,
                stack,
                user,
                is_npc,
                player,
            } => {
                if !self.position_to_chair.is_empty() {
                    // Hand already underway; the engine's seat count is
                    // fixed for the life of the game it was built with.
                    return Err(TableError::TooManyPlayers);
                }
                if chair >= felt_core::MAX_PLAYERS {
                    return Err(TableError::InvalidChair(chair));
                }
                if self.seats.contains_key(&chair) {
                    return Err(TableError::SeatOccupied(chair));
                }
                self.seats.insert(
                    chair,
                    PendingSeat {
                        player,
                        stack,
                        user,
                        is_npc,
                    },
                );
                self.empty_since = None;
                Ok(TableReply::SeatedAt(chair))
            }
            TableCommand::StandUp { chair } => {
                if self.seats.remove(&chair).is_some() {
                    Ok(TableReply::StandUpQueued)
                } else if let Some(pos) = self.position_of(chair) {
                    self.pending_stand_ups.insert(pos);
                    Ok(TableReply::StandUpQueued)
                } else {
                    Err(TableError::NotSeated(chair))
                }
            }
            TableCommand::ConnLost { chair } => match self.position_of(chair) {
                Some(pos) => {
                    self.state.disconnect(pos);
                    Ok(TableReply::MarkedDisconnected)
                }
                None => Err(TableError::NotSeated(chair)),
            },
            TableCommand::ConnResume { chair } => match self.position_of(chair) {
                Some(pos) => {
                    self.state.reconnect(pos);
                    Ok(TableReply::MarkedResumed)
                }
                None => Err(TableError::NotSeated(chair)),
            },
            TableCommand::Close => {
                self.closed = true;
                Ok(TableReply::Closed)
            }
        }
    }
    /// Drains every mailbox command currently queued, replying to each.
    /// Once closed, queued commands are rejected without being applied.
    fn drain_mailbox(&mut self) {
        while let Some((command, reply)) = self.inbox.try_recv() {
            let result = if self.closed {
                Err(TableError::TableClosed)
            } else {
                self.handle_command(command)
            };
            let _ = reply.send(result);
        }
    }
    /// True once the table has carried no in-progress hand for `ttl`.
    /// The lobby uses this to decide when a table is eligible for reaping.
    pub fn is_idle(&self, ttl: Duration) -> bool {
        self.empty_since
            .is_some_and(|since| since.elapsed() >= ttl)
    }
    /// Drives hands to completion: deals chance nodes, prompts choices, and
    /// runs the showdown/settlement sequence once a hand turns terminal.
    /// Returns once the table has no further hand to play (busted player,
    /// or the engine is still waiting to be started).
    /// Waits for the lobby's start signal, plays hands until the game is
    /// over, then reports completion. Used by the lobby to spawn a table as
    /// its own task and learn when to reap it.
    pub async fn serve(
        mut self,
        start: tokio::sync::oneshot::Receiver<()>,
        done: tokio::sync::oneshot::Sender<()>,
    ) {
        if start.await.is_err() {
            log::debug!("[table] start signal dropped before anyone connected");
            let _ = done.send(());
            return;
        }
        if let Err(e) = self.start().await {
            log::error!("[table] failed to start: {}", e);
            let _ = done.send(());
            return;
        }
        self.run().await;
        let _ = done.send(());
    }
    pub async fn run(&mut self) {
        loop {
            self.drain_mailbox();
            let turn = match &self.state {
                EngineState::Dealing(engine) => Some(engine.turn()),
                _ => None,
            };
            match turn {
                Some(Turn::Chance) => {
                    let dealt = if let EngineState::Dealing(engine) = &mut self.state {
                        engine.deal().await;
                        Some((engine.game().street(), engine.game().board()))
                    } else {
                        None
                    };
                    if let Some((street, board)) = dealt {
                        let cards: Vec<String> = CardSet::from(board).map(|c| c.to_string()).collect();
                        let (header, envelope) = self.stamp(ServerEnvelope::DealBoard {
                            header: EnvelopeHeader::default(),
                            street: street_str(street),
                            cards,
                        });
                        self.record("DealBoard", header, envelope).await;
                        let (header, envelope) = self.stamp(ServerEnvelope::PhaseChange {
                            header: EnvelopeHeader::default(),
                            phase: street_str(street),
                            river_rank: None,
                            river_score: None,
                        });
                        self.record("PhaseChange", header, envelope).await;
                    }
                }
                Some(Turn::Choice(pos)) => {
                    let acted = if let EngineState::Dealing(engine) = &mut self.state {
                        let action = engine.ask(pos).await;
                        let seat = &engine.game().seats()[pos];
                        Some((action, seat.stack(), seat.stake(), engine.game().pot()))
                    } else {
                        None
                    };
                    if let Some((action, stack, stake, pot)) = acted {
                        let chair = self.position_to_chair.get(pos).copied().unwrap_or(pos);
                        let (header, envelope) = self.stamp(ServerEnvelope::ActionResult {
                            header: EnvelopeHeader::default(),
                            chair,
                            action: action.label().to_uppercase(),
                            amount_to: stake,
                            stack,
                            current_bet: stake,
                            pot,
                        });
                        self.record("ActionResult", header, envelope).await;
                        let (header, envelope) = self.stamp(ServerEnvelope::PotUpdate {
                            header: EnvelopeHeader::default(),
                            pots: vec![felt_dto::PotResult { amount: pot, winners: vec![], win_amounts: vec![] }],
                        });
                        self.record("PotUpdate", header, envelope).await;
                    }
                }
                Some(Turn::Terminal) => {
                    self.state.into_showdown();
                }
                None => {
                    let settled = match &mut self.state {
                        EngineState::Showdown(engine) => {
                            engine.showdown().await;
                            engine.settle();
                            if let Some(hook) = &self.hand_end_hook {
                                hook(engine);
                            }
                            true
                        }
                        _ => false,
                    };
                    if !settled {
                        return;
                    }
                    if let EngineState::Showdown(engine) = &self.state {
                        self.persist(engine).await;
                    }
                    self.record_hand_result().await;
                    for pos in self.pending_stand_ups.drain() {
                        self.state.disconnect(pos);
                    }
                    self.state.conclude();
                    if self.state.is_finished() {
                        self.empty_since = Some(Instant::now());
                        return;
                    }
                    self.begin_hand().await;
                }
            }
        }
    }
    /// Stamps `envelope` with the next monotonic `server_seq` for this
    /// table and an `Instant`'s worth of wall-clock time, returning both
    /// the header and the now-headered envelope.
    fn stamp(&mut self, mut envelope: ServerEnvelope) -> (EnvelopeHeader, ServerEnvelope) {
        self.envelope_seq += 1;
        let header = EnvelopeHeader {
            table_id: self.table_uuid(),
            server_seq: self.envelope_seq,
            server_ts_ms: now_ms(),
        };
        *envelope.header_mut() = header;
        (header, envelope)
    }
    fn table_uuid(&self) -> uuid::Uuid {
        self.history
            .as_ref()
            .map(|(room, _)| room.inner())
            .unwrap_or_else(uuid::Uuid::nil)
    }
    /// Appends `envelope` to this hand's tape and, for a persisted table,
    /// to the shared ledger. A ledger write failure is logged and
    /// otherwise ignored, same as `persist` -- a missed audit row should
    /// never stall a live hand.
    async fn record(&mut self, kind: &'static str, header: EnvelopeHeader, envelope: ServerEnvelope) {
        let envelope_b64 = serde_json::to_string(&envelope).unwrap_or_default();
        self.tape.push(felt_dto::TapeEvent {
            kind: kind.to_string(),
            seq: header.server_seq,
            envelope,
            envelope_b64: envelope_b64.clone(),
        });
        let Some((_, db)) = &self.history else { return };
        match LedgerEvent::new(
            Source::Live,
            "",
            self.current_hand_id,
            header.server_seq,
            kind,
            envelope_b64,
            header.server_ts_ms,
        ) {
            Ok(event) => {
                if let Err(e) = db.append(&event).await {
                    log::warn!("[table] failed to append {} to ledger: {:?}", kind, e);
                }
            }
            Err(e) => log::warn!("[table] refused to build {} ledger event: {:?}", kind, e),
        }
    }
    /// Assigns this hand's ledger identity, clears the tape, and emits its
    /// `HandStart` envelope. Called once the engine has actually produced
    /// the hand (first hand from `start`, later ones from `run`'s
    /// `conclude` step), so `engine.game()` reflects its opening state.
    async fn begin_hand(&mut self) {
        self.current_hand_id = ID::default();
        self.tape.clear();
        let snapshot = if let EngineState::Dealing(engine) = &self.state {
            let game = engine.game();
            let dealer_chair = self.position_to_chair.get(game.dealer()).copied().unwrap_or(game.dealer());
            let stacks: BTreeMap<Position, Chips> = game
                .seats()
                .iter()
                .enumerate()
                .map(|(pos, seat)| {
                    (self.position_to_chair.get(pos).copied().unwrap_or(pos), seat.stack())
                })
                .collect();
            Some((dealer_chair, stacks))
        } else {
            None
        };
        let Some((dealer_chair, stacks)) = snapshot else { return };
        let (header, envelope) = self.stamp(ServerEnvelope::HandStart {
            header: EnvelopeHeader::default(),
            hand_id: self.current_hand_id.inner().to_string(),
            dealer_chair,
            stacks,
        });
        self.record("HandStart", header, envelope).await;
    }
    /// Builds and records the terminal envelopes for the hand that just
    /// settled (`Showdown`/`WinByFold` plus `HandEnd`), then flushes the
    /// accumulated tape into each seated user's audit history.
    async fn record_hand_result(&mut self) {
        let Some((is_showdown, results, pot_total, winners, win_amounts, excess_chair, excess_amount, winner_chair, winner_amount)) =
            (if let EngineState::Showdown(engine) = &self.state {
                let game = engine.game();
                let is_showdown = engine.is_showdown();
                let results = hand_results(game, &self.position_to_chair, is_showdown);
                let winners: Vec<Position> = results.iter().filter(|r| r.is_winner).map(|r| r.chair).collect();
                let win_amounts: Vec<Chips> = results.iter().filter(|r| r.is_winner).map(|r| r.win_amount).collect();
                let pot_total: Chips = results.iter().map(|r| r.win_amount).sum();
                let (excess_pos, excess_amount) = game.excess();
                let excess_chair = excess_pos.map(|p| self.position_to_chair.get(p).copied().unwrap_or(p));
                let settlements = game.settlements();
                let (winner_pos, winner_settlement) = settlements
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, s)| s.pnl().reward())
                    .expect("a hand has at least one seat");
                let winner_chair = self.position_to_chair.get(winner_pos).copied().unwrap_or(winner_pos);
                let winner_amount = winner_settlement.pnl().reward();
                Some((is_showdown, results, pot_total, winners, win_amounts, excess_chair, excess_amount, winner_chair, winner_amount))
            } else {
                None
            })
        else {
            return;
        };
        if is_showdown {
            let (header, envelope) = self.stamp(ServerEnvelope::PhaseChange {
                header: EnvelopeHeader::default(),
                phase: "SHOWDOWN".to_string(),
                river_rank: None,
                river_score: None,
            });
            self.record("PhaseChange", header, envelope).await;
            let (header, envelope) = self.stamp(ServerEnvelope::Showdown {
                header: EnvelopeHeader::default(),
                results: results.clone(),
            });
            self.record("Showdown", header, envelope).await;
        } else {
            let (header, envelope) = self.stamp(ServerEnvelope::WinByFold {
                header: EnvelopeHeader::default(),
                winner_chair,
                amount: winner_amount,
            });
            self.record("WinByFold", header, envelope).await;
        }
        let (header, envelope) = self.stamp(ServerEnvelope::HandEnd {
            header: EnvelopeHeader::default(),
            pot_results: vec![felt_dto::PotResult { amount: pot_total, winners: winners.clone(), win_amounts }],
            player_results: results,
            excess_chair,
            excess_amount,
        });
        self.record("HandEnd", header, envelope).await;
        self.flush_tape(pot_total, winners).await;
    }
    /// Projects the current hand's tape into a per-user audit row for
    /// every registered member seated at the table. NPC and guest seats
    /// (no `ID<Member>`) have nothing to project into.
    async fn flush_tape(&mut self, pot_total: Chips, winners: Vec<Position>) {
        let Some((_, db)) = &self.history else { return };
        let tape_blob = serde_json::to_string(&self.tape).unwrap_or_default();
        let summary_json = serde_json::json!({
            "handId": self.current_hand_id.inner().to_string(),
            "potTotal": pot_total,
            "winningChairs": winners,
        })
        .to_string();
        let played_at = now_ms();
        let users: HashSet<ID<Member>> = self.position_to_user.iter().flatten().copied().collect();
        for user in users {
            let item = AuditHistoryItem::new(user, Source::Live, self.current_hand_id, played_at, summary_json.clone())
                .with_tape(tape_blob.clone());
            if let Err(e) = db.upsert_audit(&item).await {
                log::warn!("[table] failed to upsert audit tape for {}: {:?}", user.inner(), e);
            }
        }
    }
    /// Writes the just-finished hand to the ledger: the hand row, one
    /// participant row per seat, and the action log in order. A write
    /// failure is logged and otherwise ignored — a missed ledger entry
    /// should never take a live table down.
    ///
    /// `showed`/`mucked` are a simplification of the real reveal order in
    /// [`Engine::showdown`]: every seat still in the hand at a real
    /// showdown is marked shown, every folded seat mucked.
    async fn persist(&self, engine: &Engine<Showdown>) {
        let Some((room, db)) = &self.history else {
            return;
        };
        let game = engine.game();
        let hand_id = self.current_hand_id;
        let hand = Hand::new(hand_id, *room, game.board(), game.pot(), game.dealer());
        if let Err(e) = db.create_hand(&hand).await {
            log::warn!("[table] failed to persist hand {}: {:?}", hand_id, e);
            return;
        }
        for (seat, player) in game.seats().iter().enumerate() {
            let folded = player.state() == State::Folding;
            let mut participant =
                Participant::new(hand_id, self.user_of(seat), seat, player.cards(), player.stack());
            if folded {
                participant.muck();
            } else if engine.is_showdown() {
                participant.show();
            }
            if let Err(e) = db.create_player(&participant).await {
                log::warn!(
                    "[table] failed to persist P{} for hand {}: {:?}",
                    seat,
                    hand_id,
                    e
                );
            }
        }
        for (seq, action) in engine.history().iter().enumerate() {
            let play = Play::new(hand_id, seq as felt_core::Epoch, None, *action);
            if let Err(e) = db.create_action(&play).await {
                log::warn!(
                    "[table] failed to persist action {} for hand {}: {:?}",
                    seq,
                    hand_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_table_is_idle_immediately() {
        let table = Table::new();
        assert!(table.is_idle(Duration::from_secs(0)));
    }

    #[test]
    fn seating_clears_idle_clock() {
        let mut table = Table::new();
        struct Mute;
        #[async_trait::async_trait]
        impl Player for Mute {
            async fn decide(&mut self, recall: &felt_gameplay::Partial) -> felt_gameplay::Action {
                recall.head().passive()
            }
            async fn notify(&mut self, _event: &Event) {}
        }
        table.seat(0, Mute, 100, None, true).unwrap();
        assert!(!table.is_idle(Duration::from_secs(0)));
    }

    #[test]
    fn seating_rejects_duplicate_chair() {
        let mut table = Table::new();
        struct Mute;
        #[async_trait::async_trait]
        impl Player for Mute {
            async fn decide(&mut self, recall: &felt_gameplay::Partial) -> felt_gameplay::Action {
                recall.head().passive()
            }
            async fn notify(&mut self, _event: &Event) {}
        }
        table.seat(0, Mute, 100, None, true).unwrap();
        assert_eq!(
            table.seat(0, Mute, 100, None, true),
            Err(TableError::SeatOccupied(0))
        );
    }

    #[tokio::test]
    async fn start_fails_with_fewer_than_min_players() {
        let mut table = Table::new();
        struct Mute;
        #[async_trait::async_trait]
        impl Player for Mute {
            async fn decide(&mut self, recall: &felt_gameplay::Partial) -> felt_gameplay::Action {
                recall.head().passive()
            }
            async fn notify(&mut self, _event: &Event) {}
        }
        table.seat(0, Mute, 100, None, true).unwrap();
        assert_eq!(table.start().await, Err(TableError::NotEnoughPlayers));
    }

    #[tokio::test]
    async fn start_maps_engine_positions_to_chairs_in_order() {
        let mut table = Table::new();
        struct Mute;
        #[async_trait::async_trait]
        impl Player for Mute {
            async fn decide(&mut self, recall: &felt_gameplay::Partial) -> felt_gameplay::Action {
                recall.head().passive()
            }
            async fn notify(&mut self, _event: &Event) {}
        }
        table.seat(3, Mute, 100, None, false).unwrap();
        table.seat(1, Mute, 100, None, true).unwrap();
        table.start().await.unwrap();
        assert_eq!(table.chair_of(0), 1);
        assert_eq!(table.chair_of(1), 3);
    }
}
