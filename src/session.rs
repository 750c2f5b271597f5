//! Game session state machine.
//!
//! A [`GameSession`] owns one [`GameContext`] and sequences seats, turns
//! and the game lifecycle on top of the rule engine:
//!
//! ```text
//! Init ──start──▶ Playing ⇄ Paused
//!                    │
//!                    ▼
//!                 Finished ──restart──▶ Playing
//! ```
//!
//! Operations run to completion synchronously. A host serving several
//! users must serialize calls per session; [`SessionManager`] does so with
//! one mutex per session.

use crate::config::SessionConfig;
use crate::context::{Animation, GameContext, Message, Player, User};
use crate::error::{ActionError, SessionError};
use crate::events::{EventBus, Listener, SessionEvent, SubscriptionId};
use crate::games::xiangqi::{
    Camp, GameStatus, Move, MoveVerdict, Outcome, OutcomeReason, Piece, PieceKind, Point,
    is_checkmated, legal_destinations, record_manual, replay_manual, simulate_move,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// One game between two seated users.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    config: SessionConfig,
    context: GameContext,
    events: EventBus,
    rng: StdRng,
}

impl GameSession {
    /// Creates a session with default configuration.
    #[instrument]
    pub fn new(id: SessionId) -> Self {
        Self::with_config(id, SessionConfig::default())
    }

    /// Creates a session with the given configuration.
    #[instrument]
    pub fn with_config(id: SessionId, config: SessionConfig) -> Self {
        info!(session_id = %id, "Creating new game session");
        let rng = match config.coin_seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            id,
            config,
            context: GameContext::new(),
            events: EventBus::new(),
            rng,
        }
    }

    /// Session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read-only view of the game.
    pub fn context(&self) -> &GameContext {
        &self.context
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────

    /// Registers an event listener.
    #[instrument(skip(self, listener), fields(session_id = %self.id))]
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionEvent, &GameContext) + Send + 'static,
    ) -> SubscriptionId {
        let listener: Listener = Box::new(listener);
        self.events.subscribe(listener)
    }

    /// Removes an event listener.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: SessionEvent) {
        debug!(session_id = %self.id, ?event, "Emitting event");
        self.events.emit(&event, &self.context);
    }

    // ─────────────────────────────────────────────────────────────
    // Seats
    // ─────────────────────────────────────────────────────────────

    /// Seats a user in the first free camp, red preferred.
    ///
    /// Returns false when both seats are taken or the user is already
    /// seated. Joining a session that is not in `Init` starts a fresh game
    /// with the current seats.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn join(&mut self, user: User) -> bool {
        if self.context.players.camp_of(&user.id).is_some() {
            warn!(user_id = %user.id, "User already seated");
            return false;
        }
        let Some(camp) = self.context.players.vacant() else {
            warn!(user_id = %user.id, "Session already has 2 players");
            return false;
        };

        info!(user_id = %user.id, %camp, "Player joined");
        *self.context.players.seat_mut(camp) =
            Some(Player::new(user.clone(), *self.config.default_first_camp()));

        if self.context.status != GameStatus::Init {
            info!(status = %self.context.status, "Resetting game for new player");
            self.context = GameContext::with_players(self.context.players.clone());
        }
        self.emit(SessionEvent::PlayerJoined { camp, user });
        self.emit(SessionEvent::ContextChanged);
        true
    }

    /// Vacates the user's seat.
    ///
    /// The game restarts from `Init` for whoever remains; an empty session
    /// is wiped and reports game over.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn leave(&mut self, user_id: &str) -> bool {
        let Some(camp) = self.context.players.camp_of(user_id) else {
            warn!(user_id, "Unknown user attempted to leave");
            return false;
        };
        let Some(player) = self.context.players.seat_mut(camp).take() else {
            return false;
        };

        info!(user_id, %camp, "Player left");
        self.emit(SessionEvent::PlayerLeft {
            camp,
            user: player.user,
        });

        if self.context.players.is_empty() {
            self.context = GameContext::new();
            self.emit(SessionEvent::GameOver { outcome: None });
        } else {
            self.context = GameContext::with_players(self.context.players.clone());
            self.emit(SessionEvent::GameReset);
        }
        true
    }

    /// Records readiness and first-move preference.
    ///
    /// Without a preference the configured default is recorded.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn ready_or_cancel_ready(
        &mut self,
        user_id: &str,
        ready: bool,
        first_camp: Option<Camp>,
    ) -> bool {
        let Some(camp) = self.context.players.camp_of(user_id) else {
            warn!(user_id, "Unknown user changed readiness");
            return false;
        };
        let first_camp = first_camp.unwrap_or(*self.config.default_first_camp());
        if let Some(player) = self.context.players.seat_mut(camp).as_mut() {
            player.ready = ready;
            player.first_camp = first_camp;
        }

        info!(user_id, %camp, ready, %first_camp, "Readiness changed");
        self.emit(SessionEvent::PlayerReadyChanged { camp, ready });
        self.emit(SessionEvent::ContextChanged);
        true
    }

    /// Swaps the two seats. Only allowed before or after a game.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn exchange_players_camp(&mut self) -> bool {
        if !matches!(self.context.status, GameStatus::Init | GameStatus::Finished) {
            warn!(status = %self.context.status, "Cannot exchange camps mid-game");
            return false;
        }

        self.context.players.swap();
        self.context.messages = vec![Message::Tip("Players exchanged camps".to_string())];
        info!("Players exchanged camps");
        self.emit(SessionEvent::CampExchanged);
        true
    }

    // ─────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Starts play from `Init` once both players are ready.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self) -> bool {
        if self.context.status != GameStatus::Init {
            warn!(status = %self.context.status, "Start outside Init");
            return false;
        }
        if !self.context.players.all_ready() {
            warn!("Start without both players ready");
            return false;
        }
        self.begin();
        true
    }

    /// Starts a new game on a fresh board once both players are ready.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn restart(&mut self) -> bool {
        if !self.context.players.all_ready() {
            warn!("Restart without both players ready");
            return false;
        }
        let counter = self.context.counter;
        self.context = GameContext::with_players(self.context.players.clone());
        self.context.counter = counter;
        self.begin();
        true
    }

    fn begin(&mut self) {
        let first_camp = self.choose_first_camp();
        self.context.first_camp = first_camp;
        self.context.current_camp = first_camp;
        self.context.status = GameStatus::Playing;
        info!(session_id = %self.id, %first_camp, "Game started");
        self.emit(SessionEvent::GameStarted { first_camp });
    }

    /// Shared preference when the players agree, otherwise a coin flip.
    fn choose_first_camp(&mut self) -> Camp {
        let players = &self.context.players;
        match (players.red.as_ref(), players.black.as_ref()) {
            (Some(red), Some(black)) if red.first_camp == black.first_camp => red.first_camp,
            _ => {
                let camp = if self.rng.random_bool(0.5) {
                    Camp::Red
                } else {
                    Camp::Black
                };
                debug!(%camp, "First camp decided by coin flip");
                camp
            }
        }
    }

    /// Pauses a running game or resumes a paused one.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn pause_or_play(&mut self, pause: bool) -> bool {
        let (from, to) = if pause {
            (GameStatus::Playing, GameStatus::Paused)
        } else {
            (GameStatus::Paused, GameStatus::Playing)
        };
        if self.context.status != from {
            warn!(status = %self.context.status, pause, "Cannot toggle pause");
            return false;
        }

        self.context.status = to;
        info!(status = %to, "Pause toggled");
        self.emit(SessionEvent::GamePaused { paused: pause });
        true
    }

    /// Resigns on behalf of the user, crediting the opponent.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn give_up(&mut self, user_id: &str) -> bool {
        if !self.context.status.is_playing() {
            warn!(status = %self.context.status, "Give up outside play");
            return false;
        }
        let Some(camp) = self.context.players.camp_of(user_id) else {
            warn!(user_id, "Unknown user attempted to give up");
            return false;
        };

        let nickname = self
            .context
            .players
            .get(camp)
            .map(|p| p.user.nickname.clone())
            .unwrap_or_default();
        let outcome = Outcome::new(camp.opponent(), OutcomeReason::Resignation);
        self.finish(outcome);
        self.context.messages = vec![Message::Tip(format!("{} gave up", nickname))];

        info!(user_id, %camp, %outcome, "Player gave up");
        self.emit(SessionEvent::GameGivenUp { camp });
        self.emit(SessionEvent::GameOver {
            outcome: Some(outcome),
        });
        true
    }

    fn finish(&mut self, outcome: Outcome) {
        self.context.status = GameStatus::Finished;
        self.context.outcome = Some(outcome);
        self.context.players.clear_ready();
        self.context.clear_selection();
    }

    /// Discards all state and every subscription.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&mut self) {
        info!("Session reset");
        self.context = GameContext::new();
        self.events.clear();
    }

    /// Advances the frame counter.
    pub fn tick(&mut self) -> u64 {
        self.context.counter += 1;
        self.context.counter
    }

    // ─────────────────────────────────────────────────────────────
    // Moves
    // ─────────────────────────────────────────────────────────────

    /// Handles a click on `point` by the user.
    ///
    /// Selects, reselects or deselects the user's own pieces, and commits
    /// the move when a piece is selected and `point` is one of its legal
    /// destinations. Rejections leave the board untouched, record a tip and
    /// emit [`SessionEvent::OperationError`].
    #[instrument(skip(self), fields(session_id = %self.id, point = %point))]
    pub fn move_or_select(&mut self, user_id: &str, point: Point) -> Result<(), ActionError> {
        let Some(camp) = self.context.players.camp_of(user_id) else {
            return Err(self.reject(
                ActionError::UnknownUser {
                    user: user_id.to_string(),
                },
                user_id,
            ));
        };
        if !self.context.status.is_playing() {
            let status = self.context.status;
            return Err(self.reject(ActionError::NotPlaying { status }, user_id));
        }
        if camp != self.context.current_camp {
            return Err(self.reject(
                ActionError::NotYourTurn {
                    user: user_id.to_string(),
                },
                user_id,
            ));
        }

        let occupant = self.context.board.piece_at(point).copied();
        let own = occupant.filter(|p| p.camp() == camp);

        let selected = self.context.active_piece;
        match (selected, own) {
            (Some(active), _) if active.point() == point => {
                self.context.clear_selection();
                self.context.messages.clear();
                debug!(piece = %active, "Selection cancelled");
                self.emit(SessionEvent::SelectionCancelled);
                Ok(())
            }
            (_, Some(piece)) => {
                self.select(piece);
                Ok(())
            }
            (None, None) if occupant.is_some() => {
                Err(self.reject(ActionError::EnemyPiece { point }, user_id))
            }
            (None, None) => Err(self.reject(ActionError::EmptySquare { point }, user_id)),
            (Some(active), None) => {
                let captures_king = occupant.is_some_and(|p| p.kind() == PieceKind::King);
                if self.context.allow_points.contains(&point) && !captures_king {
                    self.commit(active, point);
                    Ok(())
                } else {
                    self.context.clear_selection();
                    Err(self.reject(ActionError::IllegalMove { point }, user_id))
                }
            }
        }
    }

    fn select(&mut self, piece: Piece) {
        self.context.allow_points = legal_destinations(&piece, &self.context.board);
        self.context.active_piece = Some(piece);
        self.context.messages.clear();
        debug!(piece = %piece, destinations = self.context.allow_points.len(), "Piece selected");
        self.emit(SessionEvent::PieceSelected { piece });
    }

    fn commit(&mut self, piece: Piece, target: Point) {
        let camp = piece.camp();
        let entry = record_manual(&piece, target, &self.context.board);
        let verdict = simulate_move(&piece, target, &self.context.board);

        if let Some(captured) = self.context.board.remove_at(target) {
            info!(captured = %captured, "Piece captured");
            self.emit(SessionEvent::PieceCaptured { piece: captured });
        }

        info!(text = %entry.text, %camp, "Move committed");
        self.context.manual.push(entry);
        self.context.move_path = Some((piece.point(), target));
        self.context.board.relocate(piece.id(), target);
        self.emit(SessionEvent::PieceMoved {
            movement: Move::new(piece, target),
        });

        self.context.messages = if verdict == MoveVerdict::Check {
            vec![Message::Animation(Animation::Check)]
        } else {
            Vec::new()
        };

        if is_checkmated(camp, &self.context.board) {
            let outcome = Outcome::new(camp, OutcomeReason::Checkmate);
            self.finish(outcome);
            self.context.messages.push(Message::Animation(Animation::Checkmate));
            self.context.messages.push(Message::Animation(Animation::Win(camp)));
            info!(%outcome, "Checkmate");
            self.emit(SessionEvent::GameOver {
                outcome: Some(outcome),
            });
            return;
        }

        self.context.current_camp = camp.opponent();
        self.context.clear_selection();
        self.emit(SessionEvent::ContextChanged);
    }

    /// Records a rejected action as a tip and an error event.
    fn reject(&mut self, error: ActionError, user_id: &str) -> ActionError {
        warn!(user_id, error = %error, "Action rejected");
        let message = error.to_string();
        self.context.messages = vec![Message::Tip(message.clone())];
        self.emit(SessionEvent::OperationError {
            message,
            user: Some(user_id.to_string()),
        });
        error
    }

    /// Takes back the requesting camp's last move.
    ///
    /// Removes one entry when the manual ends with `camp`'s move, two when
    /// the opponent has already replied. The remaining manual is replayed
    /// to rebuild the board. Returns `Ok(false)` outside play or when there
    /// is nothing to undo. A replay failure leaves the session unchanged
    /// and is returned as a fatal error.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn undo(&mut self, camp: Camp) -> Result<bool, ActionError> {
        if !self.context.status.is_playing() {
            warn!(status = %self.context.status, "Undo outside play");
            return Ok(false);
        }
        let Some(last) = self.context.manual.last() else {
            debug!("Nothing to undo");
            return Ok(false);
        };

        let count = if last.camp == camp { 1 } else { 2 };
        let keep = self.context.manual.len().saturating_sub(count);
        let replay = match replay_manual(&self.context.manual[..keep]) {
            Ok(replay) => replay,
            Err(source) => {
                error!(error = %source, "Stored manual is corrupt");
                self.emit(SessionEvent::OperationError {
                    message: source.to_string(),
                    user: None,
                });
                return Err(ActionError::Replay { source });
            }
        };

        let removed = self.context.manual.len() - keep;
        self.context.manual.truncate(keep);
        self.context.board = replay.board;
        self.context.current_camp = if keep == 0 {
            self.context.first_camp
        } else {
            replay.current_camp
        };
        self.context.clear_selection();
        self.context.move_path = None;
        self.context.messages.clear();

        info!(%camp, removed, current_camp = %self.context.current_camp, "Moves undone");
        self.emit(SessionEvent::GameUndone { removed });
        Ok(true)
    }
}

/// Manages all game sessions.
///
/// Each session sits behind its own mutex so operations on one session
/// are serialized while distinct sessions proceed in parallel.
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: SessionConfig,
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<GameSession>>>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new(config: SessionConfig) -> Self {
        info!("Creating session manager");
        Self {
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a new game session.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: SessionId) -> Result<SessionId, SessionError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists { id });
        }

        let session = GameSession::with_config(id.clone(), self.config.clone());
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Gets a handle to a session.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<Arc<Mutex<GameSession>>> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get(id).cloned();

        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }

        session
    }

    /// Runs `f` with exclusive access to one session.
    #[instrument(skip(self, f))]
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, SessionError> {
        let session = self.get_session(id).ok_or_else(|| SessionError::NotFound {
            id: id.to_string(),
        })?;
        let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut guard))
    }

    /// Removes a session.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.remove(id) {
            Some(_) => {
                info!(session_id = id, "Removed session");
                Ok(())
            }
            None => Err(SessionError::NotFound { id: id.to_string() }),
        }
    }

    /// Lists all active session IDs.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let ids: Vec<_> = sessions.keys().cloned().collect();
        info!(count = ids.len(), "Listed sessions");
        ids
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
