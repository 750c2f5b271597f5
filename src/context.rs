//! The per-session game aggregate.

use crate::games::xiangqi::{Board, Camp, GameStatus, ManualEntry, Outcome, Piece, Point};
use serde::{Deserialize, Serialize};

/// Unique identifier for a user.
pub type UserId = String;

/// An authenticated user, as handed to the session by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// User's unique ID.
    pub id: UserId,
    /// Display name.
    pub nickname: String,
}

impl User {
    /// Creates a user.
    pub fn new(id: impl Into<UserId>, nickname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
        }
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The user in the seat.
    pub user: User,
    /// Whether the player has readied up.
    pub ready: bool,
    /// Camp this player would like to move first.
    pub first_camp: Camp,
}

impl Player {
    /// Seats a user, not yet ready.
    pub fn new(user: User, first_camp: Camp) -> Self {
        Self {
            user,
            ready: false,
            first_camp,
        }
    }
}

/// The two seats of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    /// Player controlling red.
    pub red: Option<Player>,
    /// Player controlling black.
    pub black: Option<Player>,
}

impl Players {
    /// The player in the given camp's seat.
    pub fn get(&self, camp: Camp) -> Option<&Player> {
        match camp {
            Camp::Red => self.red.as_ref(),
            Camp::Black => self.black.as_ref(),
        }
    }

    /// Mutable access to a seat.
    pub fn seat_mut(&mut self, camp: Camp) -> &mut Option<Player> {
        match camp {
            Camp::Red => &mut self.red,
            Camp::Black => &mut self.black,
        }
    }

    /// Camp of the seat held by `user_id`.
    pub fn camp_of(&self, user_id: &str) -> Option<Camp> {
        [Camp::Red, Camp::Black]
            .into_iter()
            .find(|camp| self.get(*camp).is_some_and(|p| p.user.id == user_id))
    }

    /// First empty seat, red preferred.
    pub fn vacant(&self) -> Option<Camp> {
        [Camp::Red, Camp::Black]
            .into_iter()
            .find(|camp| self.get(*camp).is_none())
    }

    /// Whether nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.red.is_none() && self.black.is_none()
    }

    /// Whether both seats are taken and both players are ready.
    pub fn all_ready(&self) -> bool {
        self.red.as_ref().is_some_and(|p| p.ready) && self.black.as_ref().is_some_and(|p| p.ready)
    }

    /// Clears both ready flags.
    pub fn clear_ready(&mut self) {
        for player in [&mut self.red, &mut self.black].into_iter().flatten() {
            player.ready = false;
        }
    }

    /// Swaps the two seats.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.red, &mut self.black);
    }
}

/// Animation cue for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    /// A king is in check.
    Check,
    /// The game ended in checkmate.
    Checkmate,
    /// The given camp won.
    Win(Camp),
}

/// Transient advisory message attached to the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Message {
    /// Human-readable tip or error text.
    Tip(String),
    /// Animation cue.
    Animation(Animation),
}

/// Everything a renderer needs to draw one session.
///
/// Owned by exactly one [`crate::GameSession`], which funnels all mutation
/// through its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameContext {
    /// Lifecycle status.
    pub status: GameStatus,
    /// Seats.
    pub players: Players,
    /// Camp that moved first this game.
    pub first_camp: Camp,
    /// Camp on move.
    pub current_camp: Camp,
    /// Moves played so far.
    pub manual: Vec<ManualEntry>,
    /// Live pieces.
    pub board: Board,
    /// Endpoints of the last committed move.
    pub move_path: Option<(Point, Point)>,
    /// Selected piece; always belongs to `current_camp`.
    pub active_piece: Option<Piece>,
    /// Legal destinations of the selected piece.
    pub allow_points: Vec<Point>,
    /// Pending advisory messages.
    pub messages: Vec<Message>,
    /// Set once the game is finished.
    pub outcome: Option<Outcome>,
    /// Frame counter.
    pub counter: u64,
}

impl GameContext {
    /// Fresh context with nobody seated.
    pub fn new() -> Self {
        Self::with_players(Players::default())
    }

    /// Fresh context keeping the given seats.
    pub fn with_players(players: Players) -> Self {
        Self {
            status: GameStatus::Init,
            players,
            first_camp: Camp::Red,
            current_camp: Camp::Red,
            manual: Vec::new(),
            board: Board::opening(),
            move_path: None,
            active_piece: None,
            allow_points: Vec::new(),
            messages: Vec::new(),
            outcome: None,
            counter: 0,
        }
    }

    /// Drops the current selection.
    pub(crate) fn clear_selection(&mut self) {
        self.active_piece = None;
        self.allow_points.clear();
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated() -> Players {
        Players {
            red: Some(Player::new(User::new("a", "Alice"), Camp::Red)),
            black: Some(Player::new(User::new("b", "Bo"), Camp::Red)),
        }
    }

    #[test]
    fn test_camp_lookup_and_swap() {
        let mut players = seated();
        assert_eq!(players.camp_of("a"), Some(Camp::Red));
        assert_eq!(players.camp_of("b"), Some(Camp::Black));
        assert_eq!(players.camp_of("c"), None);
        players.swap();
        assert_eq!(players.camp_of("a"), Some(Camp::Black));
    }

    #[test]
    fn test_vacant_prefers_red() {
        let mut players = Players::default();
        assert_eq!(players.vacant(), Some(Camp::Red));
        players.red = Some(Player::new(User::new("a", "Alice"), Camp::Red));
        assert_eq!(players.vacant(), Some(Camp::Black));
        players.red = None;
        players.black = Some(Player::new(User::new("b", "Bo"), Camp::Red));
        assert_eq!(players.vacant(), Some(Camp::Red));
    }

    #[test]
    fn test_all_ready_needs_two_players() {
        let mut players = seated();
        assert!(!players.all_ready());
        players.seat_mut(Camp::Red).as_mut().unwrap().ready = true;
        assert!(!players.all_ready());
        players.seat_mut(Camp::Black).as_mut().unwrap().ready = true;
        assert!(players.all_ready());
        players.clear_ready();
        assert!(!players.all_ready());
    }
}
