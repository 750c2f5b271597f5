//! Errors raised by session operations.

use crate::context::UserId;
use crate::games::xiangqi::{GameStatus, Point, ReplayError};
use derive_more::{Display, Error};

/// A rejected [`crate::GameSession`] action.
///
/// Every variant except [`ActionError::Replay`] is recoverable: the
/// session is left as it was apart from an advisory message.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ActionError {
    /// The game is not in progress.
    #[display("The game is not in progress ({})", status)]
    NotPlaying {
        /// Current status.
        status: GameStatus,
    },
    /// The user holds no seat in this session.
    #[display("User {} is not seated in this game", user)]
    UnknownUser {
        /// Offending user.
        user: UserId,
    },
    /// The user's camp is not on move.
    #[display("It is not your turn")]
    NotYourTurn {
        /// Offending user.
        user: UserId,
    },
    /// Nothing to select at the point.
    #[display("There is no piece at {}", point)]
    EmptySquare {
        /// Clicked point.
        point: Point,
    },
    /// The point holds an opposing piece.
    #[display("The piece at {} belongs to your opponent", point)]
    EnemyPiece {
        /// Clicked point.
        point: Point,
    },
    /// The selected piece cannot move to the point.
    #[display("The selected piece cannot move to {}", point)]
    IllegalMove {
        /// Clicked point.
        point: Point,
    },
    /// The stored manual could not be replayed.
    #[display("{}", source)]
    Replay {
        /// Underlying replay failure.
        source: ReplayError,
    },
}

impl ActionError {
    /// Whether the error signals a corrupt manual rather than a bad action.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ActionError::Replay { .. })
    }
}

/// A failed [`crate::SessionManager`] lookup or registration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// A session with this ID is already registered.
    #[display("Session {} already exists", id)]
    AlreadyExists {
        /// Requested session ID.
        id: String,
    },
    /// No session with this ID is registered.
    #[display("Session {} not found", id)]
    NotFound {
        /// Requested session ID.
        id: String,
    },
}
