//! Chinese chess (xiangqi) rule engine.
//!
//! Everything here is a pure function of a [`Board`]: movement templates,
//! obstruction, king safety, the notation codec and manual replay. Session
//! sequencing lives in [`crate::GameSession`].

mod action;
mod board;
mod notation;
mod phases;
mod position;
mod replay;
pub mod rules;
mod types;

pub use action::Move;
pub use board::{Board, NearestPieces};
pub use notation::{ManualEntry, NotationError, parse_manual, record_manual};
pub use phases::{GameStatus, Outcome, OutcomeReason};
pub use position::{Direction, FILES, Point, RANKS};
pub use replay::{Replay, ReplayError, ReplayErrorKind, replay_manual};
pub use rules::{MoveVerdict, in_check, is_checkmated, is_king_exposed, legal_destinations, simulate_move};
pub use types::{Camp, Piece, PieceId, PieceKind};
