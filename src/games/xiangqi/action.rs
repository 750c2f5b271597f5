//! First-class move values.

use super::position::Point;
use super::types::Piece;
use serde::{Deserialize, Serialize};

/// A move: one piece travelling to a target point.
///
/// `piece` is a snapshot taken before the move, so `piece.point()` is the
/// origin square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The piece being moved, as it stood before the move.
    pub piece: Piece,
    /// Destination.
    pub target: Point,
}

impl Move {
    /// Creates a new move.
    pub fn new(piece: Piece, target: Point) -> Self {
        Self { piece, target }
    }

    /// Origin square.
    pub fn from(&self) -> Point {
        self.piece.point()
    }

    /// Destination square.
    pub fn to(&self) -> Point {
        self.target
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.piece, self.target)
    }
}
