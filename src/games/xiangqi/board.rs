//! The collection of live pieces.

use super::position::{Direction, FILES, Point, RANKS};
use super::types::{Camp, Piece, PieceId, PieceKind};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::instrument;

/// Live pieces of one game.
///
/// Order carries no meaning; pieces are identified by [`PieceId`] and
/// at most one piece occupies any point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    /// Creates a board holding the given pieces.
    pub fn from_pieces(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    /// Creates an empty board.
    pub fn empty() -> Self {
        Self { pieces: Vec::new() }
    }

    /// Standard 32-piece starting position.
    #[instrument(level = "trace")]
    pub fn opening() -> Self {
        let mut next_id = 0u8;
        let mut pieces = Vec::with_capacity(32);
        for camp in Camp::iter() {
            for kind in PieceKind::iter() {
                for point in kind.starting_points(camp) {
                    pieces.push(Piece::new(PieceId(next_id), camp, kind, point));
                    next_id += 1;
                }
            }
        }
        Self { pieces }
    }

    /// Places a new piece and returns its id.
    ///
    /// Any piece already on `point` is removed first.
    pub fn place(&mut self, camp: Camp, kind: PieceKind, point: Point) -> PieceId {
        self.remove_at(point);
        let id = self
            .pieces
            .iter()
            .map(|p| p.id().0 + 1)
            .max()
            .map_or(PieceId(0), PieceId);
        self.pieces.push(Piece::new(id, camp, kind, point));
        id
    }

    /// Iterates all live pieces.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// Iterates the live pieces of one camp.
    pub fn pieces_of(&self, camp: Camp) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.camp() == camp)
    }

    /// Number of live pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Whether no pieces remain.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The piece standing on `point`.
    pub fn piece_at(&self, point: Point) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.point() == point)
    }

    /// Whether `point` is occupied.
    pub fn is_occupied(&self, point: Point) -> bool {
        self.piece_at(point).is_some()
    }

    /// Looks up a piece by identity.
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    /// The king of the given camp, if still on the board.
    pub fn king(&self, camp: Camp) -> Option<&Piece> {
        self.pieces_of(camp).find(|p| p.kind() == PieceKind::King)
    }

    /// Removes and returns the piece on `point`.
    pub fn remove_at(&mut self, point: Point) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.point() == point)?;
        Some(self.pieces.swap_remove(index))
    }

    /// Moves a piece in place. Returns false if no such piece exists.
    pub fn relocate(&mut self, id: PieceId, point: Point) -> bool {
        match self.pieces.iter_mut().find(|p| p.id() == id) {
            Some(piece) => {
                piece.relocate(point);
                true
            }
            None => false,
        }
    }

    /// Closest piece from `origin` along `direction`, skipping empty squares.
    ///
    /// `None` means the board edge was reached first.
    pub fn nearest(&self, origin: Point, direction: Direction) -> Option<&Piece> {
        let mut cursor = origin.step(direction);
        while let Some(point) = cursor {
            if let Some(piece) = self.piece_at(point) {
                return Some(piece);
            }
            cursor = point.step(direction);
        }
        None
    }

    /// Nearest pieces in all four directions from `origin`.
    pub fn nearest_pieces(&self, origin: Point) -> NearestPieces<'_> {
        NearestPieces {
            up: self.nearest(origin, Direction::Up),
            down: self.nearest(origin, Direction::Down),
            left: self.nearest(origin, Direction::Left),
            right: self.nearest(origin, Direction::Right),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::opening()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  ")?;
        for x in 1..=FILES {
            write!(f, " {x}")?;
        }
        writeln!(f)?;
        for y in 1..=RANKS {
            write!(f, "{y:>2}")?;
            for x in 1..=FILES {
                match Point::new(x, y).and_then(|p| self.piece_at(p)) {
                    Some(piece) if piece.camp() == Camp::Red => {
                        write!(f, "\x1B[31m{}\x1B[0m", piece.name())?
                    }
                    Some(piece) => write!(f, "{}", piece.name())?,
                    None => write!(f, " ·")?,
                }
            }
            writeln!(f)?;
            if y == 5 {
                writeln!(f, "  ~~~~~~~~~~~~~~~~~~")?;
            }
        }
        Ok(())
    }
}

/// The closest piece along each axis direction from some origin.
///
/// Absence means the line of sight reaches the board edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestPieces<'a> {
    /// Toward rank 1.
    pub up: Option<&'a Piece>,
    /// Toward rank 10.
    pub down: Option<&'a Piece>,
    /// Toward file 1.
    pub left: Option<&'a Piece>,
    /// Toward file 9.
    pub right: Option<&'a Piece>,
}

impl<'a> NearestPieces<'a> {
    /// Nearest piece in one direction.
    pub fn get(&self, direction: Direction) -> Option<&'a Piece> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Iterates `(direction, piece)` pairs that found a piece.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &'a Piece)> + '_ {
        Direction::iter().filter_map(|d| self.get(d).map(|p| (d, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i8, y: i8) -> Point {
        Point::new(x, y).unwrap()
    }

    #[test]
    fn test_opening_has_32_unique_pieces() {
        let board = Board::opening();
        assert_eq!(board.len(), 32);
        assert_eq!(board.pieces_of(Camp::Red).count(), 16);
        let mut points: Vec<_> = board.iter().map(|p| p.point()).collect();
        points.sort();
        points.dedup();
        assert_eq!(points.len(), 32);
    }

    #[test]
    fn test_kings_on_starting_squares() {
        let board = Board::opening();
        assert_eq!(board.king(Camp::Red).map(|k| k.point()), Some(p(5, 10)));
        assert_eq!(board.king(Camp::Black).map(|k| k.point()), Some(p(5, 1)));
    }

    #[test]
    fn test_nearest_pieces_from_red_cannon() {
        let board = Board::opening();
        let near = board.nearest_pieces(p(2, 8));
        assert_eq!(near.up.map(|p| p.point()), Some(p(2, 3)));
        assert_eq!(near.down.map(|p| p.point()), Some(p(2, 10)));
        assert!(near.left.is_none());
        assert_eq!(near.right.map(|p| p.point()), Some(p(8, 8)));
    }

    #[test]
    fn test_remove_and_relocate() {
        let mut board = Board::opening();
        let cannon = board.piece_at(p(2, 8)).unwrap().id();
        let captured = board.remove_at(p(2, 3)).unwrap();
        assert_eq!(captured.kind(), PieceKind::Cannon);
        assert!(board.relocate(cannon, p(2, 3)));
        assert_eq!(board.get(cannon).map(|c| c.point()), Some(p(2, 3)));
        assert_eq!(board.len(), 31);
    }

    #[test]
    fn test_place_assigns_fresh_ids() {
        let mut board = Board::empty();
        let a = board.place(Camp::Red, PieceKind::King, p(5, 10));
        let b = board.place(Camp::Black, PieceKind::King, p(5, 1));
        assert_ne!(a, b);
        let c = board.place(Camp::Red, PieceKind::Rook, p(5, 1));
        assert_eq!(board.len(), 2);
        assert_eq!(board.piece_at(p(5, 1)).map(|p| p.id()), Some(c));
    }
}
