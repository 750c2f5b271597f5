//! Core domain types for Chinese chess.

use super::position::Point;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// One of the two opposing sides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Camp {
    /// Red starts on ranks 7-10 and advances toward rank 1.
    Red,
    /// Black starts on ranks 1-4 and advances toward rank 10.
    Black,
}

impl Camp {
    /// Returns the opposing camp.
    pub fn opponent(self) -> Self {
        match self {
            Camp::Red => Camp::Black,
            Camp::Black => Camp::Red,
        }
    }

    /// Rank delta of a single forward step.
    pub fn forward(self) -> i8 {
        match self {
            Camp::Red => -1,
            Camp::Black => 1,
        }
    }

    /// Ranks of this camp's half of the board (river included on its side).
    pub fn home_ranks(self) -> std::ops::RangeInclusive<i8> {
        match self {
            Camp::Red => 6..=10,
            Camp::Black => 1..=5,
        }
    }

    /// Ranks of this camp's palace.
    pub fn palace_ranks(self) -> std::ops::RangeInclusive<i8> {
        match self {
            Camp::Red => 8..=10,
            Camp::Black => 1..=3,
        }
    }

    /// Whether the point lies inside this camp's palace.
    pub fn in_palace(self, point: Point) -> bool {
        (4..=6).contains(&point.x()) && self.palace_ranks().contains(&point.y())
    }

    /// Whether the point lies on this camp's side of the river.
    pub fn on_home_side(self, point: Point) -> bool {
        self.home_ranks().contains(&point.y())
    }
}

/// The seven kinds of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// General; confined to the palace.
    King,
    /// Chariot; slides along files and ranks.
    Rook,
    /// Horse; L-shaped leap that can be hobbled.
    Knight,
    /// Slides like a rook, captures by jumping one screen.
    Cannon,
    /// Minister; two-step diagonal, never crosses the river.
    Elephant,
    /// Guard; one-step diagonal inside the palace.
    Advisor,
    /// Soldier; gains sideways steps after crossing the river.
    Pawn,
}

impl PieceKind {
    /// Display glyph used on the board and in notation.
    pub fn name(self, camp: Camp) -> char {
        match (camp, self) {
            (Camp::Red, PieceKind::King) => '帅',
            (Camp::Red, PieceKind::Elephant) => '相',
            (Camp::Red, PieceKind::Advisor) => '仕',
            (Camp::Red, PieceKind::Pawn) => '兵',
            (Camp::Black, PieceKind::King) => '将',
            (Camp::Black, PieceKind::Elephant) => '象',
            (Camp::Black, PieceKind::Advisor) => '士',
            (Camp::Black, PieceKind::Pawn) => '卒',
            (_, PieceKind::Rook) => '车',
            (_, PieceKind::Knight) => '马',
            (_, PieceKind::Cannon) => '炮',
        }
    }

    /// Looks up the kind whose glyph for `camp` is `name`.
    pub fn from_name(name: char, camp: Camp) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|kind| kind.name(camp) == name)
    }

    /// Starting coordinates for this kind in the given camp.
    ///
    /// Black coordinates mirror red ones across the river.
    pub fn starting_points(self, camp: Camp) -> Vec<Point> {
        let red: &[(i8, i8)] = match self {
            PieceKind::King => &[(5, 10)],
            PieceKind::Rook => &[(1, 10), (9, 10)],
            PieceKind::Knight => &[(2, 10), (8, 10)],
            PieceKind::Cannon => &[(2, 8), (8, 8)],
            PieceKind::Elephant => &[(3, 10), (7, 10)],
            PieceKind::Advisor => &[(4, 10), (6, 10)],
            PieceKind::Pawn => &[(1, 7), (3, 7), (5, 7), (7, 7), (9, 7)],
        };
        red.iter()
            .filter_map(|&(x, y)| match camp {
                Camp::Red => Point::new(x, y),
                Camp::Black => Point::new(x, 11 - y),
            })
            .collect()
    }

    /// Whether notation reports this kind's destination by file rather than
    /// by rank distance.
    pub fn moves_diagonally(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Elephant | PieceKind::Advisor)
    }
}

/// Stable identity of a piece within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    camp: Camp,
    kind: PieceKind,
    point: Point,
}

impl Piece {
    /// Creates a piece at the given point.
    pub fn new(id: PieceId, camp: Camp, kind: PieceKind, point: Point) -> Self {
        Self {
            id,
            camp,
            kind,
            point,
        }
    }

    /// Identity of the piece.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Owning camp.
    pub fn camp(&self) -> Camp {
        self.camp
    }

    /// Piece kind.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Current location.
    pub fn point(&self) -> Point {
        self.point
    }

    /// Display glyph.
    pub fn name(&self) -> char {
        self.kind.name(self.camp)
    }

    /// Moves the piece in place.
    pub(crate) fn relocate(&mut self, point: Point) {
        self.point = point;
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.camp, self.name(), self.point)
    }
}
