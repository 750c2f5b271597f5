//! Move-record notation.
//!
//! A manual entry is four glyphs. The usual form is
//! `<piece><source file><direction><value>`, e.g. `炮2平5`. When another
//! piece of the same kind shares the mover's file the source file is
//! replaced by a position prefix in front of the piece glyph, e.g.
//! `前马进3`. If that prefix would also fit a column on another file, the
//! source file takes the place of the piece glyph instead, e.g. `前7进1`.
//!
//! Red reports files counted from its own right (file `10 - x`) using ASCII
//! digits; black reports files as-is using CJK numerals. Decoding accepts
//! either numeral style for either camp.

use super::action::Move;
use super::board::Board;
use super::position::{FILES, Point};
use super::types::{Camp, Piece, PieceKind};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const ADVANCE: char = '进';
const RETREAT: char = '退';
const TRAVERSE: char = '平';

const FRONT: char = '前';
const MIDDLE: char = '中';
const BACK: char = '后';

const CJK_NUMERALS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// One ply of a game record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManualEntry {
    /// Camp that made the move.
    pub camp: Camp,
    /// Notation text.
    pub text: String,
}

impl ManualEntry {
    /// Creates a new entry.
    pub fn new(camp: Camp, text: impl Into<String>) -> Self {
        Self {
            camp,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for ManualEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Reasons a notation token cannot be resolved against a board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum NotationError {
    /// Token does not have exactly four glyphs.
    #[display("Notation '{}' must have exactly four glyphs", text)]
    WrongLength {
        /// Offending token.
        text: String,
    },
    /// Glyph names no piece of the entry's camp.
    #[display("Unknown piece glyph '{}'", glyph)]
    UnknownPiece {
        /// Offending glyph.
        glyph: char,
    },
    /// Glyph is not a numeral.
    #[display("Malformed numeral '{}'", glyph)]
    MalformedNumeral {
        /// Offending glyph.
        glyph: char,
    },
    /// Glyph is not one of advance, retreat or traverse.
    #[display("Unknown direction glyph '{}'", glyph)]
    UnknownDirection {
        /// Offending glyph.
        glyph: char,
    },
    /// No piece matches the token.
    #[display("No piece matches '{}'", text)]
    MissingPiece {
        /// Offending token.
        text: String,
    },
    /// More than one piece matches the token.
    #[display("More than one piece matches '{}'", text)]
    AmbiguousPiece {
        /// Offending token.
        text: String,
    },
    /// Resolved destination lies off the board.
    #[display("Destination of '{}' lies off the board", text)]
    OffBoard {
        /// Offending token.
        text: String,
    },
}

/// Mirrors files for red; black files are reported as-is.
fn file_number(camp: Camp, x: i8) -> i8 {
    match camp {
        Camp::Red => FILES + 1 - x,
        Camp::Black => x,
    }
}

fn numeral(camp: Camp, n: i8) -> char {
    let n = n.clamp(1, 9);
    match camp {
        Camp::Red => char::from(b'0' + n as u8),
        Camp::Black => CJK_NUMERALS[(n - 1) as usize],
    }
}

fn numeral_value(glyph: char) -> Result<i8, NotationError> {
    if let Some(digit) = glyph.to_digit(10).filter(|d| (1..=9).contains(d)) {
        return Ok(digit as i8);
    }
    CJK_NUMERALS
        .iter()
        .position(|&c| c == glyph)
        .map(|i| i as i8 + 1)
        .ok_or(NotationError::MalformedNumeral { glyph })
}

/// Sort key placing the piece nearest the enemy baseline first.
fn advancement(camp: Camp, point: Point) -> i8 {
    -(point.y() * camp.forward())
}

/// Encodes `piece` moving to `target` as a manual entry.
///
/// `board` supplies the teammates used for disambiguation; `piece` itself
/// does not need to be on it.
#[instrument(level = "debug", skip(board), fields(piece = %piece, target = %target))]
pub fn record_manual(piece: &Piece, target: Point, board: &Board) -> ManualEntry {
    let camp = piece.camp();
    let origin = piece.point();
    let step = target.y() - origin.y();

    let direction = match step.signum() {
        0 => TRAVERSE,
        s if s == camp.forward() => ADVANCE,
        _ => RETREAT,
    };
    let value = if step == 0 || piece.kind().moves_diagonally() {
        file_number(camp, target.x())
    } else {
        step.abs()
    };

    let others = |x: i8| -> Vec<Piece> {
        column(piece.kind(), camp, x, board)
            .into_iter()
            .filter(|p| p.id() != piece.id())
            .collect()
    };

    let mut own = others(origin.x());
    let teammates = own.len();
    own.push(*piece);
    own.sort_by_key(|p| advancement(camp, p.point()));
    let index = own.iter().position(|p| p.id() == piece.id()).unwrap_or(0);

    let position = match teammates {
        0 => None,
        1 => Some([Position::Front, Position::Back][index.min(1)]),
        2 => Some([Position::Front, Position::Middle, Position::Back][index.min(2)]),
        _ => Some(Position::Nth(index + 1)),
    };

    let name = piece.name();
    let source = numeral(camp, file_number(camp, origin.x()));
    let value = numeral(camp, value);
    let text = match position {
        Some(position) => {
            let clash = (1..=FILES)
                .filter(|&x| x != origin.x())
                .any(|x| position.index(others(x).len()).is_some());
            let prefix = position.glyph(camp);
            if clash {
                format!("{prefix}{source}{direction}{value}")
            } else {
                format!("{prefix}{name}{direction}{value}")
            }
        }
        None => format!("{name}{source}{direction}{value}"),
    };

    debug!(%text, "Recorded manual entry");
    ManualEntry::new(camp, text)
}

/// Decodes a manual entry into a move on `board`.
///
/// Only resolves the token; legality is the caller's concern.
#[instrument(level = "debug", skip(board), fields(text = %entry.text, camp = %entry.camp))]
pub fn parse_manual(entry: &ManualEntry, board: &Board) -> Result<Move, NotationError> {
    let camp = entry.camp;
    let text = entry.text.trim();
    let glyphs: Vec<char> = text.chars().collect();
    let &[first, second, direction, value] = glyphs.as_slice() else {
        return Err(NotationError::WrongLength {
            text: text.to_string(),
        });
    };

    let piece = match PieceKind::from_name(first, camp) {
        Some(kind) => {
            let x = file_number(camp, numeral_value(second)?);
            let mut matches = board
                .pieces_of(camp)
                .filter(|p| p.kind() == kind && p.point().x() == x);
            match (matches.next(), matches.next()) {
                (Some(piece), None) => *piece,
                (None, _) => {
                    return Err(NotationError::MissingPiece {
                        text: text.to_string(),
                    });
                }
                _ => {
                    return Err(NotationError::AmbiguousPiece {
                        text: text.to_string(),
                    });
                }
            }
        }
        None => match PieceKind::from_name(second, camp) {
            Some(kind) => resolve_position(first, kind, camp, board, text)?,
            None => {
                let file = numeral_value(second)
                    .map_err(|_| NotationError::UnknownPiece { glyph: second })?;
                resolve_file_position(first, file_number(camp, file), camp, board, text)?
            }
        },
    };

    let origin = piece.point();
    let target = match direction {
        TRAVERSE => Point::new(file_number(camp, numeral_value(value)?), origin.y()),
        ADVANCE | RETREAT => {
            let sign = if direction == ADVANCE {
                camp.forward()
            } else {
                -camp.forward()
            };
            let n = numeral_value(value)?;
            if piece.kind().moves_diagonally() {
                let x = file_number(camp, n);
                let dy = match piece.kind() {
                    PieceKind::Knight if (x - origin.x()).abs() == 1 => 2,
                    PieceKind::Elephant => 2,
                    _ => 1,
                };
                Point::new(x, origin.y() + sign * dy)
            } else {
                Point::new(origin.x(), origin.y() + sign * n)
            }
        }
        glyph => return Err(NotationError::UnknownDirection { glyph }),
    }
    .ok_or_else(|| NotationError::OffBoard {
        text: text.to_string(),
    })?;

    Ok(Move::new(piece, target))
}

/// Which piece of a column a position prefix selects.
#[derive(Debug, Clone, Copy)]
enum Position {
    Front,
    Middle,
    Back,
    Nth(usize),
}

impl Position {
    fn parse(glyph: char) -> Result<Self, NotationError> {
        match glyph {
            FRONT => Ok(Position::Front),
            MIDDLE => Ok(Position::Middle),
            BACK => Ok(Position::Back),
            other => numeral_value(other)
                .map(|n| Position::Nth(n as usize))
                .map_err(|_| NotationError::UnknownPiece { glyph: other }),
        }
    }

    /// Index into a front-first column of `len` pieces.
    fn index(self, len: usize) -> Option<usize> {
        match (self, len) {
            (Position::Front, 2 | 3) => Some(0),
            (Position::Back, 2) => Some(1),
            (Position::Middle, 3) => Some(1),
            (Position::Back, 3) => Some(2),
            (Position::Nth(n), len) if len >= 4 && (1..=len).contains(&n) => Some(n - 1),
            _ => None,
        }
    }

    fn glyph(self, camp: Camp) -> char {
        match self {
            Position::Front => FRONT,
            Position::Middle => MIDDLE,
            Position::Back => BACK,
            Position::Nth(n) => numeral(camp, n as i8),
        }
    }
}

/// Pieces of one kind on file `x`, front-most first.
fn column(kind: PieceKind, camp: Camp, x: i8, board: &Board) -> Vec<Piece> {
    let mut column: Vec<Piece> = board
        .pieces_of(camp)
        .filter(|p| p.kind() == kind && p.point().x() == x)
        .copied()
        .collect();
    column.sort_by_key(|p| advancement(camp, p.point()));
    column
}

/// Every piece of `kind` that `position` selects, one per file at most.
fn position_matches(position: Position, kind: PieceKind, camp: Camp, board: &Board) -> Vec<Piece> {
    (1..=FILES)
        .filter_map(|x| {
            let column = column(kind, camp, x, board);
            position.index(column.len()).and_then(|i| column.get(i).copied())
        })
        .collect()
}

fn unique(candidates: Vec<Piece>, text: &str) -> Result<Piece, NotationError> {
    match candidates.as_slice() {
        [piece] => Ok(*piece),
        [] => Err(NotationError::MissingPiece {
            text: text.to_string(),
        }),
        _ => Err(NotationError::AmbiguousPiece {
            text: text.to_string(),
        }),
    }
}

fn resolve_position(
    glyph: char,
    kind: PieceKind,
    camp: Camp,
    board: &Board,
    text: &str,
) -> Result<Piece, NotationError> {
    let position = Position::parse(glyph)?;
    unique(position_matches(position, kind, camp, board), text)
}

/// Resolves `<position><file>`, written only for a kind whose position
/// prefix alone fits more than one file.
fn resolve_file_position(
    glyph: char,
    x: i8,
    camp: Camp,
    board: &Board,
    text: &str,
) -> Result<Piece, NotationError> {
    let position = Position::parse(glyph)?;

    let mut kinds: Vec<PieceKind> = Vec::new();
    for piece in board.pieces_of(camp).filter(|p| p.point().x() == x) {
        if !kinds.contains(&piece.kind()) {
            kinds.push(piece.kind());
        }
    }

    let candidates = kinds
        .into_iter()
        .filter_map(|kind| {
            let matches = position_matches(position, kind, camp, board);
            if matches.len() > 1 {
                matches.into_iter().find(|p| p.point().x() == x)
            } else {
                None
            }
        })
        .collect();
    unique(candidates, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i8, y: i8) -> Point {
        Point::new(x, y).unwrap()
    }

    fn record(camp: Camp, kind: PieceKind, from: Point, to: Point) -> String {
        let piece = Piece::new(super::super::types::PieceId(0), camp, kind, from);
        record_manual(&piece, to, &Board::empty()).text
    }

    #[test]
    fn test_red_knight_entries() {
        let cases = [
            (p(8, 10), p(7, 8), "马2进3"),
            (p(3, 3), p(4, 1), "马7进6"),
            (p(7, 8), p(8, 10), "马3退2"),
            (p(5, 5), p(7, 6), "马5退3"),
            (p(3, 3), p(5, 4), "马7退5"),
        ];
        for (from, to, expected) in cases {
            assert_eq!(record(Camp::Red, PieceKind::Knight, from, to), expected);
        }
    }

    #[test]
    fn test_black_knight_entries() {
        let cases = [
            (p(8, 1), p(7, 3), "马八进七"),
            (p(7, 3), p(8, 1), "马七退八"),
            (p(6, 4), p(4, 5), "马六进四"),
            (p(5, 5), p(7, 6), "马五进七"),
            (p(3, 3), p(5, 4), "马三进五"),
        ];
        for (from, to, expected) in cases {
            assert_eq!(record(Camp::Black, PieceKind::Knight, from, to), expected);
        }
    }

    #[test]
    fn test_straight_movers_report_distance() {
        assert_eq!(record(Camp::Red, PieceKind::Cannon, p(8, 8), p(5, 8)), "炮2平5");
        assert_eq!(record(Camp::Red, PieceKind::Rook, p(1, 10), p(1, 8)), "车9进2");
        assert_eq!(record(Camp::Black, PieceKind::Rook, p(9, 1), p(9, 3)), "车九进二");
        assert_eq!(record(Camp::Black, PieceKind::Pawn, p(3, 4), p(3, 5)), "卒三进一");
    }

    #[test]
    fn test_numerals() {
        assert_eq!(numeral_value('7'), Ok(7));
        assert_eq!(numeral_value('七'), Ok(7));
        assert!(numeral_value('0').is_err());
        assert!(numeral_value('x').is_err());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let entry = ManualEntry::new(Camp::Red, "炮2平");
        assert!(matches!(
            parse_manual(&entry, &Board::opening()),
            Err(NotationError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let entry = ManualEntry::new(Camp::Red, "炮2上5");
        assert_eq!(
            parse_manual(&entry, &Board::opening()),
            Err(NotationError::UnknownDirection { glyph: '上' })
        );
    }
}
