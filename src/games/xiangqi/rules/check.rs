//! King safety: exposure, move simulation and checkmate.

use super::super::board::Board;
use super::super::position::Point;
use super::super::types::{Camp, Piece, PieceKind};
use super::movegen::{candidate_destinations, legal_destinations};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Verdict of a hypothetical move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveVerdict {
    /// The move would leave the mover's own king exposed.
    NotAllow,
    /// The move is legal and exposes the opposing king.
    Check,
    /// The move is legal.
    Allow,
}

/// Whether `king` is under attack on `board`.
///
/// Threats are found from the king's square outward. The nearest piece on
/// each axis may be an attacking rook or facing king, an adjacent pawn on
/// any side of the king, or the screen for a cannon beyond it.
///
/// Knights are handled by asking whether the king's square is one of the
/// knight's candidate destinations. That set applies the leg rule but not
/// the knight's own king safety, so a pinned knight still gives check.
#[instrument(level = "trace", skip(board), fields(king = %king))]
pub fn is_king_exposed(king: &Piece, board: &Board) -> bool {
    let camp = king.camp();
    let origin = king.point();
    let near = board.nearest_pieces(origin);

    for (direction, piece) in near.iter() {
        if piece.camp() != camp {
            let threatens = match piece.kind() {
                PieceKind::Rook | PieceKind::King => true,
                PieceKind::Pawn => direction.distance(origin, piece.point()) == 1,
                _ => false,
            };
            if threatens {
                debug!(attacker = %piece, "King exposed along line");
                return true;
            }
        }

        if let Some(beyond) = board.nearest(piece.point(), direction)
            && beyond.camp() != camp
            && beyond.kind() == PieceKind::Cannon
        {
            debug!(attacker = %beyond, screen = %piece, "King exposed to cannon");
            return true;
        }
    }

    board
        .pieces_of(camp.opponent())
        .filter(|p| p.kind() == PieceKind::Knight)
        .any(|knight| candidate_destinations(knight, board).contains(&origin))
}

/// Plays `piece` to `target` on a copy of `board` and judges the result.
///
/// Any piece on `target` is captured in the copy. Missing kings are
/// treated as not exposed.
#[instrument(level = "trace", skip(board), fields(piece = %piece, target = %target))]
pub fn simulate_move(piece: &Piece, target: Point, board: &Board) -> MoveVerdict {
    let mut hypothetical = board.clone();
    hypothetical.remove_at(target);
    hypothetical.relocate(piece.id(), target);

    let exposed = |camp: Camp| {
        hypothetical
            .king(camp)
            .is_some_and(|king| is_king_exposed(king, &hypothetical))
    };

    if exposed(piece.camp()) {
        MoveVerdict::NotAllow
    } else if exposed(piece.camp().opponent()) {
        MoveVerdict::Check
    } else {
        MoveVerdict::Allow
    }
}

/// Whether `camp` has checkmated its opponent.
///
/// True when no piece of the opposing camp has a legal destination. A
/// side with no legal move loses even when not currently in check.
#[instrument(level = "trace", skip(board))]
pub fn is_checkmated(camp: Camp, board: &Board) -> bool {
    board
        .pieces_of(camp.opponent())
        .all(|piece| legal_destinations(piece, board).is_empty())
}

/// Whether the king of `camp` is currently under attack.
pub fn in_check(camp: Camp, board: &Board) -> bool {
    board
        .king(camp)
        .is_some_and(|king| is_king_exposed(king, board))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i8, y: i8) -> Point {
        Point::new(x, y).unwrap()
    }

    fn kings() -> Board {
        let mut board = Board::empty();
        board.place(Camp::Red, PieceKind::King, p(4, 10));
        board.place(Camp::Black, PieceKind::King, p(6, 1));
        board
    }

    #[test]
    fn test_opening_is_safe() {
        let board = Board::opening();
        assert!(!in_check(Camp::Red, &board));
        assert!(!in_check(Camp::Black, &board));
    }

    #[test]
    fn test_facing_generals() {
        let mut board = Board::empty();
        board.place(Camp::Red, PieceKind::King, p(5, 10));
        board.place(Camp::Black, PieceKind::King, p(5, 1));
        assert!(in_check(Camp::Red, &board));
        board.place(Camp::Red, PieceKind::Advisor, p(5, 9));
        assert!(!in_check(Camp::Red, &board));
    }

    #[test]
    fn test_rook_on_open_file() {
        let mut board = kings();
        board.place(Camp::Black, PieceKind::Rook, p(4, 3));
        assert!(in_check(Camp::Red, &board));
        board.place(Camp::Red, PieceKind::Pawn, p(4, 6));
        assert!(!in_check(Camp::Red, &board));
    }

    #[test]
    fn test_cannon_needs_exactly_one_screen() {
        let mut board = kings();
        board.place(Camp::Black, PieceKind::Cannon, p(4, 3));
        assert!(!in_check(Camp::Red, &board));
        board.place(Camp::Black, PieceKind::Pawn, p(4, 6));
        assert!(in_check(Camp::Red, &board));
        board.place(Camp::Red, PieceKind::Pawn, p(4, 7));
        assert!(!in_check(Camp::Red, &board));
    }

    #[test]
    fn test_adjacent_pawn_threatens_from_any_side() {
        let mut board = kings();
        board.place(Camp::Black, PieceKind::Pawn, p(4, 9));
        assert!(in_check(Camp::Red, &board));

        let mut board = kings();
        board.place(Camp::Red, PieceKind::King, p(4, 9));
        board.remove_at(p(4, 10));
        // Behind the king
        board.place(Camp::Black, PieceKind::Pawn, p(4, 10));
        assert!(in_check(Camp::Red, &board));

        let mut board = kings();
        board.place(Camp::Black, PieceKind::Pawn, p(4, 8));
        assert!(!in_check(Camp::Red, &board));
    }

    #[test]
    fn test_hobbled_knight_does_not_threaten() {
        let mut board = kings();
        board.place(Camp::Black, PieceKind::Knight, p(5, 8));
        assert!(in_check(Camp::Red, &board));
        board.place(Camp::Red, PieceKind::Advisor, p(5, 9));
        assert!(!in_check(Camp::Red, &board));
    }

    #[test]
    fn test_pinned_knight_still_checks() {
        let mut board = Board::empty();
        board.place(Camp::Red, PieceKind::King, p(4, 10));
        board.place(Camp::Black, PieceKind::King, p(5, 1));
        board.place(Camp::Red, PieceKind::Rook, p(5, 10));
        let knight = board.place(Camp::Black, PieceKind::Knight, p(5, 8));
        let knight = *board.get(knight).unwrap();

        assert!(legal_destinations(&knight, &board).is_empty());
        assert!(in_check(Camp::Red, &board));
    }

    #[test]
    fn test_simulate_rejects_suicide() {
        let mut board = kings();
        let guard = board.place(Camp::Red, PieceKind::Rook, p(4, 5));
        board.place(Camp::Black, PieceKind::Rook, p(4, 2));
        let guard = *board.get(guard).unwrap();
        assert_eq!(simulate_move(&guard, p(3, 5), &board), MoveVerdict::NotAllow);
        assert_eq!(simulate_move(&guard, p(4, 2), &board), MoveVerdict::Allow);
    }

    #[test]
    fn test_simulate_reports_check() {
        let mut board = kings();
        let rook = board.place(Camp::Red, PieceKind::Rook, p(1, 5));
        let rook = *board.get(rook).unwrap();
        assert_eq!(simulate_move(&rook, p(6, 5), &board), MoveVerdict::Check);
        assert_eq!(simulate_move(&rook, p(2, 5), &board), MoveVerdict::Allow);
    }

    #[test]
    fn test_double_rook_mate() {
        let mut board = Board::empty();
        board.place(Camp::Red, PieceKind::King, p(4, 10));
        board.place(Camp::Black, PieceKind::King, p(5, 1));
        board.place(Camp::Red, PieceKind::Rook, p(1, 1));
        board.place(Camp::Red, PieceKind::Rook, p(9, 2));
        assert!(is_checkmated(Camp::Red, &board));
        assert!(!is_checkmated(Camp::Black, &board));
    }
}
