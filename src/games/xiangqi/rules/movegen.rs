//! Move generation.
//!
//! Destinations are computed in stages: the kind's raw template, then
//! obstruction filtering, then removal of squares held by friendly pieces,
//! and finally the king-safety gate from [`super::check`].

use super::super::board::Board;
use super::super::position::{Direction, Point};
use super::super::types::{Camp, Piece, PieceKind};
use super::check::{MoveVerdict, simulate_move};
use tracing::instrument;

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT: [(i8, i8); 8] = [
    (-2, 1),
    (-2, -1),
    (2, 1),
    (2, -1),
    (-1, -2),
    (1, -2),
    (-1, 2),
    (1, 2),
];

/// Movement template of a piece kind, ignoring every other piece.
#[instrument(level = "trace")]
pub fn raw_targets(kind: PieceKind, camp: Camp, origin: Point) -> Vec<Point> {
    let offsets = |deltas: &[(i8, i8)]| -> Vec<Point> {
        deltas
            .iter()
            .filter_map(|&(dx, dy)| origin.offset(dx, dy))
            .collect()
    };

    match kind {
        PieceKind::King => offsets(&ORTHOGONAL)
            .into_iter()
            .filter(|p| camp.in_palace(*p))
            .collect(),
        PieceKind::Rook | PieceKind::Cannon => Point::all()
            .filter(|p| *p != origin && (p.x() == origin.x() || p.y() == origin.y()))
            .collect(),
        PieceKind::Knight => offsets(&KNIGHT),
        PieceKind::Elephant => {
            let doubled: Vec<_> = DIAGONAL.iter().map(|&(dx, dy)| (dx * 2, dy * 2)).collect();
            offsets(&doubled)
                .into_iter()
                .filter(|p| camp.on_home_side(*p))
                .collect()
        }
        PieceKind::Advisor => offsets(&DIAGONAL)
            .into_iter()
            .filter(|p| camp.in_palace(*p))
            .collect(),
        PieceKind::Pawn => {
            let forward = camp.forward();
            if camp.on_home_side(origin) {
                offsets(&[(0, forward)])
            } else {
                offsets(&[(0, forward), (-1, 0), (1, 0)])
            }
        }
    }
}

/// Square a knight or elephant move straddles.
///
/// Returns `None` for kinds that cannot be hobbled.
pub fn leg_of(kind: PieceKind, origin: Point, target: Point) -> Option<Point> {
    let dx = target.x() - origin.x();
    let dy = target.y() - origin.y();
    match kind {
        PieceKind::Knight if dx.abs() == 2 => origin.offset(dx / 2, 0),
        PieceKind::Knight => origin.offset(0, dy / 2),
        PieceKind::Elephant => origin.offset(dx / 2, dy / 2),
        _ => None,
    }
}

/// Destinations reachable without regard to king safety.
///
/// Covers raw template, obstruction and friendly-occupancy stages. Used
/// on its own by the exposure oracle to ask whether a knight could land
/// on a king's square.
#[instrument(level = "trace", skip(board), fields(piece = %piece))]
pub fn candidate_destinations(piece: &Piece, board: &Board) -> Vec<Point> {
    let origin = piece.point();
    let raw = raw_targets(piece.kind(), piece.camp(), origin);

    let mut points: Vec<Point> = match piece.kind() {
        PieceKind::Rook => {
            let near = board.nearest_pieces(origin);
            raw.into_iter()
                .filter(|p| match Direction::between(origin, *p) {
                    // The blocker's own square stays reachable (capture)
                    Some(direction) => near.get(direction).is_none_or(|blocker| {
                        direction.distance(origin, *p) <= direction.distance(origin, blocker.point())
                    }),
                    None => false,
                })
                .collect()
        }
        PieceKind::Cannon => cannon_destinations(piece, board, raw),
        PieceKind::Knight | PieceKind::Elephant => raw
            .into_iter()
            .filter(|target| {
                leg_of(piece.kind(), origin, *target).is_some_and(|leg| !board.is_occupied(leg))
            })
            .collect(),
        _ => raw,
    };

    points.retain(|p| {
        board
            .piece_at(*p)
            .is_none_or(|occupant| occupant.camp() != piece.camp())
    });
    points
}

fn cannon_destinations(piece: &Piece, board: &Board, raw: Vec<Point>) -> Vec<Point> {
    let origin = piece.point();
    let near = board.nearest_pieces(origin);

    let mut points: Vec<Point> = raw
        .into_iter()
        .filter(|p| match Direction::between(origin, *p) {
            Some(direction) => near.get(direction).is_none_or(|screen| {
                direction.distance(origin, *p) < direction.distance(origin, screen.point())
            }),
            None => false,
        })
        .collect();

    for (direction, screen) in near.iter() {
        if let Some(target) = board.nearest(screen.point(), direction)
            && target.camp() != piece.camp()
        {
            points.push(target.point());
        }
    }
    points
}

/// Legal destinations of `piece` on `board`.
///
/// Every returned point passes [`simulate_move`] with a verdict other than
/// [`MoveVerdict::NotAllow`].
#[instrument(level = "trace", skip(board), fields(piece = %piece))]
pub fn legal_destinations(piece: &Piece, board: &Board) -> Vec<Point> {
    candidate_destinations(piece, board)
        .into_iter()
        .filter(|target| simulate_move(piece, *target, board) != MoveVerdict::NotAllow)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn p(x: i8, y: i8) -> Point {
        Point::new(x, y).unwrap()
    }

    fn set(points: Vec<Point>) -> HashSet<Point> {
        points.into_iter().collect()
    }

    #[test]
    fn test_king_template_clipped_to_palace() {
        let targets = set(raw_targets(PieceKind::King, Camp::Red, p(4, 10)));
        assert_eq!(targets, set(vec![p(5, 10), p(4, 9)]));
    }

    #[test]
    fn test_elephant_never_crosses_river() {
        let targets = set(raw_targets(PieceKind::Elephant, Camp::Red, p(3, 6)));
        assert_eq!(targets, set(vec![p(1, 8), p(5, 8)]));
    }

    #[test]
    fn test_pawn_gains_sideways_after_river() {
        assert_eq!(raw_targets(PieceKind::Pawn, Camp::Red, p(3, 7)), vec![p(3, 6)]);
        let crossed = set(raw_targets(PieceKind::Pawn, Camp::Red, p(3, 5)));
        assert_eq!(crossed, set(vec![p(3, 4), p(2, 5), p(4, 5)]));
        let black = set(raw_targets(PieceKind::Pawn, Camp::Black, p(1, 6)));
        assert_eq!(black, set(vec![p(1, 7), p(2, 6)]));
    }

    #[test]
    fn test_rook_stops_at_first_blocker() {
        let board = Board::opening();
        let rook = *board.piece_at(p(1, 10)).unwrap();
        let targets = set(candidate_destinations(&rook, &board));
        assert_eq!(targets, set(vec![p(1, 9), p(1, 8)]));
    }

    #[test]
    fn test_opening_cannon_captures_over_screen() {
        let board = Board::opening();
        let cannon = *board.piece_at(p(2, 8)).unwrap();
        let targets = set(legal_destinations(&cannon, &board));
        // Over the black cannon onto the black knight
        assert!(targets.contains(&p(2, 1)));
        // Screen itself is not a destination
        assert!(!targets.contains(&p(2, 3)));
        assert!(targets.contains(&p(2, 4)));
        assert!(targets.contains(&p(5, 8)));
        assert!(!targets.contains(&p(8, 8)));
        assert_eq!(targets.len(), 12);
    }

    #[test]
    fn test_knight_leg_blocked_in_opening() {
        let board = Board::opening();
        let knight = *board.piece_at(p(2, 10)).unwrap();
        let targets = set(legal_destinations(&knight, &board));
        assert_eq!(targets, set(vec![p(1, 8), p(3, 8)]));
    }

    #[test]
    fn test_elephant_eye_blocked() {
        let mut board = Board::empty();
        board.place(Camp::Red, PieceKind::King, p(5, 10));
        board.place(Camp::Black, PieceKind::King, p(4, 1));
        let id = board.place(Camp::Red, PieceKind::Elephant, p(5, 8));
        board.place(Camp::Black, PieceKind::Pawn, p(4, 7));
        let elephant = *board.get(id).unwrap();
        let targets = set(legal_destinations(&elephant, &board));
        assert_eq!(targets, set(vec![p(7, 6), p(3, 10), p(7, 10)]));
    }
}
