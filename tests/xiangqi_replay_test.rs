//! Tests for rebuilding positions from manuals.

use strictly_xiangqi::{
    Board, Camp, GameStatus, ManualEntry, NotationError, PieceKind, Point, ReplayErrorKind,
    replay_manual,
};

fn p(x: i8, y: i8) -> Point {
    Point::new(x, y).unwrap()
}

fn manual(first: Camp, texts: &[&str]) -> Vec<ManualEntry> {
    let mut camp = first;
    texts
        .iter()
        .map(|text| {
            let entry = ManualEntry::new(camp, *text);
            camp = camp.opponent();
            entry
        })
        .collect()
}

fn kind_at(board: &Board, point: Point) -> Option<(Camp, PieceKind)> {
    board.piece_at(point).map(|piece| (piece.camp(), piece.kind()))
}

#[test]
fn test_empty_manual() {
    let replay = replay_manual(&[]).unwrap();
    assert_eq!(replay.board, Board::opening());
    assert_eq!(replay.current_camp, Camp::Red);
    assert_eq!(replay.status, None);
}

#[test]
fn test_opening_sequence() {
    let entries = manual(
        Camp::Red,
        &[
            "炮2平5", "马八进七", "马2进3", "车九平八", "车1平2", "马二进三", "兵7进1", "卒七进一",
            "车2进4", "炮八平九",
        ],
    );
    let replay = replay_manual(&entries).unwrap();
    let board = &replay.board;

    assert_eq!(replay.first_camp, Camp::Red);
    assert_eq!(replay.current_camp, Camp::Red);
    assert_eq!(replay.status, None);
    assert_eq!(board.len(), 32);

    assert_eq!(kind_at(board, p(5, 8)), Some((Camp::Red, PieceKind::Cannon)));
    assert_eq!(kind_at(board, p(7, 3)), Some((Camp::Black, PieceKind::Knight)));
    assert_eq!(kind_at(board, p(7, 8)), Some((Camp::Red, PieceKind::Knight)));
    assert_eq!(kind_at(board, p(8, 1)), Some((Camp::Black, PieceKind::Rook)));
    assert_eq!(kind_at(board, p(8, 6)), Some((Camp::Red, PieceKind::Rook)));
    assert_eq!(kind_at(board, p(3, 3)), Some((Camp::Black, PieceKind::Knight)));
    assert_eq!(kind_at(board, p(3, 6)), Some((Camp::Red, PieceKind::Pawn)));
    assert_eq!(kind_at(board, p(7, 5)), Some((Camp::Black, PieceKind::Pawn)));
    assert_eq!(kind_at(board, p(9, 3)), Some((Camp::Black, PieceKind::Cannon)));
    assert_eq!(board.piece_at(p(8, 10)), None);
}

#[test]
fn test_black_may_move_first() {
    let entries = manual(Camp::Black, &["马八进七", "炮2平5"]);
    let replay = replay_manual(&entries).unwrap();
    assert_eq!(replay.first_camp, Camp::Black);
    assert_eq!(replay.current_camp, Camp::Black);
}

#[test]
fn test_capture_removes_piece() {
    let entries = manual(Camp::Red, &["炮2平5", "车九进一", "炮5进4"]);
    let replay = replay_manual(&entries).unwrap();
    assert_eq!(replay.board.len(), 31);
    assert_eq!(kind_at(&replay.board, p(5, 4)), Some((Camp::Red, PieceKind::Cannon)));
    assert_eq!(replay.current_camp, Camp::Black);
}

#[test]
fn test_checkmate_finishes_replay() {
    let entries = manual(
        Camp::Red,
        &["炮2平5", "车九进一", "炮5进4", "车九退一", "炮8进3", "车九进一", "炮8平5"],
    );
    let replay = replay_manual(&entries).unwrap();
    assert_eq!(replay.status, Some(GameStatus::Finished));
    assert_eq!(replay.current_camp, Camp::Red);
}

#[test]
fn test_unparseable_entry_is_fatal() {
    let entries = manual(Camp::Red, &["炮2平5", "马五进四"]);
    let err = replay_manual(&entries).unwrap_err();
    assert_eq!(err.ply, 1);
    assert!(matches!(
        err.kind,
        ReplayErrorKind::Unparseable {
            source: NotationError::MissingPiece { .. }
        }
    ));
    assert!(err.to_string().contains("ply 1"));
}

#[test]
fn test_self_check_is_fatal() {
    // The red cannon on the centre file has no screen; an elephant
    // stepping in front of the black king would become one.
    let entries = manual(Camp::Red, &["炮2平5", "车九进一", "炮5进4", "象三进五"]);
    let err = replay_manual(&entries).unwrap_err();
    assert_eq!(err.ply, 3);
    assert!(matches!(err.kind, ReplayErrorKind::IllegalMove { .. }));
}

#[test]
fn test_hobbled_knight_is_fatal() {
    let entries = manual(Camp::Red, &["马2进4"]);
    let err = replay_manual(&entries).unwrap_err();
    assert_eq!(err.ply, 0);
    assert!(matches!(err.kind, ReplayErrorKind::IllegalMove { .. }));
}
