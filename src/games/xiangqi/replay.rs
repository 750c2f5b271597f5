//! Rebuilding a game from its manual.

use super::board::Board;
use super::notation::{ManualEntry, NotationError, parse_manual};
use super::phases::GameStatus;
use super::rules::{is_checkmated, legal_destinations};
use super::types::Camp;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Why a manual could not be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ReplayErrorKind {
    /// Entry belongs to the camp that is not on move.
    #[display("expected a {} move, found a {} move", expected, found)]
    CampOutOfTurn {
        /// Camp on move.
        expected: Camp,
        /// Camp recorded on the entry.
        found: Camp,
    },
    /// Entry text could not be resolved against the board.
    #[display("{}", source)]
    Unparseable {
        /// Underlying notation failure.
        source: NotationError,
    },
    /// Entry resolves to a move the rules forbid.
    #[display("'{}' is not a legal move", text)]
    IllegalMove {
        /// Offending entry text.
        text: String,
    },
}

/// Fatal replay failure: the manual is corrupt.
///
/// No partial board is ever returned alongside this error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Malformed manual at ply {}: {}", ply, kind)]
pub struct ReplayError {
    /// Zero-based index of the offending entry.
    pub ply: usize,
    /// What went wrong.
    #[error(source)]
    pub kind: ReplayErrorKind,
}

/// Position reached by replaying a manual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Camp that moved first.
    pub first_camp: Camp,
    /// Camp on move after the last replayed entry (the mover, if mated).
    pub current_camp: Camp,
    /// Live pieces.
    pub board: Board,
    /// `Some(Finished)` when the manual ends in checkmate.
    pub status: Option<GameStatus>,
}

/// Replays `entries` from the opening position.
///
/// The first entry's camp decides who moved first; an empty manual yields
/// the opening with red on move. Replay stops at the first checkmate.
#[instrument(skip(entries), fields(plies = entries.len()))]
pub fn replay_manual(entries: &[ManualEntry]) -> Result<Replay, ReplayError> {
    let first_camp = entries.first().map_or(Camp::Red, |e| e.camp);
    let mut current_camp = first_camp;
    let mut board = Board::opening();

    for (ply, entry) in entries.iter().enumerate() {
        if entry.camp != current_camp {
            warn!(ply, expected = %current_camp, found = %entry.camp, "Camp out of turn");
            return Err(ReplayError {
                ply,
                kind: ReplayErrorKind::CampOutOfTurn {
                    expected: current_camp,
                    found: entry.camp,
                },
            });
        }

        let mv = parse_manual(entry, &board).map_err(|source| {
            warn!(ply, text = %entry.text, error = %source, "Unparseable entry");
            ReplayError {
                ply,
                kind: ReplayErrorKind::Unparseable { source },
            }
        })?;

        if !legal_destinations(&mv.piece, &board).contains(&mv.target) {
            warn!(ply, text = %entry.text, "Illegal move in manual");
            return Err(ReplayError {
                ply,
                kind: ReplayErrorKind::IllegalMove {
                    text: entry.text.clone(),
                },
            });
        }

        board.remove_at(mv.target);
        board.relocate(mv.piece.id(), mv.target);
        debug!(ply, %mv, "Replayed entry");

        if is_checkmated(current_camp, &board) {
            info!(ply, winner = %current_camp, "Manual ends in checkmate");
            return Ok(Replay {
                first_camp,
                current_camp,
                board,
                status: Some(GameStatus::Finished),
            });
        }
        current_camp = current_camp.opponent();
    }

    Ok(Replay {
        first_camp,
        current_camp,
        board,
        status: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manual_is_opening() {
        let replay = replay_manual(&[]).unwrap();
        assert_eq!(replay.board, Board::opening());
        assert_eq!(replay.first_camp, Camp::Red);
        assert_eq!(replay.current_camp, Camp::Red);
        assert_eq!(replay.status, None);
    }

    #[test]
    fn test_out_of_turn_is_fatal() {
        let entries = [
            ManualEntry::new(Camp::Red, "炮2平5"),
            ManualEntry::new(Camp::Red, "马2进3"),
        ];
        let err = replay_manual(&entries).unwrap_err();
        assert_eq!(err.ply, 1);
        assert!(matches!(err.kind, ReplayErrorKind::CampOutOfTurn { .. }));
    }

    #[test]
    fn test_unreachable_target_is_illegal() {
        // Rook cannot jump its own pawn
        let entries = [ManualEntry::new(Camp::Red, "车9进5")];
        let err = replay_manual(&entries).unwrap_err();
        assert_eq!(err.ply, 0);
        assert!(matches!(err.kind, ReplayErrorKind::IllegalMove { .. }));
    }
}
