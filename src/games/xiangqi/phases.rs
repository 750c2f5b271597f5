//! Lifecycle status and outcome of a game.

use super::types::Camp;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session's game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for players to join and ready up.
    #[default]
    Init,
    /// Moves are being played.
    Playing,
    /// Play suspended; no moves accepted.
    Paused,
    /// Game over; see the context's outcome.
    Finished,
}

impl GameStatus {
    /// Whether moves are accepted.
    pub fn is_playing(self) -> bool {
        self == GameStatus::Playing
    }
}

/// How a finished game was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutcomeReason {
    /// The loser had no legal move.
    Checkmate,
    /// The loser gave up.
    Resignation,
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// Winning camp.
    pub winner: Camp,
    /// How the game was decided.
    pub reason: OutcomeReason,
}

impl Outcome {
    /// Creates an outcome.
    pub fn new(winner: Camp, reason: OutcomeReason) -> Self {
        Self { winner, reason }
    }

    /// The losing camp.
    pub fn loser(&self) -> Camp {
        self.winner.opponent()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wins by {}", self.winner, self.reason)
    }
}
