//! Game rules for Chinese chess.
//!
//! This module contains pure functions over a [`Board`](super::Board):
//! move generation in [`movegen`] and king safety in [`check`]. Both are
//! free of session state so they can be reused by notation replay.

pub mod check;
pub mod movegen;

pub use check::{MoveVerdict, in_check, is_checkmated, is_king_exposed, simulate_move};
pub use movegen::{candidate_destinations, leg_of, legal_destinations, raw_targets};
