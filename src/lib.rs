//! Strictly Xiangqi library - Chinese chess rules and sessions
//!
//! This library provides the rule engine, move-record notation and a
//! multiplayer session state machine for Chinese chess (xiangqi).
//!
//! # Architecture
//!
//! - **Rules**: movement templates, obstruction, king safety and checkmate
//! - **Notation**: encoding and decoding of manual entries such as `炮2平5`
//! - **Replay**: rebuilding a position from a manual
//! - **Session**: seats, turns, undo and lifecycle, with typed events
//!
//! # Example
//!
//! ```
//! use strictly_xiangqi::{Camp, GameSession, Point, User};
//!
//! let mut session = GameSession::new("table-1".to_string());
//! session.join(User::new("alice", "Alice"));
//! session.join(User::new("bo", "Bo"));
//! session.ready_or_cancel_ready("alice", true, Some(Camp::Red));
//! session.ready_or_cancel_ready("bo", true, Some(Camp::Red));
//! assert!(session.start());
//!
//! // Select the red cannon, then move it to the centre file
//! let cannon = Point::new(2, 8).unwrap();
//! session.move_or_select("alice", cannon).unwrap();
//! session.move_or_select("alice", Point::new(5, 8).unwrap()).unwrap();
//! assert_eq!(session.context().manual[0].text, "炮8平5");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod context;
mod error;
mod events;
mod games;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, SessionConfig};

// Crate-level exports - Session context
pub use context::{Animation, GameContext, Message, Player, Players, User, UserId};

// Crate-level exports - Errors
pub use error::{ActionError, SessionError};

// Crate-level exports - Events
pub use events::{EventBus, Listener, SessionEvent, SubscriptionId};

// Crate-level exports - Session management
pub use session::{GameSession, SessionId, SessionManager};

// Crate-level exports - Game types (xiangqi)
pub use games::xiangqi::rules;
pub use games::xiangqi::{
    Board, Camp, Direction, FILES, GameStatus, ManualEntry, Move, MoveVerdict, NearestPieces,
    NotationError, Outcome, OutcomeReason, Piece, PieceId, PieceKind, Point, RANKS, Replay,
    ReplayError, ReplayErrorKind, in_check, is_checkmated, is_king_exposed, legal_destinations,
    parse_manual, record_manual, replay_manual, simulate_move,
};
