//! Typed session events and their synchronous dispatch.

use crate::context::{GameContext, User, UserId};
use crate::games::xiangqi::{Camp, Move, Outcome, Piece};
use serde::Serialize;
use tracing::{debug, instrument};

/// Something that happened to a session.
///
/// Emitted only for committed state changes, in the order they occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// A piece was selected.
    PieceSelected {
        /// The selected piece.
        piece: Piece,
    },
    /// The selection was dropped.
    SelectionCancelled,
    /// A piece moved.
    PieceMoved {
        /// The committed move.
        movement: Move,
    },
    /// A piece was captured.
    PieceCaptured {
        /// The captured piece.
        piece: Piece,
    },
    /// The context changed in a way not covered by another event.
    ContextChanged,
    /// Play began.
    GameStarted {
        /// Camp moving first.
        first_camp: Camp,
    },
    /// Play was paused or resumed.
    GamePaused {
        /// Whether play is now paused.
        paused: bool,
    },
    /// Moves were taken back.
    GameUndone {
        /// Number of manual entries removed.
        removed: usize,
    },
    /// A player resigned.
    GameGivenUp {
        /// Camp that resigned.
        camp: Camp,
    },
    /// The game ended or the session was abandoned.
    GameOver {
        /// Result, absent when everyone left.
        outcome: Option<Outcome>,
    },
    /// The game was reset to its initial state.
    GameReset,
    /// A user took a seat.
    PlayerJoined {
        /// Seat taken.
        camp: Camp,
        /// Joining user.
        user: User,
    },
    /// A user left their seat.
    PlayerLeft {
        /// Seat vacated.
        camp: Camp,
        /// Leaving user.
        user: User,
    },
    /// A player readied up or cancelled.
    PlayerReadyChanged {
        /// Seat of the player.
        camp: Camp,
        /// New ready flag.
        ready: bool,
    },
    /// The players swapped seats.
    CampExchanged,
    /// A user action was rejected or the stored manual is corrupt.
    OperationError {
        /// Human-readable reason.
        message: String,
        /// User whose action failed, if any.
        user: Option<UserId>,
    },
}

/// Callback invoked for every event with the context after the change.
pub type Listener = Box<dyn FnMut(&SessionEvent, &GameContext) + Send>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionId(u64);

/// Ordered, synchronous publish/subscribe.
///
/// Listeners must not call back into the session that owns the bus.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        debug!(?id, "Listener subscribed");
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    /// Drops every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener in subscription order.
    #[instrument(level = "debug", skip(self, context), fields(listeners = self.listeners.len()))]
    pub fn emit(&mut self, event: &SessionEvent, context: &GameContext) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event, context);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_emit_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |_, _| seen.lock().unwrap().push(tag)));
        }
        bus.emit(&SessionEvent::ContextChanged, &GameContext::new());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(Box::new(|_, _| {}));
        assert_eq!(bus.len(), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
    }
}
