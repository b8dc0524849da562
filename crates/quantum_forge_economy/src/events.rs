//! # Economy Notifications
//!
//! Notifications raised by the economy core for UI and scene collaborators.
//!
//! ```text
//! ┌─────────────┐  ResourceChanged   ┌─────────────┐
//! │   Ledger    │───────────────────>│             │
//! ├─────────────┤  RecipeCompleted   │  Economy    │   drain_events()
//! │  Stations   │───────────────────>│  (buffer)   │──────────────────> UI
//! ├─────────────┤  PuzzleSolved      │             │   or EventBus
//! │ PuzzleBoard │───────────────────>│             │
//! └─────────────┘                    └─────────────┘
//! ```
//!
//! Events are plain values. Components buffer them and the facade hands them
//! out; nothing is broadcast implicitly.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::building::BuildingArchetype;
use crate::kind::ResourceKind;
use crate::station::StationId;

/// A notification emitted by the economy core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EconomyEvent {
    /// A ledger balance changed.
    ResourceChanged {
        /// The kind that changed.
        kind: ResourceKind,
        /// New total (not delta).
        total: u32,
    },
    /// A building was placed and owns a fresh idle station.
    BuildingPlaced {
        /// The new station.
        station: StationId,
        /// What was built.
        archetype: BuildingArchetype,
    },
    /// A station reserved inputs and began crafting.
    RecipeStarted {
        /// Recipe identifier.
        recipe_id: String,
        /// Station running it.
        station: StationId,
    },
    /// A station finished a recipe and deposited its outputs.
    RecipeCompleted {
        /// Recipe identifier.
        recipe_id: String,
        /// Station that ran it.
        station: StationId,
    },
    /// The puzzle board matched the target pattern. Raised once per session.
    PuzzleSolved,
}

/// Bounded channel carrying economy events to collaborators.
pub struct EventBus {
    sender: Sender<EconomyEvent>,
    receiver: Receiver<EconomyEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight. Further events are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<EconomyEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: EconomyEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "economy event channel full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<EconomyEvent>,
}

impl EventReceiver {
    /// Receives all pending events without blocking.
    #[inline]
    #[must_use]
    pub fn drain(&self) -> Vec<EconomyEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event without blocking.
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<EconomyEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
