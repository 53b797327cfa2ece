//! Event types for the SynEval event system
//!
//! # Architecture
//!
//! SynEval uses hybrid communication:
//! - **EventBus** (tokio::broadcast): One-to-many event broadcasting
//! - **Shared state** (Arc<RwLock<T>>): Read-heavy access
//!
//! Every observable state change on the evaluation panel is announced on the
//! bus so that embedders (demo binary, tests, future UI layers) can follow
//! along without polling.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Screen currently shown to the evaluator
///
/// Keyboard shortcuts are only active on the `Eval` screen. The mode is set
/// explicitly by the embedding application at screen transitions; components
/// never consult an ambient global for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenMode {
    /// Landing page with test instructions
    Intro,
    /// Labelled example clips for calibration
    Examples,
    /// An evaluation page (keyboard shortcuts active)
    Eval,
    /// Completion page after the last task
    Thanks,
}

/// SynEval event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SynevalEvent {
    /// Screen mode changed
    ScreenChanged {
        screen: ScreenMode,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An option was selected on the current form
    OptionSelected {
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A paired clip started playing
    ClipStarted {
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A paired clip finished playing
    ClipFinished {
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sequential playback started
    SequenceStarted {
        start_index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sequential playback reached the end of the form
    SequenceCompleted {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sequential playback was cancelled before the end of the form
    SequenceCancelled {
        /// Index the sequence stopped at
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A choice was recorded for a page
    ChoiceSubmitted {
        session_id: Uuid,
        page: usize,
        choice: u32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Submission attempted with no option checked
    SelectionRequired {
        page: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session advanced to the next page
    PageAdvanced {
        page: usize,
        total_pages: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Every page has a recorded choice
    SessionCompleted {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast event bus for SynEval events
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SynevalEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    ///
    /// Events beyond `capacity` that no subscriber has consumed yet are
    /// dropped oldest-first.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SynevalEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SynevalEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<SynevalEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the no-subscriber case
    ///
    /// For fire-and-forget paths where nobody listening is acceptable.
    pub fn emit_lossy(&self, event: SynevalEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
