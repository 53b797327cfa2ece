//! Shared panel state
//!
//! Thread-safe shared state for coordination between the input dispatcher,
//! playback components, and embedders. The screen mode lives here and is set
//! explicitly at screen transitions; nothing reads it from an ambient global.

use syneval_common::events::{EventBus, ScreenMode, SynevalEvent};
use tokio::sync::{broadcast, RwLock};

/// Shared state accessible by all components
///
/// Uses RwLock for concurrent read access with rare writes.
pub struct SharedState {
    /// Screen currently shown (keyboard shortcuts active only on Eval)
    screen: RwLock<ScreenMode>,

    /// Event broadcaster for panel events
    event_bus: EventBus,
}

impl SharedState {
    /// Create new shared state starting on the intro screen
    pub fn new(event_capacity: usize) -> Self {
        Self {
            screen: RwLock::new(ScreenMode::Intro),
            event_bus: EventBus::new(event_capacity),
        }
    }

    /// Get the current screen mode
    pub async fn screen(&self) -> ScreenMode {
        *self.screen.read().await
    }

    /// Set the current screen mode
    ///
    /// Emits ScreenChanged when the mode actually changes.
    pub async fn set_screen(&self, screen: ScreenMode) {
        let mut current = self.screen.write().await;
        if *current != screen {
            *current = screen;
            self.event_bus.emit_lossy(SynevalEvent::ScreenChanged {
                screen,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: SynevalEvent) {
        self.event_bus.emit_lossy(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<SynevalEvent> {
        self.event_bus.subscribe()
    }

    /// Access the underlying event bus
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
