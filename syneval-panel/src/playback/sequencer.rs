//! Sequential playback over the form's datum containers
//!
//! Plays every paired clip in ascending index order, one at a time, with a
//! fixed pause between clips: a bounded loop that awaits each clip's end,
//! with a cancellation token checked at every suspension point so a running
//! sequence can be interrupted cleanly.

use crate::error::{Error, Result};
use crate::form::EvalForm;
use crate::playback::trigger::play_paired_audio;
use std::sync::Arc;
use std::time::Duration;
use syneval_common::events::{EventBus, SynevalEvent};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Plays all paired clips of a form in index order
pub struct SequentialPlayer {
    form: Arc<EvalForm>,
    inter_clip_delay: Duration,
    cancel: CancellationToken,
    event_bus: EventBus,
}

impl SequentialPlayer {
    /// Create a player over `form` with the given inter-clip pause
    pub fn new(form: Arc<EvalForm>, inter_clip_delay: Duration, event_bus: EventBus) -> Self {
        Self {
            form,
            inter_clip_delay,
            cancel: CancellationToken::new(),
            event_bus,
        }
    }

    /// Token that interrupts a running sequence when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Play every clip from `start_index` to the end of the form
    ///
    /// `start_index >= len` is a no-op. Clip N+1 never starts before clip
    /// N's end notification plus the configured pause. Cancellation stops
    /// the chain at the next suspension point without playing further
    /// clips.
    pub async fn play_all(&self, start_index: usize) -> Result<()> {
        let count = self.form.len();
        if start_index >= count {
            return Ok(());
        }

        debug!(start_index, count, "starting sequential playback");
        self.event_bus.emit_lossy(SynevalEvent::SequenceStarted {
            start_index,
            timestamp: chrono::Utc::now(),
        });

        for (index, pair) in self.form.pairs().iter().enumerate().skip(start_index) {
            if self.cancel.is_cancelled() {
                return self.cancelled_at(index);
            }

            let mut ended = play_paired_audio(&pair.datum)?;
            self.event_bus.emit_lossy(SynevalEvent::ClipStarted {
                index,
                timestamp: chrono::Utc::now(),
            });

            tokio::select! {
                _ = self.cancel.cancelled() => return self.cancelled_at(index),
                received = ended.recv() => match received {
                    // A lagged receiver still means the clip reached its end
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(Error::Playback(format!(
                            "clip {} dropped before its end notification",
                            index
                        )));
                    }
                },
            }

            self.event_bus.emit_lossy(SynevalEvent::ClipFinished {
                index,
                timestamp: chrono::Utc::now(),
            });

            if index + 1 < count {
                tokio::select! {
                    _ = self.cancel.cancelled() => return self.cancelled_at(index + 1),
                    _ = tokio::time::sleep(self.inter_clip_delay) => {}
                }
            }
        }

        debug!("sequential playback complete");
        self.event_bus.emit_lossy(SynevalEvent::SequenceCompleted {
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    fn cancelled_at(&self, index: usize) -> Result<()> {
        debug!(index, "sequential playback cancelled");
        self.event_bus.emit_lossy(SynevalEvent::SequenceCancelled {
            index,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }
}
