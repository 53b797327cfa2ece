//! Playable clip abstraction
//!
//! The panel never decodes or renders audio itself; a clip is an external
//! resource the panel can start and observe. `SimClip` is the bundled
//! implementation, a fixed-duration timer on tokio time, used by the demo
//! binary and by tests.

use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// A playable audio clip
///
/// Media-element semantics: `play` starts playback, resumes a clip that is
/// already playing, and restarts a clip that has reached its natural end.
/// Each natural end is announced once on the `ended` channel; subscribers
/// registered at any time receive all future notifications.
pub trait AudioClip: Send + Sync {
    /// Begin or resume playback
    fn play(&self) -> Result<()>;

    /// Whether the clip is currently playing
    fn is_playing(&self) -> bool;

    /// Subscribe to natural-end notifications
    fn subscribe_ended(&self) -> broadcast::Receiver<()>;
}

/// Simulated clip with a fixed playback duration
///
/// Playback is a tokio timer: `play` spawns a task that waits out the
/// duration and then broadcasts `ended`. Calling `play` while the timer is
/// running is a no-op (the clip keeps playing); calling it after the timer
/// fired starts a fresh run.
pub struct SimClip {
    duration: Duration,
    playing: Arc<AtomicBool>,
    ended_tx: broadcast::Sender<()>,
}

impl SimClip {
    /// Create a clip that plays for `duration`
    pub fn new(duration: Duration) -> Self {
        let (ended_tx, _) = broadcast::channel(8);
        Self {
            duration,
            playing: Arc::new(AtomicBool::new(false)),
            ended_tx,
        }
    }

    /// Configured playback duration
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl AudioClip for SimClip {
    fn play(&self) -> Result<()> {
        // Already playing: keep the current run (resume semantics)
        if self.playing.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let playing = Arc::clone(&self.playing);
        let ended_tx = self.ended_tx.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            playing.store(false, Ordering::SeqCst);
            let _ = ended_tx.send(());
        });
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn subscribe_ended(&self) -> broadcast::Receiver<()> {
        self.ended_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_play_fires_ended_after_duration() {
        let clip = SimClip::new(Duration::from_millis(1000));
        let mut ended = clip.subscribe_ended();

        clip.play().unwrap();
        assert!(clip.is_playing());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        ended.recv().await.unwrap();
        assert!(!clip.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_while_playing_does_not_double_fire() {
        let clip = SimClip::new(Duration::from_millis(1000));
        let mut ended = clip.subscribe_ended();

        clip.play().unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        clip.play().unwrap();

        tokio::time::sleep(Duration::from_millis(2000)).await;
        ended.recv().await.unwrap();
        assert!(ended.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_after_end_fires_again() {
        let clip = SimClip::new(Duration::from_millis(100));
        let mut ended = clip.subscribe_ended();

        clip.play().unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        ended.recv().await.unwrap();

        clip.play().unwrap();
        assert!(clip.is_playing());
        tokio::time::sleep(Duration::from_millis(150)).await;
        ended.recv().await.unwrap();
    }
}
