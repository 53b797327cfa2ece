//! Paired audio trigger
//!
//! Starts the clip embedded in a datum container and manages the
//! container's playing highlight for the duration of playback.

use crate::error::Result;
use crate::form::DatumContainer;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Start playback of the clip paired with `container`
///
/// Sets the playing highlight immediately and returns a fresh `ended`
/// receiver for composition (the sequencer consumes exactly one
/// notification from it).
///
/// The first time a container is ever passed in, a persistent watcher task
/// is installed that clears the playing highlight on every future natural
/// end of that clip. The watcher is never removed; there is exactly one per
/// container, so repeated triggering does not accumulate listeners.
pub fn play_paired_audio(container: &Arc<DatumContainer>) -> Result<broadcast::Receiver<()>> {
    let ended = container.clip().subscribe_ended();

    container.clip().play()?;
    container.set_playing_highlight(true);

    if container.try_claim_highlight_watcher() {
        let watched = Arc::clone(container);
        let mut rx = watched.clip().subscribe_ended();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(()) => watched.set_playing_highlight(false),
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        // Missed end notifications still mean playback stopped
                        watched.set_playing_highlight(false);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    Ok(ended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{AudioClip, SimClip};
    use std::time::Duration;

    fn test_container(duration_ms: u64) -> Arc<DatumContainer> {
        let clip: Arc<dyn AudioClip> =
            Arc::new(SimClip::new(Duration::from_millis(duration_ms)));
        Arc::new(DatumContainer::new(clip))
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_set_immediately_and_cleared_on_end() {
        let container = test_container(1000);

        let mut ended = play_paired_audio(&container).unwrap();
        assert!(container.playing_highlight());
        assert!(container.clip().is_playing());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        ended.recv().await.unwrap();

        // Let the watcher task observe the end
        tokio::task::yield_now().await;
        assert!(!container.playing_highlight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_clears_on_every_replay_end() {
        let container = test_container(100);

        // First play installs the watcher
        let mut ended = play_paired_audio(&container).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        ended.recv().await.unwrap();
        tokio::task::yield_now().await;
        assert!(!container.playing_highlight());

        // Second play reuses it
        let mut ended = play_paired_audio(&container).unwrap();
        assert!(container.playing_highlight());
        tokio::time::sleep(Duration::from_millis(150)).await;
        ended.recv().await.unwrap();
        tokio::task::yield_now().await;
        assert!(!container.playing_highlight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_claimed_once() {
        let container = test_container(100);

        let _ = play_paired_audio(&container).unwrap();
        let _ = play_paired_audio(&container).unwrap();

        // The claim flag was consumed by the first call
        assert!(!container.try_claim_highlight_watcher());
    }
}
