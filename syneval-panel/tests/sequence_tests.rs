//! Sequential playback integration tests
//!
//! Runs the sequencer over simulated clips on paused tokio time, so clip
//! durations and inter-clip pauses are exact and the tests finish
//! instantly.

use std::sync::Arc;
use std::time::Duration;
use syneval_common::events::{EventBus, SynevalEvent};
use syneval_panel::{AudioClip, EvalForm, SequentialPlayer, SimClip};
use tokio::time::Instant;

const CLIP_MS: u64 = 1000;
const GAP_MS: u64 = 300;

fn test_form(count: usize) -> Arc<EvalForm> {
    let options = (0..count)
        .map(|i| {
            let clip: Arc<dyn AudioClip> =
                Arc::new(SimClip::new(Duration::from_millis(CLIP_MS)));
            (i as u32, clip)
        })
        .collect();
    Arc::new(EvalForm::from_options(options))
}

fn test_player(form: &Arc<EvalForm>, bus: &EventBus) -> Arc<SequentialPlayer> {
    Arc::new(SequentialPlayer::new(
        Arc::clone(form),
        Duration::from_millis(GAP_MS),
        bus.clone(),
    ))
}

/// Drain bus events until SequenceCompleted or SequenceCancelled, stamping
/// each with the paused-clock instant it was observed at.
async fn collect_until_done(
    rx: &mut tokio::sync::broadcast::Receiver<SynevalEvent>,
) -> Vec<(SynevalEvent, Instant)> {
    let mut events = Vec::new();
    loop {
        let event = rx.recv().await.expect("event stream closed early");
        let done = matches!(
            event,
            SynevalEvent::SequenceCompleted { .. } | SynevalEvent::SequenceCancelled { .. }
        );
        events.push((event, Instant::now()));
        if done {
            return events;
        }
    }
}

fn clip_indices<'a>(
    events: &'a [(SynevalEvent, Instant)],
    pick: fn(&SynevalEvent) -> Option<usize>,
) -> Vec<(usize, Instant)> {
    events
        .iter()
        .filter_map(|(e, at)| pick(e).map(|i| (i, *at)))
        .collect()
}

fn started(event: &SynevalEvent) -> Option<usize> {
    match event {
        SynevalEvent::ClipStarted { index, .. } => Some(*index),
        _ => None,
    }
}

fn finished(event: &SynevalEvent) -> Option<usize> {
    match event {
        SynevalEvent::ClipFinished { index, .. } => Some(*index),
        _ => None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_play_all_runs_clips_in_order_with_fixed_gap() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();
    let form = test_form(3);
    let player = test_player(&form, &bus);

    tokio::spawn(async move { player.play_all(0).await.unwrap() });

    let events = collect_until_done(&mut rx).await;

    let starts = clip_indices(&events, started);
    let finishes = clip_indices(&events, finished);
    assert_eq!(
        starts.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(
        finishes.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    // Each clip starts only after the previous end plus the fixed pause
    for i in 0..2 {
        let gap = starts[i + 1].1 - finishes[i].1;
        assert_eq!(gap, Duration::from_millis(GAP_MS));
    }

    // Chain stops after the last clip
    assert!(matches!(
        events.last().unwrap().0,
        SynevalEvent::SequenceCompleted { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_play_all_never_overlaps_clips() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();
    let form = test_form(2);
    let player = test_player(&form, &bus);

    let check_form = Arc::clone(&form);
    tokio::spawn(async move { player.play_all(0).await.unwrap() });

    let mut saw_second_start = false;
    loop {
        match rx.recv().await.unwrap() {
            SynevalEvent::ClipStarted { index: 1, .. } => {
                saw_second_start = true;
                assert!(!check_form.datum(0).unwrap().clip().is_playing());
            }
            SynevalEvent::SequenceCompleted { .. } => break,
            _ => {}
        }
    }
    assert!(saw_second_start);
}

#[tokio::test(start_paused = true)]
async fn test_play_all_from_count_is_noop() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();
    let form = test_form(3);
    let player = test_player(&form, &bus);

    player.play_all(3).await.unwrap();

    assert!(rx.try_recv().is_err());
    for pair in form.pairs() {
        assert!(!pair.datum.clip().is_playing());
        assert!(!pair.datum.playing_highlight());
    }
}

#[tokio::test(start_paused = true)]
async fn test_play_all_from_middle_skips_earlier_clips() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();
    let form = test_form(3);
    let player = test_player(&form, &bus);

    tokio::spawn(async move { player.play_all(1).await.unwrap() });

    let events = collect_until_done(&mut rx).await;
    let starts: Vec<usize> = clip_indices(&events, started)
        .iter()
        .map(|(i, _)| *i)
        .collect();
    assert_eq!(starts, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_clip_stops_the_chain() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();
    let form = test_form(3);
    let player = test_player(&form, &bus);
    let cancel = player.cancel_token();

    tokio::spawn(async move { player.play_all(0).await.unwrap() });

    // Cancel mid-way through the first clip
    tokio::time::sleep(Duration::from_millis(500)).await;
    cancel.cancel();

    let events = collect_until_done(&mut rx).await;
    assert!(matches!(
        events.last().unwrap().0,
        SynevalEvent::SequenceCancelled { index: 0, .. }
    ));
    let starts = clip_indices(&events, started);
    assert_eq!(starts.len(), 1, "no further clip may start after cancel");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_gap_stops_before_next_clip() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();
    let form = test_form(3);
    let player = test_player(&form, &bus);
    let cancel = player.cancel_token();

    tokio::spawn(async move { player.play_all(0).await.unwrap() });

    // First clip ends at 1000ms; cancel inside the 300ms pause
    tokio::time::sleep(Duration::from_millis(1100)).await;
    cancel.cancel();

    let events = collect_until_done(&mut rx).await;
    let starts: Vec<usize> = clip_indices(&events, started)
        .iter()
        .map(|(i, _)| *i)
        .collect();
    let finishes: Vec<usize> = clip_indices(&events, finished)
        .iter()
        .map(|(i, _)| *i)
        .collect();
    assert_eq!(starts, vec![0]);
    assert_eq!(finishes, vec![0]);
    assert!(matches!(
        events.last().unwrap().0,
        SynevalEvent::SequenceCancelled { index: 1, .. }
    ));
}
