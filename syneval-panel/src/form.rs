//! Evaluation form model
//!
//! One `ChoiceControl` / `DatumContainer` pair per answer option, with the
//! pairing established once at construction. Highlight and checked flags
//! are atomics so the dispatcher, playback tasks, and embedders can share
//! the form freely.

use crate::playback::AudioClip;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One selectable option control (radio-button analogue)
///
/// Carries the option's submitted value; at most one control per form is
/// checked at a time, enforced by `EvalForm::select_option`.
pub struct ChoiceControl {
    value: u32,
    checked: AtomicBool,
}

impl ChoiceControl {
    /// Create an unchecked control carrying `value`
    pub fn new(value: u32) -> Self {
        Self {
            value,
            checked: AtomicBool::new(false),
        }
    }

    /// The value submitted when this control is checked
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether this control is checked
    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    pub(crate) fn set_checked(&self, checked: bool) {
        self.checked.store(checked, Ordering::SeqCst);
    }
}

/// Visual wrapper for one answer option and its paired clip
///
/// Carries two independent highlight flags: `selected` (kept in sync with
/// the paired control's checked state by the option selector) and `playing`
/// (set while the paired clip plays). Either, neither, or both may be on.
pub struct DatumContainer {
    clip: Arc<dyn AudioClip>,
    selected: AtomicBool,
    playing: AtomicBool,
    highlight_watcher: AtomicBool,
}

impl DatumContainer {
    /// Create a container wrapping `clip`, with no highlights
    pub fn new(clip: Arc<dyn AudioClip>) -> Self {
        Self {
            clip,
            selected: AtomicBool::new(false),
            playing: AtomicBool::new(false),
            highlight_watcher: AtomicBool::new(false),
        }
    }

    /// The paired audio clip embedded in this container
    pub fn clip(&self) -> &Arc<dyn AudioClip> {
        &self.clip
    }

    /// Whether the selected highlight is on
    pub fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    pub(crate) fn set_selected(&self, on: bool) {
        self.selected.store(on, Ordering::SeqCst);
    }

    /// Whether the playing highlight is on
    pub fn playing_highlight(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub(crate) fn set_playing_highlight(&self, on: bool) {
        self.playing.store(on, Ordering::SeqCst);
    }

    /// Claim the one-per-container highlight watcher slot
    ///
    /// Returns true exactly once per container.
    pub(crate) fn try_claim_highlight_watcher(&self) -> bool {
        !self.highlight_watcher.swap(true, Ordering::SeqCst)
    }
}

/// A choice control and its index-paired datum container
pub struct OptionPair {
    pub choice: ChoiceControl,
    pub datum: Arc<DatumContainer>,
}

/// The evaluation form: an ordered set of option pairs
pub struct EvalForm {
    pairs: Vec<OptionPair>,
}

impl EvalForm {
    /// Create a form from pre-built pairs
    pub fn new(pairs: Vec<OptionPair>) -> Self {
        Self { pairs }
    }

    /// Build a form from (value, clip) tuples, one pair per option
    pub fn from_options(options: Vec<(u32, Arc<dyn AudioClip>)>) -> Self {
        let pairs = options
            .into_iter()
            .map(|(value, clip)| OptionPair {
                choice: ChoiceControl::new(value),
                datum: Arc::new(DatumContainer::new(clip)),
            })
            .collect();
        Self { pairs }
    }

    /// Number of option pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the form has no options
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All pairs in document order
    pub fn pairs(&self) -> &[OptionPair] {
        &self.pairs
    }

    /// Pair at `index`
    pub fn pair(&self, index: usize) -> Option<&OptionPair> {
        self.pairs.get(index)
    }

    /// Datum container at `index`
    pub fn datum(&self, index: usize) -> Option<&Arc<DatumContainer>> {
        self.pairs.get(index).map(|p| &p.datum)
    }

    /// First clip in document order (the spacebar target)
    pub fn first_clip(&self) -> Option<&Arc<dyn AudioClip>> {
        self.pairs.first().map(|p| p.datum.clip())
    }

    /// Check the control at `index` and highlight its container, clearing
    /// all others
    ///
    /// An out-of-range index is a soft no-op: no state is touched and
    /// `false` is returned. After a successful call exactly one control is
    /// checked and exactly one container is selected, index-paired.
    pub fn select_option(&self, index: usize) -> bool {
        if index >= self.pairs.len() {
            return false;
        }

        for (i, pair) in self.pairs.iter().enumerate() {
            let on = i == index;
            pair.choice.set_checked(on);
            pair.datum.set_selected(on);
        }
        true
    }

    /// Index of the checked control, if any
    pub fn checked_index(&self) -> Option<usize> {
        self.pairs.iter().position(|p| p.choice.is_checked())
    }

    /// Value of the checked control, if any
    pub fn checked_value(&self) -> Option<u32> {
        self.pairs
            .iter()
            .find(|p| p.choice.is_checked())
            .map(|p| p.choice.value())
    }
}
