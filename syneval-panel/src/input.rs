//! Keyboard input dispatch
//!
//! Translates key codes into panel actions while the evaluation screen is
//! active: digits select options, space replays the first clip, return
//! submits the form. Everything else is ignored. The dispatcher holds typed
//! references to its collaborators; nothing is looked up ambiently.

use crate::error::{Error, Result};
use crate::form::EvalForm;
use crate::session::{SessionManager, SubmitOutcome};
use crate::state::SharedState;
use std::sync::Arc;
use syneval_common::events::{ScreenMode, SynevalEvent};
use tokio::sync::RwLock;
use tracing::trace;

/// Significant key codes (browser keydown values)
pub mod keys {
    /// Return/enter key
    pub const RETURN: u32 = 13;
    /// Spacebar
    pub const SPACE: u32 = 32;
    /// Digit row "1"
    pub const DIGIT_1: u32 = 49;
    /// Digit row "9"
    pub const DIGIT_9: u32 = 57;
}

/// Routes key codes to option selection, playback, and submission
pub struct InputDispatcher {
    state: Arc<SharedState>,
    session: Arc<SessionManager>,
    form: RwLock<Arc<EvalForm>>,
}

impl InputDispatcher {
    /// Create a dispatcher over the given collaborators
    pub fn new(
        state: Arc<SharedState>,
        session: Arc<SessionManager>,
        form: Arc<EvalForm>,
    ) -> Self {
        Self {
            state,
            session,
            form: RwLock::new(form),
        }
    }

    /// Swap in the form for a new page
    pub async fn attach_form(&self, form: Arc<EvalForm>) {
        *self.form.write().await = form;
    }

    /// The currently attached form
    pub async fn form(&self) -> Arc<EvalForm> {
        Arc::clone(&*self.form.read().await)
    }

    /// Handle one keydown
    ///
    /// No-op unless the current screen is `Eval`. Returns the submission
    /// outcome when the key was return, so callers can react to page
    /// changes. No debouncing: every call independently re-triggers its
    /// action.
    pub async fn handle_key(&self, code: u32) -> Result<Option<SubmitOutcome>> {
        if self.state.screen().await != ScreenMode::Eval {
            return Ok(None);
        }

        match code {
            keys::DIGIT_1..=keys::DIGIT_9 => {
                let index = (code - keys::DIGIT_1) as usize;
                let form = self.form().await;
                if form.select_option(index) {
                    self.state.broadcast_event(SynevalEvent::OptionSelected {
                        index,
                        timestamp: chrono::Utc::now(),
                    });
                } else {
                    trace!(index, "selection index out of range, ignored");
                }
                Ok(None)
            }
            keys::SPACE => {
                // Plays the first clip in document order, regardless of the
                // current selection; resume/restart follows clip semantics.
                let form = self.form().await;
                let clip = form
                    .first_clip()
                    .ok_or_else(|| Error::NotFound("form has no audio clip".to_string()))?;
                clip.play()?;
                Ok(None)
            }
            keys::RETURN => {
                let form = self.form().await;
                let outcome = self.session.submit_choice(form.checked_value()).await?;
                Ok(Some(outcome))
            }
            _ => Ok(None),
        }
    }
}
