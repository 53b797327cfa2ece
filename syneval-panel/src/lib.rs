//! # SynEval Evaluation Panel Library (syneval-panel)
//!
//! Keyboard-driven listening-test screen engine.
//!
//! **Purpose:** Map key codes onto option selection, paired clip playback,
//! and form submission; play a page's clips sequentially with a fixed
//! inter-clip pause; track the multi-page session flow in memory.
//!
//! **Architecture:** Typed form model shared across tokio tasks, with a
//! broadcast event bus announcing every observable state change.

pub mod config;
pub mod error;
pub mod form;
pub mod input;
pub mod playback;
pub mod session;
pub mod state;

pub use config::PanelConfig;
pub use error::{Error, Result};
pub use form::{ChoiceControl, DatumContainer, EvalForm, OptionPair};
pub use input::InputDispatcher;
pub use playback::{AudioClip, SequentialPlayer, SimClip};
pub use session::{SessionManager, SubmitOutcome, Task};
pub use state::SharedState;
