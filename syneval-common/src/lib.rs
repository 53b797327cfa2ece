//! # SynEval Common Library
//!
//! Shared code for the SynEval evaluation panel including:
//! - Event types (SynevalEvent enum) and the broadcast EventBus
//! - Common error type
//! - Configuration file resolution and logging bootstrap settings

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{EventBus, ScreenMode, SynevalEvent};
