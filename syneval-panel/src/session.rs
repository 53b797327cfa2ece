//! Evaluation session page flow
//!
//! In-memory record of a multi-page listening test: one task per page, one
//! recorded choice per task, a cursor that advances on submission. Results
//! live only for the life of the process; storage and transport are the
//! embedder's concern.

use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;
use syneval_common::events::{EventBus, SynevalEvent};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One evaluation page: a genuine sample and its decoys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Sample id of the genuine clip
    pub truth: u32,

    /// Sample ids of the decoy clips
    pub other: Vec<u32>,
}

impl Task {
    /// All option values for this page, decoys first, unshuffled
    pub fn options(&self) -> Vec<u32> {
        let mut options = self.other.clone();
        options.push(self.truth);
        options
    }

    /// Option values in a fresh random page order
    pub fn shuffled_options(&self) -> Vec<u32> {
        let mut options = self.options();
        options.shuffle(&mut rand::thread_rng());
        options
    }
}

/// Load a JSON task list
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::TaskFile(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::TaskFile(format!("Cannot parse {}: {}", path.display(), e)))
}

/// Result of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Choice recorded, session moved to the given page
    Advanced { page: usize },
    /// Choice recorded, every page now has one
    Completed,
    /// No option was checked; page unchanged
    SelectionRequired,
}

struct SessionInner {
    page: usize,
    choices: Vec<Option<u32>>,
    complete: bool,
}

/// Tracks pages and recorded choices for one evaluator
pub struct SessionManager {
    session_id: Uuid,
    tasks: Vec<Task>,
    inner: RwLock<SessionInner>,
    event_bus: EventBus,
}

impl SessionManager {
    /// Create a session over `tasks`
    ///
    /// An empty task list yields an already-complete session.
    pub fn new(tasks: Vec<Task>, event_bus: EventBus) -> Self {
        let complete = tasks.is_empty();
        let choices = vec![None; tasks.len()];
        Self {
            session_id: Uuid::new_v4(),
            tasks,
            inner: RwLock::new(SessionInner {
                page: 0,
                choices,
                complete,
            }),
            event_bus,
        }
    }

    /// Identifier tagging this session's events
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Number of pages
    pub fn total_pages(&self) -> usize {
        self.tasks.len()
    }

    /// Task at `page`
    pub fn task(&self, page: usize) -> Option<&Task> {
        self.tasks.get(page)
    }

    /// Page the session is currently on
    pub async fn current_page(&self) -> usize {
        self.inner.read().await.page
    }

    /// Whether every page has a recorded choice
    pub async fn is_complete(&self) -> bool {
        self.inner.read().await.complete
    }

    /// Recorded choices, one slot per page
    pub async fn choices(&self) -> Vec<Option<u32>> {
        self.inner.read().await.choices.clone()
    }

    /// Record `choice` for the current page and advance
    ///
    /// `None` means no option was checked: the page does not advance and
    /// the evaluator is prompted to select. Submitting to a complete
    /// session is an error.
    pub async fn submit_choice(&self, choice: Option<u32>) -> Result<SubmitOutcome> {
        let mut inner = self.inner.write().await;
        if inner.complete {
            return Err(Error::InvalidState(
                "session already complete".to_string(),
            ));
        }

        let Some(choice) = choice else {
            self.event_bus.emit_lossy(SynevalEvent::SelectionRequired {
                page: inner.page,
                timestamp: chrono::Utc::now(),
            });
            return Ok(SubmitOutcome::SelectionRequired);
        };

        let page = inner.page;
        inner.choices[page] = Some(choice);
        self.event_bus.emit_lossy(SynevalEvent::ChoiceSubmitted {
            session_id: self.session_id,
            page,
            choice,
            timestamp: chrono::Utc::now(),
        });

        inner.page += 1;
        if inner.page >= self.tasks.len() {
            inner.complete = true;
            self.event_bus.emit_lossy(SynevalEvent::SessionCompleted {
                session_id: self.session_id,
                timestamp: chrono::Utc::now(),
            });
            Ok(SubmitOutcome::Completed)
        } else {
            self.event_bus.emit_lossy(SynevalEvent::PageAdvanced {
                page: inner.page,
                total_pages: self.tasks.len(),
                timestamp: chrono::Utc::now(),
            });
            Ok(SubmitOutcome::Advanced { page: inner.page })
        }
    }
}
