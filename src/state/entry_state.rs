/// Entry state definitions for tracking crawl progress
///
/// This module defines the states a frontier entry moves through while a
/// worker processes it, and which moves between them are legal.
use crate::CrawlError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the current state of a frontier entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    // ===== Active States =====
    /// Entry is waiting in the frontier
    Queued,

    /// Entry's URL was claimed and is being fetched
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched and produced a PageResult
    Succeeded,

    /// All fetch attempts failed
    Failed,

    /// URL had already been claimed by another entry
    Skipped,
}

impl EntryState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Skipped)
    }

    /// Returns true if moving from this state to `next` is allowed
    ///
    /// ```text
    /// Queued -> Fetching -> Succeeded
    ///    |          \----> Failed
    ///    \---> Skipped
    /// ```
    pub fn can_transition_to(&self, next: EntryState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Fetching)
                | (Self::Queued, Self::Skipped)
                | (Self::Fetching, Self::Succeeded)
                | (Self::Fetching, Self::Failed)
        )
    }

    /// Moves to `next`, or fails with `CrawlError::InvalidTransition`
    pub fn transition(self, next: EntryState) -> Result<EntryState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Returns all possible entry states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::Fetching,
            Self::Succeeded,
            Self::Failed,
            Self::Skipped,
        ]
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
