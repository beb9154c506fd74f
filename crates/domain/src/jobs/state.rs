use serde::{Deserialize, Serialize};
use std::fmt;

/// Producer-side lifecycle of a correlated job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobPhase {
    Created,
    Queued,
    Dispatched,
    Awaiting,
    Completed,
    Failed,
    TimedOut,
    Fetched,
}

impl JobPhase {
    /// Whether moving to `next` is legal.
    ///
    /// Valid transitions:
    /// - Created → Queued
    /// - Queued → Dispatched
    /// - Dispatched → Awaiting
    /// - Awaiting → Completed, Failed, TimedOut
    /// - Completed → Fetched
    /// - Failed, TimedOut, Fetched → (terminal)
    pub fn can_transition_to(&self, next: &JobPhase) -> bool {
        match (self, next) {
            (s, n) if s == n => false,

            (JobPhase::Created, JobPhase::Queued) => true,
            (JobPhase::Queued, JobPhase::Dispatched) => true,
            (JobPhase::Dispatched, JobPhase::Awaiting) => true,

            (JobPhase::Awaiting, JobPhase::Completed) => true,
            (JobPhase::Awaiting, JobPhase::Failed) => true,
            (JobPhase::Awaiting, JobPhase::TimedOut) => true,

            (JobPhase::Completed, JobPhase::Fetched) => true,

            // Everything else is invalid: no skipping ahead, no going back,
            // no leaving a terminal phase.
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobPhase::Failed | JobPhase::TimedOut | JobPhase::Fetched
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobPhase::Created => "created",
            JobPhase::Queued => "queued",
            JobPhase::Dispatched => "dispatched",
            JobPhase::Awaiting => "awaiting",
            JobPhase::Completed => "completed",
            JobPhase::Failed => "failed",
            JobPhase::TimedOut => "timed_out",
            JobPhase::Fetched => "fetched",
        };
        write!(f, "{s}")
    }
}
