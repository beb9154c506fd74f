use super::{JobError, JobPhase};
use crate::ports::{Completion, DispatchOptions};
use identity_shared::JobId;
use std::collections::HashMap;
use std::fmt;

/// Producer-side view of one correlated job.
///
/// Holds the staged field payloads until they are pushed, and the completion
/// handle between dispatch and await. All phase changes go through
/// [`JobPhase::can_transition_to`]; an out-of-order bus call surfaces as
/// [`JobError::InvalidTransition`] instead of corrupting bus state.
pub struct Job {
    id: JobId,
    phase: JobPhase,
    staged: HashMap<String, Vec<u8>>,
    options: Option<DispatchOptions>,
    completion: Option<Completion>,
}

impl Job {
    pub(super) fn new() -> Self {
        Self {
            id: JobId::new(),
            phase: JobPhase::Created,
            staged: HashMap::new(),
            options: None,
            completion: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Stages a field payload to be pushed with the job. Chainable.
    pub fn set_field(&mut self, field: impl Into<String>, value: Vec<u8>) -> &mut Self {
        self.staged.insert(field.into(), value);
        self
    }

    pub fn dispatch_options(&self) -> Option<&DispatchOptions> {
        self.options.as_ref()
    }

    pub(super) fn guard(&self, next: JobPhase) -> Result<(), JobError> {
        if self.phase.can_transition_to(&next) {
            Ok(())
        } else {
            Err(JobError::InvalidTransition {
                from: self.phase,
                to: next,
            })
        }
    }

    pub(super) fn advance(&mut self, next: JobPhase) {
        debug_assert!(self.phase.can_transition_to(&next));
        self.phase = next;
    }

    pub(super) fn take_staged(&mut self) -> HashMap<String, Vec<u8>> {
        std::mem::take(&mut self.staged)
    }

    pub(super) fn record_dispatch(&mut self, options: DispatchOptions, completion: Completion) {
        self.options = Some(options);
        self.completion = Some(completion);
    }

    pub(super) fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("staged", &self.staged.keys())
            .field("options", &self.options)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}
