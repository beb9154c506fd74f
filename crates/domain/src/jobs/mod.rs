//! Correlated jobs: the producer-side protocol for turning a synchronous
//! request into work on the bus and collecting the result.
//!
//! A job moves through a fixed lifecycle, one phase per bus interaction:
//! fields are pushed, the job is dispatched to a stream, the producer awaits
//! the consumer groups, then fetches (and cleans up) the result fields.

mod job;
mod producer;
mod state;

pub use job::Job;
pub use producer::JobProducer;
pub use state::JobPhase;

use crate::ports::BusError;
use identity_shared::JobId;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("invalid job transition from {from} to {to}")]
    InvalidTransition { from: JobPhase, to: JobPhase },

    #[error("job {job_id} was never dispatched, nothing to await")]
    NotDispatched { job_id: JobId },

    #[error("job {job_id} finished without a {field} field")]
    MissingField { job_id: JobId, field: String },

    #[error(transparent)]
    Bus(#[from] BusError),
}
