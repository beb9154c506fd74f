use super::{Job, JobError, JobPhase};
use crate::ports::{BusError, DispatchOptions, FetchSpec, JobBus};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Drives jobs through their lifecycle against a [`JobBus`].
///
/// The producer owns the ordering rules; the bus only moves bytes. Each
/// method checks the phase transition before touching the bus and commits
/// it afterwards, so a bus failure leaves the job in its previous phase.
#[derive(Clone)]
pub struct JobProducer {
    bus: Arc<dyn JobBus>,
}

impl JobProducer {
    pub fn new(bus: Arc<dyn JobBus>) -> Self {
        Self { bus }
    }

    /// A fresh job in the `Created` phase.
    pub fn job(&self) -> Job {
        Job::new()
    }

    /// Pushes the staged fields onto the bus.
    pub async fn push(&self, job: &mut Job) -> Result<(), JobError> {
        job.guard(JobPhase::Queued)?;
        let fields = job.take_staged();
        debug!(job_id = %job.id(), fields = fields.len(), "pushing job fields");
        self.bus.push(job.id(), fields).await?;
        job.advance(JobPhase::Queued);
        Ok(())
    }

    /// Announces the job on its stream. The completion subscription is armed
    /// by the bus before the announcement goes out, so the handle stored on
    /// the job can never miss a signal.
    pub async fn dispatch(&self, job: &mut Job, options: DispatchOptions) -> Result<(), JobError> {
        job.guard(JobPhase::Dispatched)?;
        debug!(
            job_id = %job.id(),
            stream = %options.stream,
            route = options.route.as_str(),
            wait_for = ?options.wait_for,
            "dispatching job"
        );
        let completion = self.bus.send(job.id(), &options).await?;
        job.record_dispatch(options, completion);
        job.advance(JobPhase::Dispatched);
        Ok(())
    }

    /// Awaits the consumer groups named at dispatch. Settles the job into
    /// `Completed`, `Failed` or `TimedOut` and propagates the bus error on
    /// the two failure outcomes.
    pub async fn finished(&self, job: &mut Job) -> Result<(), JobError> {
        job.guard(JobPhase::Awaiting)?;
        let completion = job.take_completion().ok_or_else(|| JobError::NotDispatched {
            job_id: job.id().clone(),
        })?;
        job.advance(JobPhase::Awaiting);

        match completion.await {
            Ok(()) => {
                job.advance(JobPhase::Completed);
                Ok(())
            }
            Err(err @ BusError::TimedOut { .. }) => {
                job.advance(JobPhase::TimedOut);
                Err(err.into())
            }
            Err(err) => {
                job.advance(JobPhase::Failed);
                Err(err.into())
            }
        }
    }

    /// Reads result fields off the finished job, deleting the transient ones
    /// in the same round trip.
    pub async fn fetch(
        &self,
        job: &mut Job,
        specs: &[FetchSpec],
    ) -> Result<HashMap<String, Vec<u8>>, JobError> {
        job.guard(JobPhase::Fetched)?;
        let fields = self.bus.fetch(job.id(), specs).await?;
        job.advance(JobPhase::Fetched);
        Ok(fields)
    }
}
