use async_trait::async_trait;
use identity_domain::ports::{BusError, Completion, DispatchOptions, FetchSpec, JobBus, RoutingPolicy};
use identity_shared::JobId;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::oneshot;

/// What a consumer group would see on the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDelivery {
    pub job_id: JobId,
    pub stream: String,
    pub route: RoutingPolicy,
}

struct PendingWait {
    remaining: HashSet<String>,
    reject_on_error: bool,
    first_error: Option<BusError>,
    notify: Option<oneshot::Sender<Result<(), BusError>>>,
}

impl PendingWait {
    fn settle(&mut self, outcome: Result<(), BusError>) {
        if let Some(notify) = self.notify.take() {
            let _ = notify.send(outcome);
        }
    }
}

#[derive(Default)]
struct BusState {
    jobs: HashMap<String, HashMap<String, Vec<u8>>>,
    deliveries: VecDeque<StreamDelivery>,
    waits: HashMap<String, PendingWait>,
}

/// In-memory [`JobBus`] for tests. The test plays the worker side through
/// [`next_delivery`], [`read_field`], [`write_field`] and [`signal`].
///
/// [`next_delivery`]: MemoryJobBus::next_delivery
/// [`read_field`]: MemoryJobBus::read_field
/// [`write_field`]: MemoryJobBus::write_field
/// [`signal`]: MemoryJobBus::signal
#[derive(Clone, Default)]
pub struct MemoryJobBus {
    state: Arc<Mutex<BusState>>,
}

impl MemoryJobBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest undelivered dispatch, like one XREADGROUP round.
    pub fn next_delivery(&self) -> Option<StreamDelivery> {
        self.state.lock().deliveries.pop_front()
    }

    pub fn read_field(&self, job_id: &JobId, field: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .jobs
            .get(&job_id.to_string())
            .and_then(|fields| fields.get(field).cloned())
    }

    /// Writes a result field onto the job, as a worker would before
    /// signalling its group done.
    pub fn write_field(&self, job_id: &JobId, field: impl Into<String>, value: Vec<u8>) {
        self.state
            .lock()
            .jobs
            .entry(job_id.to_string())
            .or_default()
            .insert(field.into(), value);
    }

    /// Reports a consumer group finished, successfully or not.
    pub fn signal(&self, job_id: &JobId, group: &str, outcome: Result<(), &str>) {
        let mut state = self.state.lock();
        let Some(wait) = state.waits.get_mut(&job_id.to_string()) else {
            return;
        };
        if !wait.remaining.remove(group) {
            return;
        }
        if let Err(message) = outcome {
            let err = BusError::GroupFailed {
                group: group.to_string(),
                message: message.to_string(),
            };
            if wait.reject_on_error {
                wait.settle(Err(err));
                return;
            }
            wait.first_error.get_or_insert(err);
        }
        if wait.remaining.is_empty() {
            let outcome = match wait.first_error.take() {
                Some(err) => Err(err),
                None => Ok(()),
            };
            wait.settle(outcome);
        }
    }

    /// Expires the wait as if the timeout had elapsed.
    pub fn time_out(&self, job_id: &JobId) {
        let mut state = self.state.lock();
        if let Some(wait) = state.waits.get_mut(&job_id.to_string()) {
            let mut groups: Vec<String> = wait.remaining.iter().cloned().collect();
            groups.sort_unstable();
            wait.settle(Err(BusError::TimedOut { groups }));
        }
    }

    /// Remaining fields of a job, for asserting cleanup happened.
    pub fn job_fields(&self, job_id: &JobId) -> Vec<String> {
        let state = self.state.lock();
        let mut fields: Vec<String> = state
            .jobs
            .get(&job_id.to_string())
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default();
        fields.sort_unstable();
        fields
    }
}

#[async_trait]
impl JobBus for MemoryJobBus {
    async fn push(
        &self,
        job_id: &JobId,
        fields: HashMap<String, Vec<u8>>,
    ) -> Result<(), BusError> {
        self.state
            .lock()
            .jobs
            .entry(job_id.to_string())
            .or_default()
            .extend(fields);
        Ok(())
    }

    async fn send(&self, job_id: &JobId, options: &DispatchOptions) -> Result<Completion, BusError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.state.lock();
            state.waits.insert(
                job_id.to_string(),
                PendingWait {
                    remaining: options.wait_for.iter().cloned().collect(),
                    reject_on_error: options.reject_on_error,
                    first_error: None,
                    notify: Some(tx),
                },
            );
            state.deliveries.push_back(StreamDelivery {
                job_id: job_id.clone(),
                stream: options.stream.clone(),
                route: options.route,
            });
        }
        Ok(Box::pin(async move {
            rx.await.unwrap_or_else(|_| {
                Err(BusError::Connection(
                    "bus dropped before the job settled".to_string(),
                ))
            })
        }))
    }

    async fn fetch(
        &self,
        job_id: &JobId,
        specs: &[FetchSpec],
    ) -> Result<HashMap<String, Vec<u8>>, BusError> {
        let mut state = self.state.lock();
        let Some(job) = state.jobs.get_mut(&job_id.to_string()) else {
            return Ok(HashMap::new());
        };
        let mut fields = HashMap::new();
        for spec in specs {
            let value = if spec.delete {
                job.remove(&spec.field)
            } else {
                job.get(&spec.field).cloned()
            };
            if let Some(value) = value {
                fields.insert(spec.field.clone(), value);
            }
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(reject_on_error: bool) -> DispatchOptions {
        DispatchOptions {
            stream: "SignUpLead".to_string(),
            route: RoutingPolicy::Distributed,
            wait_for: vec!["IdentityService".to_string()],
            reject_on_error,
        }
    }

    #[tokio::test]
    async fn worker_round_trip_with_cleanup() {
        let bus = MemoryJobBus::new();
        let job_id = JobId::new();

        bus.push(
            &job_id,
            HashMap::from([("request".to_string(), b"payload".to_vec())]),
        )
        .await
        .unwrap();
        let completion = bus.send(&job_id, &options(true)).await.unwrap();

        // Worker side.
        let delivery = bus.next_delivery().unwrap();
        assert_eq!(delivery.job_id, job_id);
        assert_eq!(delivery.stream, "SignUpLead");
        assert_eq!(bus.read_field(&job_id, "request").unwrap(), b"payload");
        bus.write_field(&job_id, "response", b"done".to_vec());
        bus.signal(&job_id, "IdentityService", Ok(()));

        completion.await.unwrap();
        let fields = bus
            .fetch(&job_id, &[FetchSpec::take("response"), FetchSpec::take("request")])
            .await
            .unwrap();
        assert_eq!(fields["response"], b"done");
        assert!(bus.job_fields(&job_id).is_empty());
    }

    #[tokio::test]
    async fn error_signal_rejects_the_wait() {
        let bus = MemoryJobBus::new();
        let job_id = JobId::new();
        let completion = bus.send(&job_id, &options(true)).await.unwrap();

        bus.signal(&job_id, "IdentityService", Err("validation worker down"));

        match completion.await {
            Err(BusError::GroupFailed { group, message }) => {
                assert_eq!(group, "IdentityService");
                assert_eq!(message, "validation worker down");
            }
            other => panic!("expected GroupFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn time_out_reports_outstanding_groups() {
        let bus = MemoryJobBus::new();
        let job_id = JobId::new();
        let completion = bus.send(&job_id, &options(true)).await.unwrap();

        bus.time_out(&job_id);

        match completion.await {
            Err(BusError::TimedOut { groups }) => {
                assert_eq!(groups, vec!["IdentityService".to_string()])
            }
            other => panic!("expected TimedOut, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn signals_from_unawaited_groups_are_ignored() {
        let bus = MemoryJobBus::new();
        let job_id = JobId::new();
        let completion = bus.send(&job_id, &options(true)).await.unwrap();

        bus.signal(&job_id, "SomeoneElse", Err("not my job"));
        bus.signal(&job_id, "IdentityService", Ok(()));

        completion.await.unwrap();
    }
}
