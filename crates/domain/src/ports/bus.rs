use async_trait::async_trait;
use futures::future::BoxFuture;
use identity_shared::JobId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a dispatched job reaches its consumer groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingPolicy {
    /// Every consumer group on the stream sees the job.
    Broadcast,
    /// Consumer groups compete; exactly one consumer claims each job.
    Distributed,
}

impl RoutingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingPolicy::Broadcast => "broadcast",
            RoutingPolicy::Distributed => "distributed",
        }
    }
}

/// Everything the bus needs to deliver one job and report it done.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOptions {
    /// Stream the job is announced on.
    pub stream: String,
    pub route: RoutingPolicy,
    /// Consumer groups whose completion signals the producer waits for.
    pub wait_for: Vec<String>,
    /// When set, the first error signal settles the wait immediately
    /// instead of letting the remaining groups finish.
    pub reject_on_error: bool,
}

/// One field to read back from a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    pub field: String,
    pub delete: bool,
}

impl FetchSpec {
    /// Read the field and leave it on the bus.
    pub fn keep(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            delete: false,
        }
    }

    /// Read the field and delete it in the same round trip, so transient
    /// payloads never outlive the request that consumed them.
    pub fn take(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            delete: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("bus connection failed: {0}")]
    Connection(String),

    #[error("failed to queue job fields: {0}")]
    Push(String),

    #[error("failed to dispatch job: {0}")]
    Dispatch(String),

    #[error("group {group} failed the job: {message}")]
    GroupFailed { group: String, message: String },

    #[error("timed out waiting for groups {groups:?}")]
    TimedOut { groups: Vec<String> },

    #[error("failed to fetch job fields: {0}")]
    Fetch(String),
}

/// Resolves once every awaited consumer group has signalled, or with the
/// first failure when `reject_on_error` is set.
pub type Completion = BoxFuture<'static, Result<(), BusError>>;

/// Transport behind the correlated-job protocol.
///
/// Implementations must arm the completion subscription inside [`send`]
/// before announcing the job, so a worker that finishes instantly cannot
/// signal into the void.
///
/// [`send`]: JobBus::send
#[async_trait]
pub trait JobBus: Send + Sync {
    /// Stages field payloads for a job. Must happen before the job is sent.
    async fn push(&self, job_id: &JobId, fields: HashMap<String, Vec<u8>>)
        -> Result<(), BusError>;

    /// Announces the job on its stream and returns the completion handle.
    async fn send(&self, job_id: &JobId, options: &DispatchOptions) -> Result<Completion, BusError>;

    /// Reads result fields back, deleting those marked [`FetchSpec::take`]
    /// atomically with the read. Missing fields are simply absent from the
    /// returned map.
    async fn fetch(
        &self,
        job_id: &JobId,
        specs: &[FetchSpec],
    ) -> Result<HashMap<String, Vec<u8>>, BusError>;
}
