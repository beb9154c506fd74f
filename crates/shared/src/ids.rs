use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a correlated job on the bus.
///
/// Uses UUID v7 so ids sort by creation time, which keeps bus-side keys and
/// log lines roughly chronological.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-call correlation identifier threaded through logs and job metadata.
///
/// Distinct from [`JobId`]: a call owns one correlation id but may in
/// principle dispatch several jobs under it. Callers may supply their own
/// value in the `callid` request metadata; otherwise one is generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a fresh, time-ordered correlation id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps a caller-supplied correlation value as-is.
    pub fn from_caller(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_unique_and_time_ordered() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
        // v7 ids embed a millisecond timestamp in the most significant bits
        assert!(a.0.get_version_num() == 7);
        assert!(a.to_string() <= b.to_string() || a.0.get_timestamp() == b.0.get_timestamp());
    }

    #[test]
    fn correlation_id_round_trips_caller_value() {
        let id = CorrelationId::from_caller("call-42");
        assert_eq!(id.as_str(), "call-42");
    }
}
