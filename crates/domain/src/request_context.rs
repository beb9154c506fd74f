use chrono::{DateTime, Utc};
use identity_shared::CorrelationId;

/// Per-request context carried explicitly through every layer.
///
/// Holds the correlation id (caller supplied or generated at the edge) and
/// the moment the request was admitted, which doubles as the `updatedAt`
/// timestamp on anything the request persists.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: CorrelationId,
    received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a request that did not carry a correlation id.
    pub fn new() -> Self {
        Self::with_correlation_id(CorrelationId::generate())
    }

    pub fn with_correlation_id(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            received_at: Utc::now(),
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
