use identity_domain::jobs::JobError;
use identity_domain::ports::{BusError, StoreError};
use identity_domain::DomainError;
use identity_shared::ErrorCode;

/// Everything a use case can fail with, each mapping to a stable
/// [`ErrorCode`] at the RPC boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("sign-up store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("malformed job payload: {0}")]
    Payload(String),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Domain(err) => err.code(),
            ApiError::Store(_) => ErrorCode::StoreUnavailable,
            ApiError::Job(JobError::Bus(BusError::TimedOut { .. })) => ErrorCode::JobTimedOut,
            ApiError::Job(JobError::MissingField { .. }) => ErrorCode::Internal,
            ApiError::Job(_) => ErrorCode::JobDispatchFailed,
            ApiError::Payload(_) => ErrorCode::Internal,
        }
    }

    /// Whether the caller can fix this by correcting its request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Domain(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_timeout_and_failure_map_to_distinct_codes() {
        let timed_out = ApiError::Job(JobError::Bus(BusError::TimedOut { groups: vec![] }));
        assert_eq!(timed_out.code(), ErrorCode::JobTimedOut);

        let failed = ApiError::Job(JobError::Bus(BusError::GroupFailed {
            group: "IdentityService".to_string(),
            message: "boom".to_string(),
        }));
        assert_eq!(failed.code(), ErrorCode::JobDispatchFailed);
        assert!(!failed.is_client_error());
    }

    #[test]
    fn domain_errors_keep_their_own_code() {
        let err = ApiError::Domain(DomainError::AlreadySignedUp);
        assert_eq!(err.code(), ErrorCode::AlreadySignedUp);
        assert!(err.is_client_error());
    }
}
