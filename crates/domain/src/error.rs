use crate::validation::RequestKind;
use identity_shared::ErrorCode;
use serde::Serialize;
use std::time::Duration;

/// A single schema violation, pointing at the offending field with a
/// machine-readable code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the field, e.g. `.cellphone`.
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Business-rule failures raised while admitting or validating a sign-up.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid {kind} request: {} schema violation(s)", violations.len())]
    SchemaValidation {
        kind: RequestKind,
        violations: Vec<FieldViolation>,
    },

    #[error("{field} is not a valid mobile phone number")]
    InvalidPhoneNumber { field: String },

    #[error("this lead is already signed up")]
    AlreadySignedUp,

    #[error("you must wait at least {} seconds before requesting sign up again", remaining.as_secs())]
    WaitBeforeRetry { remaining: Duration },

    #[error("sign up {sign_up_id} doesn't exist")]
    SignUpNotFound { sign_up_id: String },
}

impl DomainError {
    /// Stable error code exposed to callers over the wire.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::SchemaValidation { .. } => ErrorCode::SchemaValidation,
            DomainError::InvalidPhoneNumber { .. } => ErrorCode::InvalidPhoneNumber,
            DomainError::AlreadySignedUp => ErrorCode::AlreadySignedUp,
            DomainError::WaitBeforeRetry { .. } => ErrorCode::WaitBeforeSignUp,
            DomainError::SignUpNotFound { .. } => ErrorCode::SignUpNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_distinct_code() {
        let errors = [
            DomainError::SchemaValidation {
                kind: RequestKind::SignUpLead,
                violations: vec![],
            },
            DomainError::InvalidPhoneNumber {
                field: ".cellphone".to_string(),
            },
            DomainError::AlreadySignedUp,
            DomainError::WaitBeforeRetry {
                remaining: Duration::from_secs(180),
            },
            DomainError::SignUpNotFound {
                sign_up_id: "missing".to_string(),
            },
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code().as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn wait_before_retry_message_names_the_remaining_seconds() {
        let err = DomainError::WaitBeforeRetry {
            remaining: Duration::from_secs(42),
        };
        assert!(err.to_string().contains("42 seconds"));
    }
}
