use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable machine-readable error codes surfaced to RPC callers.
///
/// Codes are part of the public contract: clients branch on them, so renaming
/// a variant's wire value is a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    SchemaValidation,
    InvalidPhoneNumber,
    AlreadySignedUp,
    WaitBeforeSignUp,
    SignUpNotFound,
    StoreUnavailable,
    JobDispatchFailed,
    JobTimedOut,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SchemaValidation => "SCHEMA_VALIDATION",
            ErrorCode::InvalidPhoneNumber => "INVALID_PHONENUMBER",
            ErrorCode::AlreadySignedUp => "ALREADY_SIGNED_UP",
            ErrorCode::WaitBeforeSignUp => "WAIT_BEFORE_SIGN_UP",
            ErrorCode::SignUpNotFound => "SIGN_UP_NOT_FOUND",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::JobDispatchFailed => "JOB_DISPATCH_FAILED",
            ErrorCode::JobTimedOut => "JOB_TIMED_OUT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_stable() {
        assert_eq!(ErrorCode::AlreadySignedUp.as_str(), "ALREADY_SIGNED_UP");
        assert_eq!(ErrorCode::WaitBeforeSignUp.as_str(), "WAIT_BEFORE_SIGN_UP");
        assert_eq!(ErrorCode::SignUpNotFound.to_string(), "SIGN_UP_NOT_FOUND");
    }
}
