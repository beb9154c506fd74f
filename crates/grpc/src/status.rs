//! Mapping from use-case errors to gRPC statuses.
//!
//! Every status carries the stable code in `x-error-code` metadata so
//! clients can branch without parsing messages; schema violations also get
//! their field-level details as JSON in `x-error-details`.

use identity_application::ApiError;
use identity_domain::DomainError;
use identity_shared::ErrorCode;
use tonic::metadata::MetadataValue;
use tonic::{Code, Status};
use tracing::{error, warn};

pub fn status_from(err: ApiError) -> Status {
    let error_code = err.code();
    let grpc_code = match error_code {
        ErrorCode::SchemaValidation | ErrorCode::InvalidPhoneNumber => Code::InvalidArgument,
        ErrorCode::AlreadySignedUp => Code::AlreadyExists,
        ErrorCode::WaitBeforeSignUp => Code::FailedPrecondition,
        ErrorCode::SignUpNotFound => Code::NotFound,
        ErrorCode::StoreUnavailable | ErrorCode::JobDispatchFailed => Code::Unavailable,
        ErrorCode::JobTimedOut => Code::DeadlineExceeded,
        ErrorCode::Internal => Code::Internal,
    };

    if err.is_client_error() {
        warn!(code = error_code.as_str(), "request refused: {err}");
    } else {
        error!(code = error_code.as_str(), "request failed: {err}");
    }

    let mut status = Status::new(grpc_code, err.to_string());
    if let Ok(value) = MetadataValue::try_from(error_code.as_str()) {
        status.metadata_mut().insert("x-error-code", value);
    }
    if let ApiError::Domain(DomainError::SchemaValidation { violations, .. }) = &err {
        if let Ok(details) = serde_json::to_string(violations) {
            if let Ok(value) = MetadataValue::try_from(details.as_str()) {
                status.metadata_mut().insert("x-error-details", value);
            }
        }
    }
    status
}
