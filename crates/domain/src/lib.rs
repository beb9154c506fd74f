// Identity Sign-Up Domain
// Sign-up lead lifecycle, request validation and the correlated-job protocol
// used to bridge synchronous calls onto the processing bus.

pub mod error;
pub mod jobs;
pub mod ports;
pub mod request_context;
pub mod sign_up;
pub mod validation;

pub use error::{DomainError, FieldViolation};
pub use request_context::RequestContext;
pub use sign_up::{
    OperationDates, SignUpDocument, SignUpLead, StoredSignUp, ValidateSignUp, ValidationChannel,
};
