//! Names shared with the worker tier. Changing any of these breaks every
//! deployed worker, so they are spelled out once here.

/// Stream carrying freshly submitted leads.
pub const STREAM_SIGN_UP_LEAD: &str = "SignUpLead";

/// Stream carrying validation attempts.
pub const STREAM_VALIDATE_SIGN_UP: &str = "ValidateSignUp";

/// The one consumer group whose completion both operations wait for.
pub const GROUP_IDENTITY_SERVICE: &str = "IdentityService";

/// Job field holding the encoded request, written by the producer.
pub const FIELD_REQUEST: &str = "request";

/// Job field holding the processed lead, written back by the worker.
pub const FIELD_SIGN_UP_LEAD: &str = "signUpLead";

/// Job field holding the worker's validation verdict.
pub const FIELD_VALIDATE_RESPONSE: &str = "validateSignUpResponse";

/// Job field holding the operation timestamps that accompany a successful
/// validation.
pub const FIELD_OPERATION_DATES: &str = "signUpOperationDate";
