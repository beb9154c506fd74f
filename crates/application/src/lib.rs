// Identity Sign-Up Application
// The two use cases behind the RPC surface, plus the wire conversions and
// the stream/field names shared with the worker tier.

pub mod error;
pub mod protocol;
pub mod sign_up_lead;
pub mod validate_sign_up;
pub mod wire;

pub use error::ApiError;
pub use sign_up_lead::SignUpLeadUseCase;
pub use validate_sign_up::{ValidateSignUpUseCase, ValidationOutcome};
