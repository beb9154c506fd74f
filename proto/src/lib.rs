//! Generated Protocol Buffer types for the identity sign-up gateway.
//!
//! This crate re-exports the wire messages and the `SignUpService` gRPC glue
//! generated from `identity_v1.proto`. The generated sources are vendored
//! under `src/generated/` so the workspace builds without protoc; see the
//! header of `identity_v1.proto` for how to regenerate them.

pub mod identity {
    pub mod v1 {
        include!("generated/identity.v1.rs");

        // Include tonic-generated service code
        include!("generated/identity.v1.tonic.rs");
    }
}

// Re-export commonly used types for convenience
pub use identity::v1::*;
pub use identity::v1::sign_up_service_client::SignUpServiceClient;
pub use identity::v1::sign_up_service_server::{SignUpService, SignUpServiceServer};
