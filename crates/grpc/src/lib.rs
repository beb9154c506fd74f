// Identity Sign-Up gRPC surface
// Thin wire layer: converts requests, threads the correlation context and
// maps use-case errors onto gRPC statuses.

pub mod interceptors;
pub mod services;
pub mod status;

pub use services::SignUpServiceImpl;
