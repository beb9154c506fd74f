//! Outbound ports. Infrastructure adapters implement these; use cases only
//! ever see the traits.

mod bus;
mod store;

pub use bus::{BusError, Completion, DispatchOptions, FetchSpec, JobBus, RoutingPolicy};
pub use store::{SignUpStore, StoreError};
