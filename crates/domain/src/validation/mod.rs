//! Request and record validation.
//!
//! Schema checks are structural (presence, shape, channel-conditional
//! requirements) and run before anything touches the store or the bus.
//! Phone checks normalize and sanity-check cellphone numbers. Stored-record
//! checks apply the retry policy to dedup hits.

mod phone;
mod schema;
mod stored;

pub use phone::{normalize_cellphone, validate_mobile_phone};
pub use schema::{RequestKind, SchemaRegistry};
pub use stored::validate_stored_sign_up;
