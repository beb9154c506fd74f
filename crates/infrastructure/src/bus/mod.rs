//! Job bus adapters.
//!
//! The wire contract shared by producer and workers:
//!
//! - Job fields live in the hash `{ns}:job:{id}`.
//! - Dispatch appends an entry carrying the job id to the stream
//!   `{ns}:stream:{name}`; consumer groups are created on first use.
//! - A worker reports its group done (or failed) by publishing a JSON
//!   signal `{"group": "...", "status": "ok" | "error", "message": "..."}`
//!   on the channel `{ns}:job:{id}:events`.

mod memory;
mod redis;

pub use self::redis::RedisJobBus;
pub use memory::{MemoryJobBus, StreamDelivery};
