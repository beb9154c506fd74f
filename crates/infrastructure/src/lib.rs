// Identity Sign-Up Infrastructure
// Adapters behind the domain ports: the Redis job bus, the Elasticsearch
// sign-up store, and in-memory doubles for tests.

pub mod bus;
pub mod store;

pub use bus::{MemoryJobBus, RedisJobBus};
pub use store::{ElasticsearchSignUpStore, MemorySignUpStore};
