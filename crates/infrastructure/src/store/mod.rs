//! Sign-up store adapters: the Elasticsearch index used in production and
//! an in-memory double for tests.

mod elasticsearch;
mod memory;

pub use elasticsearch::ElasticsearchSignUpStore;
pub use memory::MemorySignUpStore;
