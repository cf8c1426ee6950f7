// Policy store implementations for the antitag system.

pub mod in_memory;
pub mod json_store;
pub mod sqlite_store;

pub use in_memory::InMemoryPolicyStore;
pub use json_store::JsonPolicyStore;
pub use sqlite_store::SqlitePolicyStore;
