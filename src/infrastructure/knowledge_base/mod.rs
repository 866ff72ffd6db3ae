//! Retrieval implementations

mod in_memory;

pub use in_memory::{InMemoryRetrieval, SourceDocument};
