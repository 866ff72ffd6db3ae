//! Knowledge base domain - document retrieval

mod entity;
mod provider;

pub use entity::{RetrievalRequest, SearchHit};
pub use provider::RetrievalSearch;

#[cfg(test)]
pub use provider::MockRetrievalSearch;
