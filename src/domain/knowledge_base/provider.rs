//! Retrieval collaborator trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{RetrievalRequest, SearchHit};
use crate::domain::error::DomainError;

/// Similarity search over ingested document chunks.
///
/// Implementations own embedding the query and talking to the vector index.
/// Backend failures are returned as errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RetrievalSearch: Send + Sync {
    /// Search for chunks similar to the query, best matches first
    async fn search(&self, request: RetrievalRequest) -> Result<Vec<SearchHit>, DomainError>;

    /// Provider type name, used in logs
    fn provider_type(&self) -> &'static str;
}
