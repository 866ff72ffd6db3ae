//! Retrieval request and result types

use serde::{Deserialize, Serialize};

/// A document chunk returned by retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Chunk text
    pub content: String,
    /// Document the chunk belongs to
    pub document_id: String,
    /// Display name of that document
    pub document_name: String,
    /// Similarity score, higher is more similar
    pub score: f32,
}

impl SearchHit {
    pub fn new(
        content: impl Into<String>,
        document_id: impl Into<String>,
        document_name: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            content: content.into(),
            document_id: document_id.into(),
            document_name: document_name.into(),
            score,
        }
    }
}

/// Parameters for a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    /// Query text to search for
    pub query: String,
    /// Restrict results to these documents; `None` searches everything
    pub document_ids: Option<Vec<String>>,
    /// Number of results to return
    pub top_k: u32,
    /// Embedding model used to embed the query
    pub embedding_model: String,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            document_ids: None,
            top_k: crate::domain::workflow::DEFAULT_TOP_K,
            embedding_model: crate::domain::workflow::DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_document_ids(mut self, ids: Vec<String>) -> Self {
        self.document_ids = Some(ids);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Whether a document passes the filter
    pub fn includes_document(&self, document_id: &str) -> bool {
        self.document_ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| id == document_id))
    }
}
