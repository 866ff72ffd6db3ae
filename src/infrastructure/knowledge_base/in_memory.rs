//! In-memory retrieval for local runs and testing

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::knowledge_base::{RetrievalRequest, RetrievalSearch, SearchHit};
use crate::domain::DomainError;

/// A document as stored in a documents file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    #[serde(alias = "document_id")]
    pub document_id: String,
    #[serde(alias = "document_name")]
    pub document_name: String,
    /// Pre-chunked text
    #[serde(default)]
    pub chunks: Vec<String>,
}

impl SourceDocument {
    pub fn new(
        document_id: impl Into<String>,
        document_name: impl Into<String>,
        chunks: Vec<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            document_name: document_name.into(),
            chunks,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredChunk {
    document_id: String,
    document_name: String,
    content: String,
    terms: HashSet<String>,
}

/// Keyword retrieval over chunks held in memory.
///
/// A chunk scores the fraction of distinct query terms it contains; chunks that
/// match nothing are never returned.
#[derive(Debug, Default)]
pub struct InMemoryRetrieval {
    chunks: Arc<RwLock<Vec<StoredChunk>>>,
}

impl InMemoryRetrieval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<SourceDocument>) -> Self {
        let chunks = documents.into_iter().flat_map(stored_chunks).collect();
        Self {
            chunks: Arc::new(RwLock::new(chunks)),
        }
    }

    /// Parse a JSON array of documents
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let documents: Vec<SourceDocument> = serde_json::from_str(json)
            .map_err(|e| DomainError::knowledge_base(format!("Invalid documents file: {}", e)))?;
        Ok(Self::from_documents(documents))
    }

    /// Load documents from a JSON file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::knowledge_base(format!(
                "Failed to read documents file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    pub async fn add_document(&self, document: SourceDocument) {
        self.chunks.write().await.extend(stored_chunks(document));
    }

    pub async fn chunk_count(&self) -> usize {
        self.chunks.read().await.len()
    }
}

fn stored_chunks(document: SourceDocument) -> Vec<StoredChunk> {
    let SourceDocument {
        document_id,
        document_name,
        chunks,
    } = document;

    chunks
        .into_iter()
        .map(|content| StoredChunk {
            document_id: document_id.clone(),
            document_name: document_name.clone(),
            terms: terms(&content),
            content,
        })
        .collect()
}

/// Lowercased alphanumeric words
fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl RetrievalSearch for InMemoryRetrieval {
    async fn search(&self, request: RetrievalRequest) -> Result<Vec<SearchHit>, DomainError> {
        let query_terms = terms(&request.query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = self.chunks.read().await;
        let mut hits: Vec<SearchHit> = chunks
            .iter()
            .filter(|chunk| request.includes_document(&chunk.document_id))
            .filter_map(|chunk| {
                let matched = query_terms.intersection(&chunk.terms).count();
                (matched > 0).then(|| {
                    SearchHit::new(
                        &chunk.content,
                        &chunk.document_id,
                        &chunk.document_name,
                        matched as f32 / query_terms.len() as f32,
                    )
                })
            })
            .collect();

        // Stable sort keeps insertion order between equal scores
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(request.top_k as usize);

        debug!(
            query = %request.query,
            hits = hits.len(),
            "In-memory retrieval complete"
        );

        Ok(hits)
    }

    fn provider_type(&self) -> &'static str {
        "in_memory"
    }
}
