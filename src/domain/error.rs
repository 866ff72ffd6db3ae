use thiserror::Error;

/// Errors raised by the retrieval collaborator
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),
}

impl DomainError {
    pub fn knowledge_base(message: impl Into<String>) -> Self {
        Self::KnowledgeBase(message.into())
    }
}
