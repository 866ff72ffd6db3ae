//! Domain layer - workflow model, engine contracts and collaborator traits

pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod search;
pub mod workflow;

pub use error::DomainError;
pub use knowledge_base::{RetrievalRequest, RetrievalSearch, SearchHit};
pub use llm::{GenerationRequest, GenerationResult, Generator, Usage};
pub use search::{WebSearch, WebSearchRequest, WebSearchResponse, WebSearchResult};
pub use workflow::{
    ExecutionResult, ExecutionStep, Node, NodeKind, NodeType, StepStatus, WorkflowDefinition,
    WorkflowError, WorkflowExecutor, WorkflowValidation,
};
