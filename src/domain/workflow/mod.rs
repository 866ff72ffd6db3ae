//! Workflow domain module
//!
//! A workflow is a small directed graph of typed nodes:
//! - `userQuery` - entry point carrying the user's query
//! - `knowledgeBase` - retrieves document chunks as context
//! - `llmEngine` - generates a response, optionally with web search results
//! - `output` - terminal node holding the final response
//!
//! Graphs are validated structurally, ordered topologically, and executed one
//! node at a time, with each node receiving the merged outputs of its upstream
//! nodes.

mod context;
mod entity;
mod error;
mod executor;
pub mod graph;
mod node_types;
pub mod validation;

pub use context::{first_present, str_field, value_to_text, ExecutionContext, NodeData};
pub use entity::{Edge, Node, Position, WorkflowDefinition};
pub use error::WorkflowError;
pub use executor::{ExecutionResult, ExecutionStep, StepStatus, WorkflowExecutor};
pub use graph::{has_cycle, predecessors, topological_sort};
pub use node_types::{
    KnowledgeBaseConfig, LlmEngineConfig, LlmProviderKind, NodeKind, NodeType, WebSearchProvider,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_K,
};
pub use validation::{validate, ValidationError, ValidationErrorCode, WorkflowValidation};
