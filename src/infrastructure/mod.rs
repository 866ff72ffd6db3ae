//! Infrastructure layer - engine implementation and bundled collaborators

pub mod knowledge_base;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod search;
pub mod workflow;
