//! Workflow Engine
//!
//! Validates and executes node-graph workflows that answer a user query with
//! retrieval-augmented generation:
//! - Structural validation with coded, collected errors
//! - Cycle detection and topological ordering
//! - Sequential, fail-fast execution with a per-node trace
//! - Pluggable retrieval, generation and web search collaborators

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    ExecutionResult, WorkflowDefinition, WorkflowError, WorkflowExecutor, WorkflowValidation,
};
pub use infrastructure::workflow::{WorkflowExecutorConfig, WorkflowExecutorImpl};
