//! Workflow infrastructure implementations

mod executor_impl;
mod node_runtime;

pub use executor_impl::{WorkflowExecutorConfig, WorkflowExecutorImpl};
pub use node_runtime::{NodeRuntime, NodeRuntimeConfig};
