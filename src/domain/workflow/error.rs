//! Workflow error types

use thiserror::Error;

/// Errors that can occur while building or running a workflow
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),

    #[error("Workflow validation failed: {0}")]
    Validation(String),

    /// A node failed; the message is surfaced verbatim in the trace
    #[error("{0}")]
    NodeExecution(String),

    #[error("Node '{node_id}' timed out after {timeout_ms}ms")]
    Timeout { node_id: String, timeout_ms: u64 },
}

impl WorkflowError {
    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn node_execution(message: impl Into<String>) -> Self {
        Self::NodeExecution(message.into())
    }

    /// Generation collaborator reported a failure
    pub fn llm(message: impl AsRef<str>) -> Self {
        Self::NodeExecution(format!("LLM Error: {}", message.as_ref()))
    }

    pub fn timeout(node_id: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            node_id: node_id.into(),
            timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::validation("Workflow must have an Output component");
        assert_eq!(
            err.to_string(),
            "Workflow validation failed: Workflow must have an Output component"
        );

        let err = WorkflowError::llm("rate limited");
        assert_eq!(err.to_string(), "LLM Error: rate limited");

        let err = WorkflowError::timeout("llm-1", 5000);
        assert_eq!(err.to_string(), "Node 'llm-1' timed out after 5000ms");
    }

    #[test]
    fn test_node_execution_is_verbatim() {
        let err = WorkflowError::node_execution("Knowledge base error: offline");
        assert_eq!(err.to_string(), "Knowledge base error: offline");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(WorkflowError::llm("x"), WorkflowError::llm("x"));
        assert_ne!(WorkflowError::llm("x"), WorkflowError::llm("y"));
    }
}
