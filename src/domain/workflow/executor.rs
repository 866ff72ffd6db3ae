//! Workflow executor trait and result types

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::context::NodeData;
use super::entity::WorkflowDefinition;
use super::node_types::NodeType;
use super::validation::WorkflowValidation;

/// Lifecycle state of a trace step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// Trace entry for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    pub node_id: String,

    pub node_type: NodeType,

    pub status: StepStatus,

    /// Node output once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<NodeData>,

    /// Failure message when status is `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ExecutionStep {
    /// A step that has started running
    pub fn running(node_id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            node_id: node_id.into(),
            node_type,
            status: StepStatus::Running,
            output: None,
            error: None,
            duration_ms: None,
        }
    }

    pub fn complete(&mut self, output: NodeData, duration_ms: u64) {
        self.status = StepStatus::Completed;
        self.output = Some(output);
        self.duration_ms = Some(duration_ms);
    }

    pub fn fail(&mut self, error: impl Into<String>, duration_ms: u64) {
        self.status = StepStatus::Error;
        self.error = Some(error.into());
        self.duration_ms = Some(duration_ms);
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

/// Result of executing a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,

    /// Final response read from the output node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Top-level failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub steps: Vec<ExecutionStep>,

    pub total_duration_ms: u64,
}

impl ExecutionResult {
    pub fn success(
        response: impl Into<String>,
        steps: Vec<ExecutionStep>,
        total_duration_ms: u64,
    ) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            error: None,
            steps,
            total_duration_ms,
        }
    }

    pub fn failure(
        error: impl Into<String>,
        steps: Vec<ExecutionStep>,
        total_duration_ms: u64,
    ) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
            steps,
            total_duration_ms,
        }
    }

    /// The step that failed, if any
    pub fn failed_step(&self) -> Option<&ExecutionStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Error)
    }
}

/// Validates and runs workflow graphs.
///
/// Both operations are stateless: nothing is kept between calls, so one executor
/// can serve concurrent runs.
#[async_trait]
pub trait WorkflowExecutor: Send + Sync + Debug {
    /// Check a workflow's structure
    fn validate(&self, workflow: &WorkflowDefinition) -> WorkflowValidation;

    /// Run a query through a workflow. Failures are reported in the result.
    async fn execute(&self, workflow: &WorkflowDefinition, query: &str) -> ExecutionResult;
}
