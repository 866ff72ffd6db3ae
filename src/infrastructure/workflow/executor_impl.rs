//! Workflow executor implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::node_runtime::{NodeRuntime, NodeRuntimeConfig};
use crate::domain::knowledge_base::RetrievalSearch;
use crate::domain::llm::Generator;
use crate::domain::search::WebSearch;
use crate::domain::workflow::{
    first_present, predecessors, topological_sort, validate, value_to_text, ExecutionContext,
    ExecutionResult, ExecutionStep, Node, NodeData, NodeType, WorkflowDefinition, WorkflowError,
    WorkflowExecutor, WorkflowValidation,
};
use crate::infrastructure::observability;

/// Configuration for the workflow executor
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowExecutorConfig {
    /// Per-node time limit in milliseconds; `None` waits indefinitely
    pub node_timeout_ms: Option<u64>,

    /// Limits passed to collaborator calls
    pub runtime: NodeRuntimeConfig,
}

/// Sequential, fail-fast workflow executor
#[derive(Debug)]
pub struct WorkflowExecutorImpl {
    /// Node behaviour and its collaborators
    runtime: NodeRuntime,

    /// Executor configuration
    config: WorkflowExecutorConfig,
}

impl WorkflowExecutorImpl {
    /// Create a new executor
    pub fn new(
        retrieval: Arc<dyn RetrievalSearch>,
        generator: Arc<dyn Generator>,
        web_search: Arc<dyn WebSearch>,
    ) -> Self {
        Self::with_config(
            retrieval,
            generator,
            web_search,
            WorkflowExecutorConfig::default(),
        )
    }

    /// Create with custom configuration
    pub fn with_config(
        retrieval: Arc<dyn RetrievalSearch>,
        generator: Arc<dyn Generator>,
        web_search: Arc<dyn WebSearch>,
        config: WorkflowExecutorConfig,
    ) -> Self {
        Self {
            runtime: NodeRuntime::new(retrieval, generator, web_search).with_config(config.runtime),
            config,
        }
    }

    /// Run one node, honouring the configured timeout
    async fn execute_node(
        &self,
        node: &Node,
        inputs: &NodeData,
    ) -> Result<NodeData, WorkflowError> {
        match self.config.node_timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                self.runtime.run(node, inputs),
            )
            .await
            .unwrap_or_else(|_| Err(WorkflowError::timeout(node.id(), timeout_ms))),
            None => self.runtime.run(node, inputs).await,
        }
    }

    async fn run(&self, workflow: &WorkflowDefinition, query: &str) -> ExecutionResult {
        let start = Instant::now();

        let validation = self.validate(workflow);
        if !validation.valid {
            let error = WorkflowError::validation(validation.joined_messages());
            warn!(error = %error, "Refusing to execute invalid workflow");
            return finish(ExecutionResult::failure(
                error.to_string(),
                Vec::new(),
                as_millis(start.elapsed()),
            ));
        }

        let order = topological_sort(workflow);
        let upstream = predecessors(workflow);
        let mut context = ExecutionContext::new(query);
        let mut steps = Vec::with_capacity(order.len());
        let mut response = String::new();

        for node in order {
            let sources = upstream.get(node.id()).map(Vec::as_slice).unwrap_or_default();
            let inputs = context.gather_inputs(sources.iter().copied());

            let mut step = ExecutionStep::running(node.id(), node.node_type());
            let node_start = Instant::now();

            debug!(
                node_id = node.id(),
                node_type = %node.node_type(),
                inputs = sources.len(),
                "Executing node"
            );

            let outcome = self.execute_node(node, &inputs).await;
            let elapsed = node_start.elapsed();
            observability::record_node(node.node_type().as_str(), outcome.is_ok(), elapsed);

            match outcome {
                Ok(output) => {
                    if node.node_type() == NodeType::Output {
                        response = first_present(&output, &["response", "context"])
                            .map(value_to_text)
                            .unwrap_or_default();
                    }

                    context.set_node_output(node.id(), output.clone());
                    step.complete(output, as_millis(elapsed));
                    steps.push(step);
                }
                Err(e) => {
                    let error = e.to_string();
                    warn!(node_id = node.id(), error = %error, "Node failed, aborting workflow");

                    step.fail(error.clone(), as_millis(elapsed));
                    steps.push(step);

                    return finish(ExecutionResult::failure(
                        error,
                        steps,
                        as_millis(start.elapsed()),
                    ));
                }
            }
        }

        finish(ExecutionResult::success(
            response,
            steps,
            as_millis(start.elapsed()),
        ))
    }
}

fn as_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// Log and record metrics for a finished run
fn finish(result: ExecutionResult) -> ExecutionResult {
    info!(
        success = result.success,
        steps = result.steps.len(),
        duration_ms = result.total_duration_ms,
        "Workflow execution finished"
    );
    observability::record_execution(
        result.success,
        Duration::from_millis(result.total_duration_ms),
    );
    result
}

#[async_trait]
impl WorkflowExecutor for WorkflowExecutorImpl {
    fn validate(&self, workflow: &WorkflowDefinition) -> WorkflowValidation {
        let validation = validate(workflow);
        for error in &validation.errors {
            observability::record_validation_failure(error.code.as_str());
        }
        validation
    }

    async fn execute(&self, workflow: &WorkflowDefinition, query: &str) -> ExecutionResult {
        let execution_id = Uuid::new_v4();
        let span = info_span!(
            "workflow_execution",
            %execution_id,
            nodes = workflow.node_count(),
            edges = workflow.edge_count()
        );

        self.run(workflow, query).instrument(span).await
    }
}
