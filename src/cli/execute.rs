//! Execute command - runs a workflow with the bundled collaborators

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use super::WorkflowArgs;
use crate::domain::knowledge_base::RetrievalSearch;
use crate::domain::workflow::WorkflowExecutor;
use crate::infrastructure::knowledge_base::InMemoryRetrieval;
use crate::infrastructure::llm::UnconfiguredGenerator;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::search::UnconfiguredWebSearch;
use crate::infrastructure::workflow::WorkflowExecutorImpl;

#[derive(Args, Debug, Clone)]
pub struct ExecuteArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,

    /// Query to run through the workflow
    #[arg(short, long)]
    pub query: String,

    /// JSON documents file for knowledge base nodes
    #[arg(short, long)]
    pub documents: Option<PathBuf>,

    /// Per-node timeout in milliseconds, overrides `engine.node_timeout_ms`
    #[arg(long)]
    pub node_timeout_ms: Option<u64>,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    pub metrics: bool,
}

pub async fn run(args: ExecuteArgs) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap()?;
    let metrics = if args.metrics { init_metrics() } else { None };

    let workflow = super::load_workflow(&args.workflow.file)?;

    let retrieval: Arc<dyn RetrievalSearch> = match &args.documents {
        Some(path) => Arc::new(
            InMemoryRetrieval::from_file(path)
                .await
                .context("Failed to load documents")?,
        ),
        None => Arc::new(InMemoryRetrieval::new()),
    };

    let mut executor_config = config.engine.executor_config();
    if args.node_timeout_ms.is_some() {
        executor_config.node_timeout_ms = args.node_timeout_ms;
    }

    let executor = WorkflowExecutorImpl::with_config(
        retrieval,
        Arc::new(UnconfiguredGenerator::new()),
        Arc::new(UnconfiguredWebSearch::new()),
        executor_config,
    );

    info!(file = %args.workflow.file.display(), "Executing workflow");
    let result = executor.execute(&workflow, &args.query).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(metrics) = metrics {
        eprintln!("{}", metrics.render());
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
