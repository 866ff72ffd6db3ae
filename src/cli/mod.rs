//! CLI module for the workflow engine
//!
//! Subcommands:
//! - `validate`: structural check of a workflow file
//! - `plan`: print the execution order of a valid workflow
//! - `execute`: run a query through a workflow with the bundled collaborators

pub mod execute;
pub mod plan;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::workflow::WorkflowDefinition;
use crate::infrastructure::logging;

/// Workflow engine - validate and run node-graph RAG workflows
#[derive(Parser)]
#[command(name = "workflow-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a workflow's structure and print the result as JSON
    Validate(validate::ValidateArgs),

    /// Print the order nodes would run in
    Plan(plan::PlanArgs),

    /// Run a query through a workflow and print the execution result as JSON
    Execute(execute::ExecuteArgs),
}

/// Workflow file argument shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct WorkflowArgs {
    /// Path to a workflow definition (JSON)
    pub file: PathBuf,
}

/// Load `.env` and configuration, then start logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Read and parse a workflow definition file
pub fn load_workflow(path: &Path) -> anyhow::Result<WorkflowDefinition> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflow file '{}'", path.display()))?;

    WorkflowDefinition::from_json(&json)
        .with_context(|| format!("Failed to parse workflow file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_execute_args() {
        let cli = Cli::try_parse_from([
            "workflow-engine",
            "execute",
            "flow.json",
            "--query",
            "What is Rust?",
            "--documents",
            "docs.json",
            "--metrics",
        ])
        .unwrap();

        match cli.command {
            Command::Execute(args) => {
                assert_eq!(args.workflow.file, PathBuf::from("flow.json"));
                assert_eq!(args.query, "What is Rust?");
                assert_eq!(args.documents, Some(PathBuf::from("docs.json")));
                assert!(args.metrics);
                assert!(args.node_timeout_ms.is_none());
            }
            _ => panic!("expected execute"),
        }
    }

    #[test]
    fn test_execute_requires_query() {
        assert!(Cli::try_parse_from(["workflow-engine", "execute", "flow.json"]).is_err());
    }

    #[test]
    fn test_load_missing_workflow() {
        let err = load_workflow(Path::new("/nonexistent/flow.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read workflow file"));
    }
}
