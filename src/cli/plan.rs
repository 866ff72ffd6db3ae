//! Plan command - prints the topological execution order

use std::process::ExitCode;

use clap::Args;

use super::WorkflowArgs;
use crate::domain::workflow::{topological_sort, validate, WorkflowDefinition};

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,
}

pub async fn run(args: PlanArgs) -> anyhow::Result<ExitCode> {
    super::bootstrap()?;

    let workflow = super::load_workflow(&args.workflow.file)?;
    let validation = validate(&workflow);
    if !validation.valid {
        for error in &validation.errors {
            eprintln!("{}: {}", error.code, error.message);
        }
        return Ok(ExitCode::FAILURE);
    }

    for line in plan_lines(&workflow) {
        println!("{}", line);
    }
    Ok(ExitCode::SUCCESS)
}

/// One numbered line per node in execution order
fn plan_lines(workflow: &WorkflowDefinition) -> Vec<String> {
    topological_sort(workflow)
        .into_iter()
        .enumerate()
        .map(|(i, node)| {
            if node.label() == node.id() {
                format!("{}. {} [{}]", i + 1, node.id(), node.node_type())
            } else {
                format!(
                    "{}. {} [{}] {}",
                    i + 1,
                    node.id(),
                    node.node_type(),
                    node.label()
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::{Edge, KnowledgeBaseConfig, Node};

    #[test]
    fn test_plan_lines() {
        let workflow = WorkflowDefinition::new(
            vec![
                Node::output("out"),
                Node::knowledge_base("kb", KnowledgeBaseConfig::new()).with_label("Docs"),
                Node::user_query("q"),
            ],
            vec![Edge::new("q", "kb"), Edge::new("kb", "out")],
        )
        .unwrap();

        assert_eq!(
            plan_lines(&workflow),
            vec![
                "1. q [userQuery]",
                "2. kb [knowledgeBase] Docs",
                "3. out [output]",
            ]
        );
    }
}
