//! Validate command - structural check only

use std::process::ExitCode;

use clap::Args;

use super::WorkflowArgs;
use crate::domain::workflow::validate;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,
}

/// Print the validation result; fails when the workflow is invalid
pub async fn run(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    super::bootstrap()?;

    let workflow = super::load_workflow(&args.workflow.file)?;
    let validation = validate(&workflow);

    println!("{}", serde_json::to_string_pretty(&validation)?);

    Ok(if validation.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
