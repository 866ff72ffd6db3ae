use std::process::ExitCode;

use clap::Parser;
use workflow_engine::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => cli::validate::run(args).await,
        Command::Plan(args) => cli::plan::run(args).await,
        Command::Execute(args) => cli::execute::run(args).await,
    }
}
