//! Toolsmith command-line entry point.

use clap::Parser;
use std::process::ExitCode;
use toolsmith::cli::{Cli, run};
use toolsmith_core::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing("warn", cli.log_format) {
        eprintln!("{}", e);
    }

    run(cli).await
}
