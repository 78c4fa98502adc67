use adoc_corpus::cli::{run, Cli};
use adoc_corpus::logging;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(&cli.log_level);
    tracing::info!("CLI arguments parsed, invoking run");

    match run(cli).await {
        Ok(outcome) => {
            tracing::info!(?outcome, "CLI completed");
            outcome.exit_code()
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "CLI exited with error");
            eprintln!("[ERROR] {e:#}");
            ExitCode::FAILURE
        }
    }
}
