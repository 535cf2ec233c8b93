//! `caixa` binary: one operator session over stdin/stdout.

use std::process::ExitCode;

use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    caixa_cli::init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting caixa");

    match caixa_cli::run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await {
        Ok(summary) => {
            info!(
                committed = summary.committed.len(),
                failed = summary.failed,
                cancelled = summary.cancelled,
                "Session finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Session aborted");
            println!("Erro geral: {err}");
            ExitCode::FAILURE
        }
    }
}
