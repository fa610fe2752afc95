use std::sync::Arc;

use job_board::api::{HttpJobApi, JobApi};
use job_board::board::JobBoard;
use job_board::cli;
use job_board::config::ClientConfig;
use job_board::jobs::JobFilter;
use job_board::notify::{ConsoleNotifier, Notifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the job table on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;

    eprintln!("📋 Job Board v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.base_url);
    eprintln!("   Timeout: {}s", config.request_timeout.as_secs());
    eprintln!("   Type 'help' for commands, 'quit' to exit.\n");

    let api: Arc<dyn JobApi> = Arc::new(HttpJobApi::new(&config)?);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new());
    let board = JobBoard::new(api, notifier);

    // A failed first load is already reported; the REPL can retry with `list`.
    if let Err(e) = board.load(JobFilter::All).await {
        tracing::warn!(error = %e, "Initial load failed");
    }

    cli::run(board).await
}
