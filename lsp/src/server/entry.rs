use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use super::{cli::try_cli_analyze, state::TantrumsLanguageServer};

pub(crate) const LOG_ENV: &str = "TANTRUMS_LOG";

pub async fn run() {
    if let Some(output) = try_cli_analyze().unwrap_or_else(|e| {
        eprintln!("tantrums-lsp analyze error: {e:#}");
        std::process::exit(2);
    }) {
        println!("{output}");
        return;
    }

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(TantrumsLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
