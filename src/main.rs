//! Demo binary: resolves connection parameters from the environment and
//! runs the sequential flow.

use opensearch_demo::{ClientConfig, demo};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = demo::run(ClientConfig::from_env()).await {
        error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
