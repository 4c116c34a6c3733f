//! Hello client binary

use anyhow::{Context, Result};
use hello_client::{run, Config};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    if let Err(e) = run(config).await {
        error!("Hello flow aborted: {}", e);
        return Err(e).context("Hello flow failed");
    }

    println!("Success");
    Ok(())
}
