mod cli;
mod commands;
mod render;

use anyhow::Context;
use catchbook_client_core::{ClientConfig, HttpRemote, Session};
use clap::Parser;
use cli::Cli;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Diagnostics go to stderr so CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catchbook=info,catchbook_client_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let remote = HttpRemote::new(&config)
        .context("No backend configured: set CATCHBOOK_API_URL or pass --api-url")?;
    tracing::debug!("Using backend {}", remote.endpoint());

    let mut session = Session::new(Arc::new(remote), chrono::Local::now().date_naive());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&mut session, cli.command, &mut out).await?;
    out.flush()?;
    Ok(())
}
