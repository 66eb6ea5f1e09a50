//! Binary crate for the `widget` command-line tool.
//!
//! This crate stands in for the home-screen host:
//! - Storing the server address (the config source)
//! - Triggering refresh cycles, once or on a schedule
//! - Printing snapshots (the renderer)

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod render;

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "widget_core=info,widget_cli=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
