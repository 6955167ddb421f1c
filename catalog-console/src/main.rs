//! `catalog`：库存、图书、菜单、待办的控制台管理工具
//!
//! ```bash
//! catalog products --data-dir ./data
//! RUST_LOG=debug catalog tasks --in-memory
//! ```
//!
mod app;
mod config;
mod error;
mod forms;
mod menu;
mod prompt;

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let settings = Settings::from(Cli::parse());

    let stdin = io::stdin();
    let stdout = io::stdout();
    app::run(&settings, stdin.lock(), stdout.lock()).await?;
    Ok(())
}
