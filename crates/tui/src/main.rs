mod app;
mod client;
mod config;
mod error;
mod parsing;
mod session_store;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    tracing::info!(base_url = %config.base_url, "starting");
    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
