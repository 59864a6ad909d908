//! repomark - GitHub repository search with local bookmarks
//!
//! This binary provides an interactive terminal session for searching
//! GitHub repositories and curating a locally persisted set of bookmarks.

use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use clap::Parser;

mod args;
mod logging;
mod tui;

use args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    logging::init(&args.log_level, args.log_file.as_deref())?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting repomark"
    );

    // Load configuration
    let config = if let Some(config_path) = &args.config {
        repomark_core::Config::load_from(config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?
    } else {
        repomark_core::Config::load()
            .context("failed to load configuration")?
    };

    tracing::debug!(
        base_url = %config.api.base_url,
        debounce_ms = config.search.debounce_ms,
        "configuration loaded"
    );

    if !std::io::stdout().is_terminal() {
        bail!("repomark draws an interactive interface and requires a terminal");
    }

    let mut controller = repomark_core::session(&config).context("failed to start session")?;
    controller.set_bookmarked_only(args.bookmarked);
    if let Some(query) = args.query {
        controller.set_query(query);
    }

    let terminal = ratatui::init();
    let result = tui::App::new(controller).run(terminal).await;
    ratatui::restore();

    tracing::info!("repomark shutdown complete");
    result
}
