//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Search GitHub repositories and bookmark them locally
///
/// Starts an interactive terminal session: type to search, move through
/// the results, and toggle bookmarks that persist across sessions.
#[derive(Debug, Parser)]
#[command(name = "repomark")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Initial search query
    ///
    /// The session starts with this query already entered, as if it had
    /// just been typed.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Start with the bookmarked-only view enabled
    #[arg(short, long, default_value = "false")]
    pub bookmarked: bool,

    /// Path to configuration file
    ///
    /// If not specified, searches for repomark.toml in:
    /// 1. $REPOMARK_CONFIG environment variable
    /// 2. Current directory
    /// 3. ~/.config/repomark/repomark.toml
    #[arg(short, long, value_name = "FILE", env = "REPOMARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    ///
    /// Valid values: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info", env = "REPOMARK_LOG")]
    pub log_level: String,

    /// Log file path
    ///
    /// The terminal is owned by the interactive session, so logs go to a
    /// file rather than stderr. Defaults to repomark.log in the platform
    /// data directory.
    #[arg(long, value_name = "FILE", env = "REPOMARK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}
