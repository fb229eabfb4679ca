use std::path::PathBuf;

use clap::Parser;

/// Personal daily-log and hierarchical todo list.
/// With no arguments an interactive prompt starts; any arguments are joined
/// into a single input line, executed once, and the process exits.
#[derive(Parser)]
#[command(name = "dl", version, about = "Daily log and todo list CLI")]
pub struct Cli {
    /// Path to the daily log file (overrides the config file).
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Path to the todo backing file (overrides the config file).
    #[arg(long)]
    pub todo: Option<PathBuf>,

    /// One-shot input line, e.g. `dl new-meeting design sync`.
    #[arg(trailing_var_arg = true)]
    pub line: Vec<String>,
}
