//! # dl - Daily Log CLI
//!
//! A personal daily-log and hierarchical-todo command-line tool.
//!
//! ## Key Features
//!
//! - **Timestamped Journal**: every line you type that isn't a command is
//!   appended to a plain-text log file as `HH:MM - <text>`
//! - **New-Day Ritual**: `new-day` records a dated header, yesterday/today
//!   summaries, and a block for each scheduled meeting
//! - **Hierarchical Todo List**: a tree of tasks with priorities, completion
//!   state, and external issue numbers, driven by a one-letter grammar
//!   (`A buy milk`, `A1 get oat milk`, `P2`, `F1`, `I1 423`)
//! - **Rotation**: `rotate-todo` archives the todo file through numbered
//!   backups; `todo <n>` opens backup `n` as an alternate list
//! - **Persistent History**: input history survives across invocations
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive prompt
//! dl
//!
//! # One-shot: log an entry and exit
//! dl picked up the server migration
//!
//! # One-shot: append a meeting block
//! dl new-meeting design sync
//! ```
//!
//! Files live under the platform data directory by default and can be moved
//! via `~/.config/daylog/config.toml` or the `--log` / `--todo` flags.

use clap::Parser;

pub mod cli;
pub mod config;
pub mod journal;
pub mod repl;
pub mod rotate;
pub mod session;
pub mod store;
pub mod task;
pub mod todo;
pub mod tree;

use cli::Cli;
use repl::Repl;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = repl::effective_config(config::load_or_default(), cli.log, cli.todo);

    let mut repl = Repl::new(cfg)?;
    if cli.line.is_empty() {
        repl.run()
    } else {
        // One-shot mode: the arguments form a single input line.
        repl.handle_line(&cli.line.join(" "))?;
        Ok(())
    }
}
