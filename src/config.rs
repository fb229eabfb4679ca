//! Configuration for file locations and behaviour.
//!
//! All paths are carried in an explicit `Config` value that gets passed into
//! the REPL and session constructors; there is no global mutable state. The
//! defaults live under the platform data directory and can be overridden by
//! a TOML config file and then by command-line flags.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Maximum number of lines kept in the interactive history file.
pub const HISTORY_CAP: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Append-only daily log file.
    pub log_path: PathBuf,
    /// Active todo backing file.
    pub todo_path: PathBuf,
    /// Interactive command history, persisted across invocations.
    pub history_path: PathBuf,
    /// How many rotated todo backups to keep.
    pub max_backups: u32,
    /// Base URL for external issue links; the issue number is appended.
    pub issue_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let base = ProjectDirs::from("com", "pbower", "daylog")
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Config {
            log_path: base.join("log.md"),
            todo_path: base.join("todo.json"),
            history_path: base.join("history.txt"),
            max_backups: 10,
            issue_url: None,
        }
    }
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "pbower", "daylog").map(|d| d.config_dir().join("config.toml"))
}

/// Load the config file if one exists, falling back to defaults otherwise.
/// A malformed config file is reported and ignored rather than fatal.
pub fn load_or_default() -> Config {
    let Some(file) = config_file() else {
        return Config::default();
    };
    match std::fs::read_to_string(&file) {
        Ok(s) => match toml::from_str(&s) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Ignoring malformed config {}: {e}", file.display());
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}
