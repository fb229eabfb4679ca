//! Outer interactive loop.
//!
//! Reads one line at a time, splits it into a command word plus trailing
//! text, and dispatches through an explicit match. Unrecognized lines are
//! appended to the daily log verbatim as timestamped entries. Line editing
//! and persistent history come from rustyline; interrupt or end of input is
//! a clean goodbye, not an error.

use std::io::{stdout, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;

use crate::config::{Config, HISTORY_CAP};
use crate::journal::Journal;
use crate::rotate::{rotate_file, rotated_path};
use crate::todo::todo_loop;

/// The outer REPL: owns the line editor, the config, and the journal.
pub struct Repl {
    cfg: Config,
    journal: Journal,
    rl: DefaultEditor,
}

/// Split a line into its leading command word and the remaining text.
pub fn split_word(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

impl Repl {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let rl_cfg = rustyline::Config::builder()
            .max_history_size(HISTORY_CAP)?
            .auto_add_history(true)
            .build();
        let mut rl = DefaultEditor::with_config(rl_cfg)?;
        if cfg.history_path.exists() {
            rl.load_history(&cfg.history_path)?;
        }
        let journal = Journal::new(&cfg.log_path);
        Ok(Repl { cfg, journal, rl })
    }

    /// Run the interactive loop until quit, interrupt, or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        println!("Welcome to daylog. Files:");
        for path in [
            &self.cfg.log_path,
            &self.cfg.todo_path,
            &self.cfg.history_path,
        ] {
            println!("  {}", path.display());
        }

        // History must survive every exit path, including errors escaping
        // handle_line.
        let result = self.run_loop();
        self.save_history();
        result
    }

    fn run_loop(&mut self) -> anyhow::Result<()> {
        loop {
            match self.rl.readline("log: ") {
                Ok(line) => {
                    if !self.handle_line(&line)? {
                        return Ok(());
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    println!("Goodbye!");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Execute a single line of input (also the one-shot entry point).
    /// Returns false when the loop should stop.
    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }
        let (word, rest) = split_word(line);

        match word.to_lowercase().as_str() {
            "q" | "quit" => return Ok(false),
            "h" | "history" => print!("{}", self.journal.read_all()?),
            "o" | "open" => open_external(&self.cfg.log_path.display().to_string()),
            "c" | "clear" => clear_screen()?,
            "help" => print_help(),
            "newday" | "new-day" => self.cmd_new_day(rest)?,
            "newmeeting" | "new-meeting" => self.cmd_new_meeting(rest)?,
            "t" | "todo" => self.cmd_todo(rest)?,
            "rotate-todo" => {
                rotate_file(&self.cfg.todo_path, self.cfg.max_backups)?;
                println!("Rotated {}", self.cfg.todo_path.display());
            }
            _ => {
                let logged = self.journal.log(line)?;
                println!("{logged}");
            }
        }
        Ok(true)
    }

    /// Enter the todo loop. A numeric argument selects a rotated file as an
    /// alternate list; other text is seeded as a new top-level task.
    fn cmd_todo(&mut self, rest: &str) -> anyhow::Result<()> {
        let mut path = self.cfg.todo_path.clone();
        let mut seed = None;
        if !rest.is_empty() {
            match rest.parse::<u32>() {
                Ok(n) => path = rotated_path(&self.cfg.todo_path, n),
                Err(_) => seed = Some(rest),
            }
        }
        todo_loop(&mut self.rl, &self.journal, &self.cfg, &path, seed)
    }

    /// The new-day ritual: show the log so far, open a dated header, record
    /// yesterday/today summaries, collect scheduled meetings, then check in.
    fn cmd_new_day(&mut self, rest: &str) -> anyhow::Result<()> {
        print!("{}", self.journal.read_all()?);

        let note = if rest.is_empty() {
            self.prompt("Note? ")?
        } else {
            Some(rest.to_string())
        };
        let Some(note) = note else { return Ok(()) };
        self.journal.log_new_day(&note)?;

        for prompt in ["Yesterday, ", "Today, "] {
            let Some(summary) = self.prompt(prompt)? else {
                return Ok(());
            };
            self.journal.append(&format!("{prompt}{summary}"))?;
        }

        while let Some(description) = self.prompt("Next meeting: ")? {
            if description.trim().is_empty() {
                break;
            }
            self.journal.log_meeting(description.trim())?;
        }

        self.journal.log("finished checkin")?;
        open_external(&self.cfg.log_path.display().to_string());
        Ok(())
    }

    fn cmd_new_meeting(&mut self, rest: &str) -> anyhow::Result<()> {
        let description = if rest.is_empty() {
            match self.prompt("Meeting? ")? {
                Some(d) if !d.trim().is_empty() => d,
                _ => return Ok(()),
            }
        } else {
            rest.to_string()
        };
        self.journal.log_meeting(description.trim())?;
        Ok(())
    }

    /// Read one answer line; `None` means the user interrupted.
    fn prompt(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.rl.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist history on every exit path; losing it is annoying but not
    /// worth failing the shutdown over.
    fn save_history(&mut self) {
        if self.rl.history().is_empty() {
            return;
        }
        if let Some(dir) = self.cfg.history_path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = self.rl.save_history(&self.cfg.history_path) {
            eprintln!("Failed to save history: {e}");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  quit | q              exit");
    println!("  history | h           print the log file");
    println!("  open | o              open the log file");
    println!("  new-day [note]        start a new day in the log");
    println!("  new-meeting <desc>    append a meeting block");
    println!("  todo [n | text]       todo list (n = rotated list, text = quick add)");
    println!("  rotate-todo           archive the todo file");
    println!("  clear | c             clear the screen");
    println!("  anything else         logged as a timestamped entry");
}

/// Clear the terminal and park the cursor at the top-left.
pub fn clear_screen() -> std::io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

/// Open a file or URL with the OS default handler (best-effort).
pub fn open_external(target: &str) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = "xdg-open";

    let result = Command::new(opener)
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(e) = result {
        eprintln!("Failed to open {target}: {e}");
    }
}

/// Resolve the effective config: file config overlaid with CLI flag overrides.
pub fn effective_config(
    mut cfg: Config,
    log: Option<PathBuf>,
    todo: Option<PathBuf>,
) -> Config {
    if let Some(p) = log {
        cfg.log_path = p;
    }
    if let Some(p) = todo {
        cfg.todo_path = p;
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_word_separates_command_and_text() {
        assert_eq!(split_word("newday busy week"), ("newday", "busy week"));
        assert_eq!(split_word("quit"), ("quit", ""));
        assert_eq!(split_word("todo 2"), ("todo", "2"));
    }

    #[test]
    fn history_is_saved_even_when_the_loop_exits_with_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            log_path: dir.path().join("log.md"),
            todo_path: dir.path().join("todo.json"),
            history_path: dir.path().join("hist").join("history.txt"),
            ..Config::default()
        };

        let mut repl = Repl::new(cfg).unwrap();
        repl.rl.add_history_entry("dentist at noon").unwrap();
        // run() funnels every exit, error included, through save_history.
        repl.save_history();

        let saved =
            std::fs::read_to_string(dir.path().join("hist").join("history.txt")).unwrap();
        assert!(saved.contains("dentist at noon"));
    }

    #[test]
    fn flag_overrides_win_over_config() {
        let cfg = effective_config(
            Config::default(),
            Some(PathBuf::from("/tmp/other.md")),
            None,
        );
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/other.md"));
        assert_eq!(cfg.todo_path, Config::default().todo_path);
    }
}
