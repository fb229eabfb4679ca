//! Interactive todo loop and its one-letter command grammar.
//!
//! Each input line is an optional single letter, an optional decimal task id
//! glued straight onto it, and optional trailing text: `P3` prioritizes task
//! 3, `A2 draft outline` adds a subtask under task 2, `F1` finishes task 1.
//! An empty line quits; anything that doesn't parse as a command becomes a
//! new top-level task. The grammar is resolved through an explicit match,
//! built once, not by reflection.

use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::Config;
use crate::journal::Journal;
use crate::repl::{clear_screen, open_external};
use crate::session::TodoSession;
use crate::store::TodoError;

/// One parsed line of todo-loop input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCmd {
    /// Empty line: commit and leave the loop.
    Quit,
    Prioritize(u64),
    Finish(u64),
    Delete(u64),
    Add { parent: Option<u64>, text: String },
    Show(Option<u64>),
    Clear,
    /// Open the task's external issue link.
    Open(u64),
    /// Attach an issue number; the text must be numeric.
    Issue { id: u64, text: String },
    /// Fallback: the whole line is a new top-level task description.
    Plain(String),
}

/// Parse one line of input against the letter/id/text grammar.
pub fn parse_command(line: &str) -> TodoCmd {
    let line = line.trim();
    if line.is_empty() {
        return TodoCmd::Quit;
    }

    let mut chars = line.chars();
    let letter = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        _ => return TodoCmd::Plain(line.to_string()),
    };
    let rest = chars.as_str();
    let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    let id: Option<u64> = if digit_len == 0 {
        None
    } else {
        match rest[..digit_len].parse() {
            Ok(n) => Some(n),
            Err(_) => return TodoCmd::Plain(line.to_string()),
        }
    };
    let text = rest[digit_len..].trim();

    match (letter, id, text.is_empty()) {
        ('P', Some(id), _) => TodoCmd::Prioritize(id),
        ('F', Some(id), _) => TodoCmd::Finish(id),
        ('D', Some(id), _) => TodoCmd::Delete(id),
        ('O', Some(id), _) => TodoCmd::Open(id),
        ('A', parent, false) => TodoCmd::Add {
            parent,
            text: text.to_string(),
        },
        ('S', id, true) => TodoCmd::Show(id),
        ('C', None, true) => TodoCmd::Clear,
        ('I', Some(id), false) => TodoCmd::Issue {
            id,
            text: text.to_string(),
        },
        _ => TodoCmd::Plain(line.to_string()),
    }
}

/// Run the interactive todo loop against the given backing file.
///
/// `seed` is optional free text added as a top-level task before the loop
/// starts (from `todo <text>` at the outer prompt). Interrupt or end of
/// input drops the session, rolling back anything uncommitted.
pub fn todo_loop(
    rl: &mut DefaultEditor,
    journal: &Journal,
    cfg: &Config,
    path: &Path,
    seed: Option<&str>,
) -> anyhow::Result<()> {
    let mut session = TodoSession::open(path)?;

    if let Some(text) = seed {
        let task = session.add_task(text, None)?;
        journal.log(&format!("Added {}", task.description))?;
        session.commit()?;
    }

    print!("{}", session.show_task(None)?);

    loop {
        let line = match rl.readline("todo> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        match parse_command(&line) {
            TodoCmd::Quit => {
                session.close()?;
                return Ok(());
            }
            TodoCmd::Show(id) => {
                match session.show_task(id) {
                    Ok(rendered) => print!("{rendered}"),
                    Err(e) => eprintln!("{e}"),
                }
                continue;
            }
            TodoCmd::Clear => {
                clear_screen()?;
            }
            TodoCmd::Open(id) => {
                open_issue(&session, cfg, id);
                continue;
            }
            cmd => {
                if let Err(e) = apply(&mut session, journal, cmd) {
                    match e {
                        TodoError::NotFound(_)
                        | TodoError::InvalidParent(_)
                        | TodoError::Validation(_) => {
                            eprintln!("{e}");
                            continue;
                        }
                        fatal => return Err(fatal.into()),
                    }
                }
                session.commit()?;
            }
        }

        print!("{}", session.show_task(None)?);
    }
}

/// Apply one mutating command and echo it to the journal.
fn apply(session: &mut TodoSession, journal: &Journal, cmd: TodoCmd) -> Result<(), TodoError> {
    match cmd {
        TodoCmd::Prioritize(id) => {
            let task = session.prioritize(id)?;
            journal.log(&format!("Prioritized {}", task.description))?;
        }
        TodoCmd::Finish(id) => {
            let task = session.mark_done(id)?;
            journal.log(&format!("Finished {}", task.description))?;
        }
        TodoCmd::Delete(id) => {
            let task = session.delete_task(id)?;
            journal.log(&format!("Deleted {}", task.description))?;
        }
        TodoCmd::Add { parent, text } => {
            let task = session.add_task(&text, parent)?;
            journal.log(&format!("Added {}", task.description))?;
        }
        TodoCmd::Plain(text) => {
            let task = session.add_task(&text, None)?;
            journal.log(&format!("Added {}", task.description))?;
        }
        TodoCmd::Issue { id, text } => {
            session.set_issue_number(id, &text)?;
        }
        TodoCmd::Quit | TodoCmd::Show(_) | TodoCmd::Clear | TodoCmd::Open(_) => {}
    }
    Ok(())
}

fn open_issue(session: &TodoSession, cfg: &Config, id: u64) {
    let task = match session.task(id) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let Some(n) = task.issue_number else {
        eprintln!("task {id} has no issue number");
        return;
    };
    match cfg.issue_url.as_deref() {
        Some(base) => open_external(&format!("{base}{n}")),
        None => eprintln!("no issue_url configured"),
    }
}
