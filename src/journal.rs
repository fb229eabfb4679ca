//! Append-only daily log file.
//!
//! Every entry is appended to a single plain-text file: timestamped
//! `HH:MM - text` lines for ordinary entries, a bounded block per meeting,
//! and a dated header block for the "new day" check-in.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Separator closing a meeting block in the log file.
const MEETING_FOOTER: &str = "<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";

/// Handle on the append-only log file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: &Path) -> Self {
        Journal {
            path: path.to_path_buf(),
        }
    }

    /// Append raw text followed by a newline.
    pub fn append(&self, text: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{text}")?;
        Ok(())
    }

    /// Append a timestamped entry: `HH:MM - text`.
    pub fn log(&self, text: &str) -> std::io::Result<String> {
        let line = log_line(Local::now(), text);
        self.append(&line)?;
        Ok(line)
    }

    /// Append a meeting block for the given description.
    pub fn log_meeting(&self, description: &str) -> std::io::Result<()> {
        self.append(&meeting_block(Local::now(), description))
    }

    /// Append the dated header opening a new day.
    pub fn log_new_day(&self, note: &str) -> std::io::Result<()> {
        self.append(&new_day_header(Local::now(), note))
    }

    /// Entire log contents, used by the history command.
    pub fn read_all(&self) -> std::io::Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        std::fs::read_to_string(&self.path)
    }
}

/// `HH:MM - text`, 24-hour and zero-padded.
pub fn log_line(when: DateTime<Local>, text: &str) -> String {
    format!("{} - {}", when.format("%H:%M"), text)
}

/// A meeting block: dated title line, space for notes, closing separator.
pub fn meeting_block(when: DateTime<Local>, description: &str) -> String {
    format!(
        "--- {} {} ---\n\n \n{}",
        when.format("%m/%d/%Y (%A)"),
        description,
        MEETING_FOOTER
    )
}

/// The header block that starts a new day in the log.
pub fn new_day_header(when: DateTime<Local>, note: &str) -> String {
    format!(
        "---{}--- {}\nin {}",
        when.format("%m/%d/%Y (%A)"),
        note,
        when.format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 8, h, m, 0).unwrap()
    }

    #[test]
    fn log_line_is_zero_padded_24_hour() {
        assert_eq!(log_line(at(9, 5), "stand-up"), "09:05 - stand-up");
        assert_eq!(log_line(at(14, 30), "review"), "14:30 - review");
    }

    #[test]
    fn meeting_block_has_date_stamp_and_separator() {
        let block = meeting_block(at(10, 0), "design sync");
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "--- 03/08/2024 (Friday) design sync ---");
        assert_eq!(*lines.last().unwrap(), MEETING_FOOTER);
    }

    #[test]
    fn new_day_header_carries_note_and_clock_in() {
        let header = new_day_header(at(8, 45), "short week");
        assert_eq!(header, "---03/08/2024 (Friday)--- short week\nin 08:45");
    }

    #[test]
    fn append_accumulates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(&dir.path().join("log.md"));
        journal.append("first").unwrap();
        journal.append("second").unwrap();
        assert_eq!(journal.read_all().unwrap(), "first\nsecond\n");
    }

    #[test]
    fn read_all_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(&dir.path().join("log.md"));
        assert_eq!(journal.read_all().unwrap(), "");
    }
}
