//! Numbered backup rotation for the todo backing file.
//!
//! `todo.json` becomes `todo.json.1`, an existing `todo.json.1` becomes
//! `todo.json.2`, and so on up to `max_backups`; the oldest backup falls off
//! the end. Rotated files double as alternate lists: the REPL's `todo <n>`
//! opens `todo.json.n` directly.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Path of the `i`-th rotated variant: `name.i` next to the original.
pub fn rotated_path(path: &Path, i: u32) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.{i}"))
}

/// Shift numbered backups up by one, archive the active file as `.1`, and
/// create a fresh empty active file. A missing active file is a no-op, so
/// repeated invocation is safe.
pub fn rotate_file(path: &Path, max_backups: u32) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }

    for i in (1..max_backups).rev() {
        let from = rotated_path(path, i);
        if from.exists() {
            fs::rename(from, rotated_path(path, i + 1))?;
        }
    }

    fs::rename(path, rotated_path(path, 1))?;
    File::create(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotated_path_appends_numeric_suffix() {
        let p = rotated_path(Path::new("/tmp/todo.json"), 3);
        assert_eq!(p, PathBuf::from("/tmp/todo.json.3"));
    }

    #[test]
    fn missing_active_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.json");
        rotate_file(&path, 10).unwrap();
        rotate_file(&path, 10).unwrap();
        assert!(!path.exists());
        assert!(!rotated_path(&path, 1).exists());
    }

    #[test]
    fn first_rotation_produces_dot_one_and_fresh_active() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.json");
        fs::write(&path, "original").unwrap();

        rotate_file(&path, 10).unwrap();

        assert_eq!(fs::read_to_string(rotated_path(&path, 1)).unwrap(), "original");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(!rotated_path(&path, 2).exists());
    }

    #[test]
    fn repeated_rotation_shifts_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.json");

        fs::write(&path, "first").unwrap();
        rotate_file(&path, 10).unwrap();
        fs::write(&path, "second").unwrap();
        rotate_file(&path, 10).unwrap();

        assert_eq!(fs::read_to_string(rotated_path(&path, 1)).unwrap(), "second");
        assert_eq!(fs::read_to_string(rotated_path(&path, 2)).unwrap(), "first");
    }

    #[test]
    fn oldest_backup_is_dropped_at_the_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.json");

        for n in 0..4 {
            fs::write(&path, format!("gen{n}")).unwrap();
            rotate_file(&path, 2).unwrap();
        }

        assert_eq!(fs::read_to_string(rotated_path(&path, 1)).unwrap(), "gen3");
        assert_eq!(fs::read_to_string(rotated_path(&path, 2)).unwrap(), "gen2");
        assert!(!rotated_path(&path, 3).exists());
    }
}
