//! Copy-then-delete moves between the toolbar folder and its backup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ToolbarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveReport {
    pub moved: usize,
}

/// Copies every file of `source` into `dest`, overwriting same-named
/// files, then deletes the originals.
///
/// Not atomic: on failure the files copied so far stay copied, the
/// originals deleted so far stay deleted, and the error is returned.
pub fn archive_all(source: &Path, dest: &Path) -> Result<ArchiveReport> {
    fs::create_dir_all(dest)
        .map_err(|e| ToolbarError::io("Failed to create destination folder", dest, e))?;

    let files = list_files(source)?;

    for file in &files {
        let Some(name) = file.file_name() else {
            continue;
        };
        let target = dest.join(name);
        fs::copy(file, &target).map_err(|e| {
            ToolbarError::io(format!("Failed to copy to {}", target.display()), file, e)
        })?;
    }

    for file in &files {
        fs::remove_file(file).map_err(|e| ToolbarError::io("Failed to delete", file, e))?;
    }

    log::info!(
        "archived {} files from {} to {}",
        files.len(),
        source.display(),
        dest.display()
    );
    Ok(ArchiveReport { moved: files.len() })
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir =
        fs::read_dir(dir).map_err(|e| ToolbarError::io("Failed to read folder", dir, e))?;
    let mut files: Vec<PathBuf> = read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| {
                (
                    e.file_name().to_string_lossy().to_string(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn moves_every_file_and_creates_destination() {
        let root = TempDir::new().unwrap();
        let library = root.path().join("Custom_Toolbar");
        let backup = root.path().join("Backup_Shortcuts");
        fs::create_dir(&library).unwrap();
        fs::write(library.join("a.lnk"), "a").unwrap();
        fs::write(library.join("b.exe"), "b").unwrap();
        fs::write(library.join("readme.txt"), "r").unwrap();

        let report = archive_all(&library, &backup).unwrap();
        assert_eq!(report.moved, 3);
        assert!(snapshot(&library).is_empty());
        assert_eq!(snapshot(&backup).len(), 3);
    }

    #[test]
    fn archive_and_restore_round_trips_file_set() {
        let root = TempDir::new().unwrap();
        let library = root.path().join("lib");
        let backup = root.path().join("bak");
        fs::create_dir(&library).unwrap();
        fs::write(library.join("one.lnk"), "1").unwrap();
        fs::write(library.join("two.lnk"), "22").unwrap();
        let before = snapshot(&library);

        archive_all(&library, &backup).unwrap();
        archive_all(&backup, &library).unwrap();

        assert_eq!(snapshot(&library), before);
        assert!(snapshot(&backup).is_empty());
    }

    #[test]
    fn overwrites_same_named_backup() {
        let root = TempDir::new().unwrap();
        let library = root.path().join("lib");
        let backup = root.path().join("bak");
        fs::create_dir(&library).unwrap();
        fs::create_dir(&backup).unwrap();
        fs::write(library.join("a.lnk"), "new").unwrap();
        fs::write(backup.join("a.lnk"), "old").unwrap();

        archive_all(&library, &backup).unwrap();
        assert_eq!(fs::read_to_string(backup.join("a.lnk")).unwrap(), "new");
    }

    #[test]
    fn missing_source_is_io_error() {
        let root = TempDir::new().unwrap();
        let err =
            archive_all(&root.path().join("absent"), &root.path().join("bak")).unwrap_err();
        assert!(matches!(err, ToolbarError::Io { .. }));
    }

    #[test]
    fn failed_copy_keeps_sources_in_place() {
        let root = TempDir::new().unwrap();
        let library = root.path().join("lib");
        let backup = root.path().join("bak");
        fs::create_dir(&library).unwrap();
        fs::create_dir(&backup).unwrap();
        fs::write(library.join("a.lnk"), "a").unwrap();
        fs::write(library.join("b.lnk"), "b").unwrap();
        // A directory where the copy of b.lnk should land makes that copy fail.
        fs::create_dir(backup.join("b.lnk")).unwrap();

        assert!(archive_all(&library, &backup).is_err());
        assert!(library.join("a.lnk").exists());
        assert!(library.join("b.lnk").exists());
        assert!(backup.join("a.lnk").is_file());
    }
}
