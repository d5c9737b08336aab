//! Destructive actions that wait for the user's confirmation.
//!
//! The UI holds at most one [`PendingAction`], shows its title and prompt
//! in a dialog and resolves it with the user's [`Decision`].

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::ShortcutStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete(PathBuf),
    Rename { path: PathBuf, new_name: String },
    DeleteAll,
    RestoreAll,
}

impl PendingAction {
    pub fn title(&self) -> &'static str {
        match self {
            PendingAction::Delete(_) => "Delete Shortcut",
            PendingAction::Rename { .. } => "Rename Shortcut",
            PendingAction::DeleteAll => "Delete All",
            PendingAction::RestoreAll => "Restore All",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            PendingAction::Delete(path) => {
                format!("Are you sure you want to delete {}?", file_name(path))
            }
            PendingAction::Rename { path, new_name } => {
                format!("Rename {} to {}?", file_name(path), new_name.trim())
            }
            PendingAction::DeleteAll => {
                "Back up all shortcuts and remove them from the toolbar?".to_string()
            }
            PendingAction::RestoreAll => {
                "Restore all shortcuts from the backup folder?".to_string()
            }
        }
    }

    /// Runs the action on `Confirm`; `Cancel` leaves the store untouched.
    ///
    /// Returns a completion message for the actions the user should hear
    /// back about.
    pub fn resolve(
        self,
        decision: Decision,
        store: &mut ShortcutStore,
    ) -> Result<Option<String>> {
        if decision == Decision::Cancel {
            return Ok(None);
        }

        match self {
            PendingAction::Delete(path) => {
                store.remove(&path)?;
                Ok(None)
            }
            PendingAction::Rename { path, new_name } => {
                store.rename(&path, &new_name)?;
                Ok(None)
            }
            PendingAction::DeleteAll => {
                let report = store.backup_all()?;
                Ok(Some(format!(
                    "{} shortcuts have been backed up to {} and removed from the toolbar.",
                    report.moved,
                    store.backup_dir().display()
                )))
            }
            PendingAction::RestoreAll => {
                let report = store.restore_all()?;
                Ok(Some(format!(
                    "{} shortcuts have been restored to the toolbar and removed from the backup.",
                    report.moved
                )))
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolbarError;
    use crate::order::OrderFile;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[&str]) -> (TempDir, ShortcutStore) {
        let root = TempDir::new().unwrap();
        let library = root.path().join("lib");
        fs::create_dir(&library).unwrap();
        for name in files {
            fs::write(library.join(name), "").unwrap();
        }
        let store = ShortcutStore::open(
            &library,
            root.path().join("bak"),
            vec![".lnk".to_string(), ".exe".to_string()],
            OrderFile::new(root.path().join("order.json")),
        )
        .unwrap();
        (root, store)
    }

    #[test]
    fn delete_prompt_names_file() {
        let action = PendingAction::Delete(PathBuf::from("toolbar/Notepad.lnk"));
        assert_eq!(action.title(), "Delete Shortcut");
        assert_eq!(
            action.prompt(),
            "Are you sure you want to delete Notepad.lnk?"
        );
    }

    #[test]
    fn cancel_leaves_files_alone() {
        let (root, mut store) = store_with(&["a.lnk"]);
        let path = root.path().join("lib").join("a.lnk");

        let message = PendingAction::Delete(path.clone())
            .resolve(Decision::Cancel, &mut store)
            .unwrap();
        assert!(message.is_none());
        assert!(path.exists());
    }

    #[test]
    fn confirm_delete_removes_file() {
        let (root, mut store) = store_with(&["a.lnk", "b.lnk"]);
        let path = root.path().join("lib").join("a.lnk");

        PendingAction::Delete(path.clone())
            .resolve(Decision::Confirm, &mut store)
            .unwrap();
        assert!(!path.exists());
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn confirm_rename_surfaces_conflict() {
        let (root, mut store) = store_with(&["a.lnk", "b.lnk"]);
        let action = PendingAction::Rename {
            path: root.path().join("lib").join("a.lnk"),
            new_name: "b".to_string(),
        };
        let err = action.resolve(Decision::Confirm, &mut store).unwrap_err();
        assert!(matches!(err, ToolbarError::Conflict(_)));
    }

    #[test]
    fn delete_all_then_restore_all_reports_counts() {
        let (_root, mut store) = store_with(&["a.lnk", "b.exe"]);

        let message = PendingAction::DeleteAll
            .resolve(Decision::Confirm, &mut store)
            .unwrap()
            .expect("message");
        assert!(message.starts_with("2 shortcuts have been backed up"));
        assert!(store.entries().is_empty());

        let message = PendingAction::RestoreAll
            .resolve(Decision::Confirm, &mut store)
            .unwrap()
            .expect("message");
        assert!(message.starts_with("2 shortcuts have been restored"));
        assert_eq!(store.entries().len(), 2);
    }
}
