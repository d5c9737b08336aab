use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveReport};
use crate::config::Config;
use crate::error::{Result, ToolbarError};
use crate::link::LinkWriter;
use crate::order::{self, OrderFile};
use crate::shortcut::{self, path_key, ShortcutEntry};

/// The ordered set of toolbar shortcuts.
///
/// Owns the arrangement shown by the UI. Every mutation rescans the
/// library folder, so `entries()` always reflects the disk plus the
/// persisted order.
pub struct ShortcutStore {
    library: PathBuf,
    backup: PathBuf,
    extensions: Vec<String>,
    order_file: OrderFile,
    entries: Vec<ShortcutEntry>,
    dragging: Option<PathBuf>,
}

impl ShortcutStore {
    pub fn open(
        library: impl Into<PathBuf>,
        backup: impl Into<PathBuf>,
        extensions: Vec<String>,
        order_file: OrderFile,
    ) -> Result<Self> {
        let library = library.into();
        fs::create_dir_all(&library)
            .map_err(|e| ToolbarError::io("Failed to create shortcut folder", &library, e))?;

        let mut store = Self {
            library,
            backup: backup.into(),
            extensions,
            order_file,
            entries: Vec::new(),
            dragging: None,
        };
        store.list()?;
        Ok(store)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let library = config.library_dir();
        let order_path = OrderFile::default_path().unwrap_or_else(|| {
            library
                .parent()
                .map(|p| p.join("order.json"))
                .unwrap_or_else(|| PathBuf::from("order.json"))
        });
        Self::open(
            library,
            config.backup_dir(),
            config.paths.extensions.clone(),
            OrderFile::new(order_path),
        )
    }

    pub fn library_dir(&self) -> &Path {
        &self.library
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup
    }

    pub fn order_file(&self) -> &OrderFile {
        &self.order_file
    }

    pub fn entries(&self) -> &[ShortcutEntry] {
        &self.entries
    }

    pub fn find(&self, path: &Path) -> Option<&ShortcutEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Rescans the library folder and applies the saved order.
    pub fn list(&mut self) -> Result<&[ShortcutEntry]> {
        fs::create_dir_all(&self.library)
            .map_err(|e| ToolbarError::io("Failed to create shortcut folder", &self.library, e))?;
        let scanned = shortcut::scan_folder(&self.library, &self.extensions)?;
        let saved = self.order_file.load_or_empty();
        self.entries = order::apply_order(scanned, &saved);
        self.dragging = None;
        Ok(&self.entries)
    }

    pub fn has_library_files(&self) -> bool {
        shortcut::has_files(&self.library)
    }

    pub fn has_backup_files(&self) -> bool {
        shortcut::has_files(&self.backup)
    }

    /// Creates a shortcut to `target` named after its file stem.
    pub fn add(&mut self, target: &Path, writer: &dyn LinkWriter) -> Result<PathBuf> {
        let Some(stem) = target.file_stem() else {
            return Err(ToolbarError::Creation {
                path: target.to_path_buf(),
                message: "target has no file name".to_string(),
                source: None,
            });
        };

        let extension = writer.extension(target);
        let shown = shortcut::normalize_extension(&extension);
        if !self
            .extensions
            .iter()
            .any(|e| shortcut::normalize_extension(e) == shown)
        {
            return Err(ToolbarError::Creation {
                path: target.to_path_buf(),
                message: format!("{extension:?} files are not shown on the toolbar"),
                source: None,
            });
        }

        let file_name = format!("{}{}", stem.to_string_lossy(), extension);
        let link_path = self.library.join(file_name);
        if link_path.exists() {
            return Err(ToolbarError::Creation {
                path: link_path,
                message: "a shortcut with this name already exists".to_string(),
                source: None,
            });
        }

        writer
            .write_link(target, &link_path)
            .map_err(|e| ToolbarError::Creation {
                path: link_path.clone(),
                message: e.to_string(),
                source: Some(e),
            })?;

        log::info!("created {} -> {}", link_path.display(), target.display());
        self.list()?;
        Ok(link_path)
    }

    /// Deletes a shortcut file of the library folder. The order file is
    /// not touched.
    pub fn remove(&mut self, path: &Path) -> Result<()> {
        if path.parent() != Some(self.library.as_path()) || !path.is_file() {
            return Err(ToolbarError::NotFound(path.to_path_buf()));
        }
        fs::remove_file(path)
            .map_err(|e| ToolbarError::io("Failed to delete shortcut", path, e))?;

        log::info!("deleted {}", path.display());
        self.list()?;
        Ok(())
    }

    /// Renames the shortcut file, keeping its extension and its place in
    /// the saved order. Returns the new path.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let new_name = new_name.trim();
        if !is_valid_name(new_name) {
            return Err(ToolbarError::InvalidName(new_name.to_string()));
        }
        if !path.is_file() {
            return Err(ToolbarError::NotFound(path.to_path_buf()));
        }

        let current = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if current == new_name {
            return Ok(path.to_path_buf());
        }

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let parent = path.parent().unwrap_or(&self.library);
        let new_path = parent.join(format!("{new_name}{extension}"));

        // On case-insensitive file systems a case-only change "exists" as
        // the source itself; a distinct file with the exact name conflicts.
        let case_only = current.to_lowercase() == new_name.to_lowercase();
        if new_path.exists() && !(case_only && !has_exact_entry(parent, &new_path)) {
            return Err(ToolbarError::Conflict(new_path));
        }

        fs::rename(path, &new_path)
            .map_err(|e| ToolbarError::io("Failed to rename shortcut", path, e))?;
        log::info!("renamed {} -> {}", path.display(), new_path.display());

        let saved = self.rewrite_order_key(path, &new_path);
        // Rescan even when the order could not be saved; the old path is gone.
        let refreshed = self.list().map(|_| ());
        saved?;
        refreshed?;
        Ok(new_path)
    }

    fn rewrite_order_key(&self, old: &Path, new: &Path) -> Result<()> {
        let old_key = path_key(old);
        let mut saved = self.order_file.load_or_empty();
        let Some(slot) = saved.iter_mut().find(|key| **key == old_key) else {
            return Ok(());
        };
        *slot = path_key(new);
        self.order_file.save(&saved)
    }

    /// Moves every file of the library into the backup folder.
    pub fn backup_all(&mut self) -> Result<ArchiveReport> {
        let result = archive::archive_all(&self.library, &self.backup);
        self.finish_bulk(result)
    }

    /// Moves every file of the backup folder into the library.
    pub fn restore_all(&mut self) -> Result<ArchiveReport> {
        let result = archive::archive_all(&self.backup, &self.library);
        self.finish_bulk(result)
    }

    // Rescan even after a partial failure so the list matches the disk.
    fn finish_bulk(&mut self, result: Result<ArchiveReport>) -> Result<ArchiveReport> {
        let refreshed = self.list().map(|_| ());
        let report = result?;
        refreshed?;
        Ok(report)
    }

    pub fn begin_drag(&mut self, path: &Path) -> bool {
        if self.find(path).is_none() {
            return false;
        }
        self.dragging = Some(path.to_path_buf());
        true
    }

    pub fn dragging(&self) -> Option<&Path> {
        self.dragging.as_deref()
    }

    /// Moves the dragged entry in front of `target`. Nothing changes
    /// without an active drag.
    pub fn drop_on(&mut self, target: &Path) -> bool {
        let Some(dragged) = self.dragging.clone() else {
            return false;
        };
        order::move_before(&mut self.entries, &dragged, target)
    }

    /// Ends the drag and persists the current arrangement.
    pub fn commit_order(&mut self) -> Result<()> {
        self.dragging = None;
        self.order_file.save(&order::order_keys(&self.entries))?;
        log::info!("saved custom order of {} shortcuts", self.entries.len());
        Ok(())
    }

    /// Ends the drag and restores the saved arrangement.
    pub fn cancel_drag(&mut self) -> Result<()> {
        if self.dragging.take().is_none() {
            return Ok(());
        }
        self.list().map(|_| ())
    }
}

/// True when `dir` holds an entry whose name matches `path`'s file name
/// byte for byte.
fn has_exact_entry(dir: &Path, path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let Ok(read_dir) = fs::read_dir(dir) else {
        return false;
    };
    read_dir.flatten().any(|entry| entry.file_name() == name)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|'])
}
