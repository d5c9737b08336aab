use std::path::{Path, PathBuf};

use crate::error::{Result, ToolbarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKind {
    Link,
    Executable,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutEntry {
    pub path: PathBuf,
    pub display_name: String,
}

impl ShortcutEntry {
    pub fn from_path(path: PathBuf) -> Self {
        let display_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, display_name }
    }

    pub fn kind(&self) -> ShortcutKind {
        match extension_lower(&self.path).as_deref() {
            Some(".lnk") => ShortcutKind::Link,
            Some(".exe") => ShortcutKind::Executable,
            _ => ShortcutKind::Other,
        }
    }

    /// Key used in the order file.
    pub fn key(&self) -> String {
        path_key(&self.path)
    }
}

pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Lists the shortcut files of `dir`.
///
/// Files are grouped by the position of their extension in `extensions`
/// and sorted by file name inside each group. Extensions are compared
/// case-insensitively and may be given with or without the leading dot.
pub fn scan_folder(dir: &Path, extensions: &[String]) -> Result<Vec<ShortcutEntry>> {
    let read_dir = std::fs::read_dir(dir)
        .map_err(|e| ToolbarError::io("Failed to read shortcut folder", dir, e))?;

    let wanted: Vec<String> = extensions.iter().map(|e| normalize_extension(e)).collect();

    let mut found: Vec<(usize, String, PathBuf)> = read_dir
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            let ext = extension_lower(&path)?;
            let group = wanted.iter().position(|w| *w == ext)?;
            let name = entry.file_name().to_string_lossy().to_lowercase();
            Some((group, name, path))
        })
        .collect();

    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    log::debug!("scanned {} shortcuts in {}", found.len(), dir.display());
    Ok(found
        .into_iter()
        .map(|(_, _, path)| ShortcutEntry::from_path(path))
        .collect())
}

/// True when `dir` exists and holds at least one regular file.
pub fn has_files(dir: &Path) -> bool {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return false;
    };
    read_dir.flatten().any(|entry| entry.path().is_file())
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}
