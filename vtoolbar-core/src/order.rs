//! Persistence of the user's custom shortcut arrangement.
//!
//! The order file is a JSON array of absolute path strings. It is
//! rewritten wholesale on every save; paths that no longer exist are
//! simply ignored when the order is applied to a fresh scan.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, ToolbarError};
use crate::shortcut::{path_key, ShortcutEntry};

const ORDER_FILE_NAME: &str = "order.json";

#[derive(Debug, Clone)]
pub struct OrderFile {
    path: PathBuf,
}

impl OrderFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `order.json` inside the configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        Config::config_dir().map(|p| p.join(ORDER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when no order has been saved yet.
    pub fn load(&self) -> Result<Option<Vec<String>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ToolbarError::io("Failed to read order file", &self.path, e)),
        };

        let order: Vec<String> =
            serde_json::from_str(&content).map_err(|e| ToolbarError::Deserialization {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        Ok(Some(order))
    }

    pub fn save(&self, order: &[String]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ToolbarError::io("Failed to create order directory", dir, e))?;
        }

        let content = serde_json::to_string_pretty(order).map_err(|e| ToolbarError::Io {
            message: "Failed to encode order".to_string(),
            path: self.path.clone(),
            source: e.into(),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .map_err(|e| ToolbarError::io("Failed to write order file", &tmp_path, e))?;
        let _ = fs::remove_file(&self.path);
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| ToolbarError::io("Failed to replace order file", &self.path, e))?;

        log::debug!("saved order of {} shortcuts", order.len());
        Ok(())
    }

    /// Like [`OrderFile::load`], but a missing or unreadable file both
    /// mean "no custom order".
    pub fn load_or_empty(&self) -> Vec<String> {
        match self.load() {
            Ok(Some(order)) => order,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("ignoring saved order: {e}");
                Vec::new()
            }
        }
    }
}

/// Stable-sorts `entries` by their index in `order`.
///
/// Entries missing from `order` go after every known entry and keep their
/// relative scan order.
pub fn apply_order(mut entries: Vec<ShortcutEntry>, order: &[String]) -> Vec<ShortcutEntry> {
    if order.is_empty() {
        return entries;
    }

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    for (i, key) in order.iter().enumerate() {
        index.entry(key.as_str()).or_insert(i);
    }

    entries.sort_by_cached_key(|entry| {
        index
            .get(entry.key().as_str())
            .copied()
            .unwrap_or(usize::MAX)
    });
    entries
}

/// Moves `dragged` so that it sits immediately before `target`.
///
/// Returns false when either path is absent or both are the same entry.
pub fn move_before(entries: &mut Vec<ShortcutEntry>, dragged: &Path, target: &Path) -> bool {
    if dragged == target {
        return false;
    }
    let Some(from) = entries.iter().position(|e| e.path == dragged) else {
        return false;
    };
    if !entries.iter().any(|e| e.path == target) {
        return false;
    }

    let moved = entries.remove(from);
    let to = entries
        .iter()
        .position(|e| e.path == target)
        .unwrap_or(entries.len());
    entries.insert(to, moved);
    true
}

pub fn order_keys(entries: &[ShortcutEntry]) -> Vec<String> {
    entries.iter().map(|e| path_key(&e.path)).collect()
}
