use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::binfmt::{self, HeaderError};
use crate::config::Config;

const WINDOW_MAGIC: [u8; 4] = *b"VTBW";
const WINDOW_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolbarState {
    pub placement: Option<WindowPlacement>,
    pub pinned: bool,
}

pub fn load_state() -> Option<ToolbarState> {
    load_state_from(&path()?)
}

pub fn save_state(state: &ToolbarState) {
    let Some(path) = path() else {
        return;
    };
    save_state_to(&path, state);
}

pub fn load_state_from(path: &Path) -> Option<ToolbarState> {
    let bytes = std::fs::read(path).ok()?;
    match decode_state(&bytes) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("discarding window state {}: {e:?}", path.display());
            None
        }
    }
}

pub fn save_state_to(path: &Path, state: &ToolbarState) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Some(bytes) = binfmt::encode(WINDOW_MAGIC, WINDOW_VERSION, state) else {
        return;
    };
    let tmp_path = path.with_extension("bin.tmp");
    if std::fs::write(&tmp_path, &bytes).is_ok() {
        let _ = std::fs::remove_file(path);
        let _ = std::fs::rename(&tmp_path, path);
    }
}

fn decode_state(bytes: &[u8]) -> Result<ToolbarState, HeaderError> {
    binfmt::decode(bytes, WINDOW_MAGIC, WINDOW_VERSION)
}

fn path() -> Option<PathBuf> {
    Config::config_dir().map(|p| p.join("window.bin"))
}
