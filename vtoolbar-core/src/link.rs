use std::io;
use std::path::Path;

/// Creates the file that represents a new toolbar shortcut.
pub trait LinkWriter {
    /// Extension (with leading dot) of the files this writer produces
    /// for `target`.
    fn extension(&self, target: &Path) -> String;

    fn write_link(&self, target: &Path, link_path: &Path) -> io::Result<()>;
}

/// Places a copy of the target itself in the toolbar folder.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyWriter;

impl LinkWriter for CopyWriter {
    fn extension(&self, target: &Path) -> String {
        target
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    fn write_link(&self, target: &Path, link_path: &Path) -> io::Result<()> {
        std::fs::copy(target, link_path).map(|_| ())
    }
}
