use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const LIBRARY_DIR_NAME: &str = "Custom_Toolbar";
const BACKUP_DIR_NAME: &str = "Backup_Shortcuts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

fn default_pinned_on_startup() -> bool {
    true
}

fn default_confirm_delete() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_pinned_on_startup")]
    pub pinned_on_startup: bool,
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            pinned_on_startup: true,
            confirm_delete: true,
        }
    }
}

fn default_window_width() -> u32 {
    130
}

fn default_button_height() -> u32 {
    90
}

fn default_font_size() -> u32 {
    11
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// 0 means "screen height minus a margin".
    #[serde(default)]
    pub window_height: u32,
    #[serde(default = "default_button_height")]
    pub button_height: u32,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: 0,
            button_height: default_button_height(),
            font_size: default_font_size(),
        }
    }
}

fn default_background_color() -> String {
    "#323232".to_string()
}

fn default_active_background_color() -> String {
    "#282828".to_string()
}

fn default_button_color() -> String {
    "#282828".to_string()
}

fn default_button_hover_color() -> String {
    "#3C3C3C".to_string()
}

fn default_text_color() -> String {
    "#FFFFFF".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_active_background_color")]
    pub active_background_color: String,
    #[serde(default = "default_button_color")]
    pub button_color: String,
    #[serde(default = "default_button_hover_color")]
    pub button_hover_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            active_background_color: default_active_background_color(),
            button_color: default_button_color(),
            button_hover_color: default_button_hover_color(),
            text_color: default_text_color(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![".lnk".to_string(), ".exe".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub library_dir: Option<String>,
    #[serde(default)]
    pub backup_dir: Option<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            library_dir: None,
            backup_dir: None,
            extensions: default_extensions(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("VerticalToolbar"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Folder scanned for shortcuts. Defaults to `Custom_Toolbar` next to
    /// the executable.
    pub fn library_dir(&self) -> PathBuf {
        resolve_dir(self.paths.library_dir.as_deref(), LIBRARY_DIR_NAME)
    }

    /// Archive destination for "Delete All". Defaults to
    /// `Backup_Shortcuts` next to the executable.
    pub fn backup_dir(&self) -> PathBuf {
        resolve_dir(self.paths.backup_dir.as_deref(), BACKUP_DIR_NAME)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!("invalid config at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => {
                let config = Self::default();
                config.save();
                config
            }
        }
    }

    pub fn save(&self) {
        let Some(dir) = Self::config_dir() else {
            return;
        };
        let _ = fs::create_dir_all(&dir);

        let Some(path) = Self::config_path() else {
            return;
        };
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    log::warn!("failed to write config {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("failed to encode config: {e}"),
        }
    }
}

fn resolve_dir(configured: Option<&str>, default_name: &str) -> PathBuf {
    if let Some(dir) = configured.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    let base = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .or_else(Config::config_dir)
        .unwrap_or_default();
    base.join(default_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let toml_str = r##"
            [general]
            pinned_on_startup = false
            confirm_delete = false

            [appearance]
            window_width = 160
            window_height = 700
            button_height = 80
            font_size = 12

            [visual]
            background_color = "#101010"
            text_color = "#EEEEEE"

            [paths]
            library_dir = "D:\\Toolbar"
            backup_dir = "D:\\Backup"
            extensions = [".lnk"]
        "##;
        let config: Config = toml::from_str(toml_str).expect("parse");
        assert!(!config.general.pinned_on_startup);
        assert!(!config.general.confirm_delete);
        assert_eq!(config.appearance.window_width, 160);
        assert_eq!(config.appearance.window_height, 700);
        assert_eq!(config.appearance.button_height, 80);
        assert_eq!(config.visual.background_color, "#101010");
        assert_eq!(config.visual.button_color, "#282828");
        assert_eq!(config.paths.extensions, vec![".lnk".to_string()]);
        assert_eq!(config.library_dir(), PathBuf::from("D:\\Toolbar"));
        assert_eq!(config.backup_dir(), PathBuf::from("D:\\Backup"));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config, Config::default());
        assert!(config.general.pinned_on_startup);
        assert_eq!(config.appearance.window_width, 130);
        assert_eq!(
            config.paths.extensions,
            vec![".lnk".to_string(), ".exe".to_string()]
        );
    }

    #[test]
    fn blank_dir_override_falls_back_to_default_name() {
        let mut config = Config::default();
        config.paths.library_dir = Some("   ".to_string());
        assert!(config.library_dir().ends_with(LIBRARY_DIR_NAME));
        assert!(config.backup_dir().ends_with(BACKUP_DIR_NAME));
    }

    #[test]
    fn serialize_roundtrip() {
        let mut config = Config::default();
        config.paths.library_dir = Some("C:\\Tools\\Bar".to_string());
        config.appearance.font_size = 14;
        let text = toml::to_string_pretty(&config).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(config, back);
    }
}
