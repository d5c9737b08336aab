#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod launcher;
mod platform;

use eframe::egui;
use log::{error, info, LevelFilter};
use vtoolbar_core::config::Config;
use vtoolbar_core::store::ShortcutStore;
use vtoolbar_core::window_data;

use app::{AppInit, ToolbarApp};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("egui_glow", LevelFilter::Warn)
        .filter_module("eframe", LevelFilter::Warn)
        .init();

    let config = Config::load();
    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => {
            platform::show_startup_error(&e.to_string());
            return Err(e);
        }
    };
    info!(
        "toolbar library {} ({} shortcuts), order file {}",
        store.library_dir().display(),
        store.entries().len(),
        store.order_file().path().display()
    );

    let state = window_data::load_state();
    let pinned = state
        .as_ref()
        .map(|s| s.pinned)
        .unwrap_or(config.general.pinned_on_startup);

    let width = app::window_width(&config);
    let height = app::initial_window_height(&config);

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Custom Toolbar")
        .with_inner_size([width, height])
        .with_decorations(false)
        .with_resizable(false)
        .with_drag_and_drop(true);
    if let Some(placement) = state.as_ref().and_then(|s| s.placement) {
        viewport = viewport.with_position([placement.x as f32, placement.y as f32]);
    }
    if pinned {
        viewport = viewport.with_always_on_top();
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let has_placement = state.as_ref().is_some_and(|s| s.placement.is_some());
    eframe::run_native(
        "Custom Toolbar",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ToolbarApp::new(
                cc,
                AppInit {
                    config,
                    store,
                    pinned,
                    has_placement,
                },
            )))
        }),
    )
}

fn open_store(config: &Config) -> eframe::Result<ShortcutStore> {
    ShortcutStore::from_config(config).map_err(|e| {
        error!("cannot open shortcut library: {e}");
        eframe::Error::AppCreation(Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_library_fails_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_folder");
        std::fs::write(&blocker, "").unwrap();

        let mut config = Config::default();
        config.paths.library_dir = Some(blocker.join("Custom_Toolbar").display().to_string());

        match open_store(&config) {
            Err(eframe::Error::AppCreation(inner)) => {
                assert!(inner.to_string().contains("shortcut folder"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("library under a plain file must not open"),
        }
    }
}
