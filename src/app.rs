use std::path::{Path, PathBuf};

use eframe::egui::{
    self, Align, Align2, Color32, FontId, Layout, PointerButton, RichText, Sense, Stroke,
    TextStyle, ViewportCommand,
};
use log::{error, info};
use vtoolbar_core::action::{Decision, PendingAction};
use vtoolbar_core::config::Config;
use vtoolbar_core::link::LinkWriter;
use vtoolbar_core::shortcut::{ShortcutEntry, ShortcutKind};
use vtoolbar_core::store::ShortcutStore;
use vtoolbar_core::window_data::{self, ToolbarState, WindowPlacement};
use vtoolbar_core::ToolbarError;

use crate::launcher;
use crate::platform;

const HEADER_HEIGHT: f32 = 30.0;
const PANEL_PADDING: f32 = 10.0;
const BUTTON_SPACING: f32 = 5.0;
const BUTTON_ROUNDING: f32 = 4.0;
const SCREEN_MARGIN: f32 = 100.0;
const FALLBACK_WINDOW_HEIGHT: f32 = 800.0;
const PINNED_COLOR: Color32 = Color32::from_rgb(50, 205, 50);
const UNPINNED_COLOR: Color32 = Color32::GRAY;
const CLOSE_COLOR: Color32 = Color32::from_rgb(220, 80, 80);
const DROP_MARKER_COLOR: Color32 = Color32::from_rgb(0, 120, 215);

pub struct AppInit {
    pub config: Config,
    pub store: ShortcutStore,
    pub pinned: bool,
    pub has_placement: bool,
}

enum Prompt {
    Rename { path: PathBuf, name: String },
    CreateShortcut { target: String },
}

enum EntryAction {
    Launch(PathBuf),
    Delete(PathBuf),
    Rename(PathBuf, String),
}

struct MessageBox {
    title: String,
    text: String,
}

struct Palette {
    background: Color32,
    active_background: Color32,
    button: Color32,
    button_hover: Color32,
    text: Color32,
}

impl Palette {
    fn from_config(config: &Config) -> Self {
        let visual = &config.visual;
        Self {
            background: parse_hex_color(&visual.background_color, Color32::from_rgb(50, 50, 50)),
            active_background: parse_hex_color(
                &visual.active_background_color,
                Color32::from_rgb(40, 40, 40),
            ),
            button: parse_hex_color(&visual.button_color, Color32::from_rgb(40, 40, 40)),
            button_hover: parse_hex_color(
                &visual.button_hover_color,
                Color32::from_rgb(60, 60, 60),
            ),
            text: parse_hex_color(&visual.text_color, Color32::WHITE),
        }
    }
}

pub struct ToolbarApp {
    config: Config,
    palette: Palette,
    store: ShortcutStore,
    link_writer: Box<dyn LinkWriter>,

    pinned: bool,
    has_placement: bool,
    initial_window_applied: bool,
    window_pos: Option<egui::Pos2>,

    prompt: Option<Prompt>,
    pending: Option<PendingAction>,
    message: Option<MessageBox>,
    should_exit: bool,
}

impl ToolbarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, init: AppInit) -> Self {
        let palette = Palette::from_config(&init.config);
        let app = Self {
            config: init.config,
            palette,
            store: init.store,
            link_writer: platform::link_writer(),
            pinned: init.pinned,
            has_placement: init.has_placement,
            initial_window_applied: false,
            window_pos: None,
            prompt: None,
            pending: None,
            message: None,
            should_exit: false,
        };
        app.apply_visual_style(&cc.egui_ctx);
        app
    }

    fn apply_visual_style(&self, ctx: &egui::Context) {
        ctx.set_visuals(egui::Visuals::dark());
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.palette.background;
        style.visuals.window_fill = self.palette.button;
        style.visuals.override_text_color = Some(self.palette.text);
        style.visuals.widgets.inactive.weak_bg_fill = self.palette.button;
        style.visuals.widgets.hovered.weak_bg_fill = self.palette.button_hover;

        let size = font_size(&self.config);
        style
            .text_styles
            .insert(TextStyle::Body, FontId::proportional(size));
        style
            .text_styles
            .insert(TextStyle::Button, FontId::proportional(size));

        ctx.set_style(style);
    }

    /// Sizes the window to the monitor and docks it top-right once the
    /// monitor size is known.
    fn apply_initial_window(&mut self, ctx: &egui::Context) {
        if self.initial_window_applied {
            return;
        }
        let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };

        let width = window_width(&self.config);
        if self.config.appearance.window_height == 0 {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(egui::vec2(
                width,
                fit_window_height(monitor.y, &self.config),
            )));
        }
        if !self.has_placement {
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(default_position(
                monitor.x, width,
            )));
        }
        self.initial_window_applied = true;
    }

    fn sync_viewport_pos(&mut self, ctx: &egui::Context) {
        let pos = ctx.input(|i| i.viewport().outer_rect.map(|rect| rect.left_top()));
        if let Some(pos) = pos {
            self.window_pos = Some(pos);
        }
    }

    fn persist_state(&self) {
        window_data::save_state(&ToolbarState {
            placement: self.window_pos.map(|pos| WindowPlacement {
                x: pos.x.round() as i32,
                y: pos.y.round() as i32,
            }),
            pinned: self.pinned,
        });
    }

    fn toggle_pin(&mut self, ctx: &egui::Context) {
        self.pinned = !self.pinned;
        let level = if self.pinned {
            egui::WindowLevel::AlwaysOnTop
        } else {
            egui::WindowLevel::Normal
        };
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(level));
        info!("toolbar pinned: {}", self.pinned);
        self.persist_state();
    }

    fn dialog_open(&self) -> bool {
        self.prompt.is_some() || self.pending.is_some() || self.message.is_some()
    }

    fn show_message(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.message = Some(MessageBox {
            title: title.into(),
            text: text.into(),
        });
    }

    fn show_error(&mut self, title: &str, err: &ToolbarError) {
        error!("{title}: {err}");
        self.show_message(title, err.to_string());
    }

    fn refresh(&mut self) {
        if let Err(e) = self.store.list() {
            self.show_error("Refresh", &e);
        }
    }

    fn add_shortcut(&mut self, target: &Path) {
        match self.store.add(target, self.link_writer.as_ref()) {
            Ok(link) => info!("created shortcut {}", link.display()),
            Err(e) => self.show_error("Create Shortcut", &e),
        }
    }

    fn create_shortcut(&mut self) {
        if !platform::has_file_picker() {
            self.prompt = Some(Prompt::CreateShortcut {
                target: String::new(),
            });
            return;
        }
        if let Some(target) = platform::pick_target_file() {
            self.add_shortcut(&target);
        }
    }

    fn open_library_folder(&mut self) {
        let dir = self.store.library_dir().to_path_buf();
        if let Err(e) = launcher::open_folder(&dir) {
            error!("failed to open {}: {e}", dir.display());
            self.show_message("Open Source Folder", format!("Error opening folder: {e}"));
        }
    }

    fn launch(&mut self, path: &Path) {
        match launcher::launch(path) {
            Ok(()) => info!("launched {}", path.display()),
            Err(e) => {
                error!("failed to launch {}: {e}", path.display());
                self.show_message("Error", format!("Error launching shortcut: {e}"));
            }
        }
    }

    fn resolve_pending(&mut self, decision: Decision) {
        let Some(action) = self.pending.take() else {
            return;
        };
        let title = action.title();
        match action.resolve(decision, &mut self.store) {
            Ok(Some(message)) => self.show_message(title, message),
            Ok(None) => {}
            Err(e) => self.show_error(title, &e),
        }
    }

    fn handle_entry_action(&mut self, action: EntryAction) {
        match action {
            EntryAction::Launch(path) => self.launch(&path),
            EntryAction::Delete(path) => {
                self.pending = Some(PendingAction::Delete(path));
                if !self.config.general.confirm_delete {
                    self.resolve_pending(Decision::Confirm);
                }
            }
            EntryAction::Rename(path, name) => {
                self.prompt = Some(Prompt::Rename { path, name });
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        for path in dropped {
            self.add_shortcut(&path);
        }
    }

    /// Finishes a reorder drag on pointer release.
    fn handle_reorder(&mut self, ctx: &egui::Context, rects: &[(PathBuf, egui::Rect)]) {
        if self.store.dragging().is_none() || !ctx.input(|i| i.pointer.any_released()) {
            return;
        }

        let pointer = ctx.input(|i| i.pointer.interact_pos());
        let target = pointer
            .and_then(|pos| drop_target(rects, pos))
            .map(Path::to_path_buf);
        let moved = target.is_some_and(|target| self.store.drop_on(&target));
        let result = if moved {
            self.store.commit_order()
        } else {
            self.store.cancel_drag()
        };
        if let Err(e) = result {
            self.show_error("Reorder", &e);
        }
    }

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(ui.available_width(), HEADER_HEIGHT);
        ui.allocate_ui_with_layout(size, Layout::right_to_left(Align::Center), |ui| {
            let close = egui::Button::new(RichText::new("✕").size(14.0).color(CLOSE_COLOR))
                .frame(false);
            if ui.add(close).on_hover_text("Close").clicked() {
                self.should_exit = true;
            }

            let pin_color = if self.pinned {
                PINNED_COLOR
            } else {
                UNPINNED_COLOR
            };
            let pin =
                egui::Button::new(RichText::new("📌").size(14.0).color(pin_color)).frame(false);
            let hint = if self.pinned {
                "Unpin"
            } else {
                "Keep on top"
            };
            if ui.add(pin).on_hover_text(hint).clicked() {
                let ctx = ui.ctx().clone();
                self.toggle_pin(&ctx);
            }
        });
    }

    fn draw_entries(
        &self,
        ui: &mut egui::Ui,
        actions: &mut Vec<EntryAction>,
    ) -> Vec<(PathBuf, egui::Rect)> {
        let width = ui.available_width();
        let height = self.config.appearance.button_height.max(24) as f32;
        let font = FontId::proportional(font_size(&self.config));
        let dragging = self.store.dragging();
        let pointer = ui.input(|i| i.pointer.hover_pos());

        let entries: Vec<ShortcutEntry> = self.store.entries().to_vec();
        let mut rects = Vec::with_capacity(entries.len());
        for entry in &entries {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(width, height), Sense::click_and_drag());
            let is_dragged = dragging == Some(entry.path.as_path());
            let is_target = dragging.is_some()
                && !is_dragged
                && pointer.is_some_and(|pos| rect.contains(pos));

            let fill = if is_dragged || (dragging.is_none() && response.hovered()) {
                self.palette.button_hover
            } else {
                self.palette.button
            };
            let painter = ui.painter();
            painter.rect_filled(rect, BUTTON_ROUNDING, fill);
            let galley = painter.layout(
                entry.display_name.clone(),
                font.clone(),
                self.palette.text,
                rect.width() - 8.0,
            );
            let text_pos = rect.center() - galley.size() / 2.0;
            painter.galley(text_pos, galley, self.palette.text);
            if is_target {
                painter.hline(
                    rect.x_range(),
                    rect.top() - BUTTON_SPACING / 2.0,
                    Stroke::new(2.0, DROP_MARKER_COLOR),
                );
            }

            if response.clicked() && dragging.is_none() {
                actions.push(EntryAction::Launch(entry.path.clone()));
            }

            let response = response.on_hover_text(hover_text(entry));
            response.context_menu(|ui| {
                if ui.button("Delete").clicked() {
                    actions.push(EntryAction::Delete(entry.path.clone()));
                    ui.close();
                }
                if ui.button("Rename").clicked() {
                    actions.push(EntryAction::Rename(
                        entry.path.clone(),
                        entry.display_name.clone(),
                    ));
                    ui.close();
                }
            });

            ui.add_space(BUTTON_SPACING);
            rects.push((entry.path.clone(), rect));
        }
        rects
    }

    fn draw_toolbar_menu(&mut self, ui: &mut egui::Ui) {
        if ui.button("Create Shortcut").clicked() {
            ui.close();
            self.create_shortcut();
        }
        if ui.button("Refresh").clicked() {
            ui.close();
            self.refresh();
        }
        if ui.button("Open Source Folder").clicked() {
            ui.close();
            self.open_library_folder();
        }
        ui.separator();
        let delete_all = egui::Button::new("Delete All");
        if ui
            .add_enabled(self.store.has_library_files(), delete_all)
            .clicked()
        {
            ui.close();
            self.pending = Some(PendingAction::DeleteAll);
        }
        let restore_all = egui::Button::new("Restore All");
        if ui
            .add_enabled(self.store.has_backup_files(), restore_all)
            .clicked()
        {
            ui.close();
            self.pending = Some(PendingAction::RestoreAll);
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| i.viewport().focused) == Some(true);
        let fill = if focused {
            self.palette.active_background
        } else {
            self.palette.background
        };
        let blocked = self.dialog_open();

        let mut rects = Vec::new();
        let mut actions = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(fill).inner_margin(PANEL_PADDING))
            .show(ctx, |ui| {
                let background = ui.interact(
                    ui.max_rect(),
                    ui.id().with("toolbar_background"),
                    Sense::click_and_drag(),
                );

                ui.add_enabled_ui(!blocked, |ui| {
                    self.draw_header(ui);
                    ui.add_space(BUTTON_SPACING);
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .drag_to_scroll(false)
                        .show(ui, |ui| {
                            rects = self.draw_entries(ui, &mut actions);
                        });
                });

                if blocked {
                    return;
                }
                if background.drag_started_by(PointerButton::Primary) {
                    ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                }
                background.context_menu(|ui| self.draw_toolbar_menu(ui));
            });

        if blocked {
            return;
        }
        self.start_reorder(ctx, &rects);
        for action in actions {
            self.handle_entry_action(action);
        }
        self.handle_reorder(ctx, &rects);
    }

    /// Starts a reorder drag once egui decides the press on an entry is a
    /// drag rather than a click.
    fn start_reorder(&mut self, ctx: &egui::Context, rects: &[(PathBuf, egui::Rect)]) {
        if self.store.dragging().is_some() {
            return;
        }
        let started = ctx.input(|i| {
            i.pointer.is_decidedly_dragging() && i.pointer.button_down(PointerButton::Primary)
        });
        if !started {
            return;
        }
        let origin = ctx.input(|i| i.pointer.press_origin());
        if let Some(path) = origin.and_then(|pos| drop_target(rects, pos)) {
            let path = path.to_path_buf();
            if self.store.begin_drag(&path) {
                info!("reordering {}", path.display());
            }
        }
    }

    fn draw_dialogs(&mut self, ctx: &egui::Context) {
        self.draw_prompt(ctx);
        self.draw_confirm(ctx);
        self.draw_message(ctx);
    }

    fn draw_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        let (title, label) = match prompt {
            Prompt::Rename { .. } => ("Rename Shortcut", "Enter new name:"),
            Prompt::CreateShortcut { .. } => ("Create Shortcut", "File to link:"),
        };

        let mut submitted = None;
        dialog_window(title).show(ctx, |ui| {
            ui.label(label);
            let text = match prompt {
                Prompt::Rename { name, .. } => name,
                Prompt::CreateShortcut { target } => target,
            };
            let response =
                ui.add(egui::TextEdit::singleline(text).desired_width(f32::INFINITY));
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = Some(true);
            }
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    submitted = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    submitted = Some(false);
                }
            });
        });

        match submitted {
            Some(true) => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            Some(false) => self.prompt = None,
            None => {}
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        match prompt {
            Prompt::Rename { path, name } => {
                if name.trim().is_empty() {
                    return;
                }
                self.pending = Some(PendingAction::Rename {
                    path,
                    new_name: name,
                });
                self.resolve_pending(Decision::Confirm);
            }
            Prompt::CreateShortcut { target } => {
                let target = target.trim();
                if !target.is_empty() {
                    self.add_shortcut(Path::new(target));
                }
            }
        }
    }

    fn draw_confirm(&mut self, ctx: &egui::Context) {
        let Some(action) = &self.pending else {
            return;
        };
        let title = action.title();
        let prompt = action.prompt();

        let mut decision = None;
        dialog_window(title).show(ctx, |ui| {
            ui.label(prompt);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    decision = Some(Decision::Confirm);
                }
                if ui.button("No").clicked() {
                    decision = Some(Decision::Cancel);
                }
            });
        });

        if let Some(decision) = decision {
            self.resolve_pending(decision);
        }
    }

    fn draw_message(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.message else {
            return;
        };

        let mut close = false;
        dialog_window(message.title.clone()).show(ctx, |ui| {
            ui.label(message.text.as_str());
            if ui.button("OK").clicked() {
                close = true;
            }
        });
        if close {
            self.message = None;
        }
    }
}

impl eframe::App for ToolbarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_initial_window(ctx);
        self.sync_viewport_pos(ctx);

        if self.should_exit {
            self.persist_state();
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }

        self.handle_dropped_files(ctx);
        self.draw_toolbar(ctx);
        self.draw_dialogs(ctx);
    }
}

impl Drop for ToolbarApp {
    fn drop(&mut self) {
        self.persist_state();
    }
}

pub fn window_width(config: &Config) -> f32 {
    config.appearance.window_width.clamp(80, 600) as f32
}

/// Height used before the monitor size is known.
pub fn initial_window_height(config: &Config) -> f32 {
    match config.appearance.window_height {
        0 => FALLBACK_WINDOW_HEIGHT,
        height => height as f32,
    }
}

fn fit_window_height(monitor_height: f32, config: &Config) -> f32 {
    let minimum = HEADER_HEIGHT + config.appearance.button_height as f32 + PANEL_PADDING * 2.0;
    (monitor_height - SCREEN_MARGIN).max(minimum)
}

fn default_position(monitor_width: f32, width: f32) -> egui::Pos2 {
    egui::pos2((monitor_width - width).max(0.0), 0.0)
}

fn font_size(config: &Config) -> f32 {
    config.appearance.font_size.clamp(6, 32) as f32
}

fn drop_target(rects: &[(PathBuf, egui::Rect)], pos: egui::Pos2) -> Option<&Path> {
    rects
        .iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(path, _)| path.as_path())
}

fn hover_text(entry: &ShortcutEntry) -> String {
    let kind = match entry.kind() {
        ShortcutKind::Link => "Shortcut",
        ShortcutKind::Executable => "Program",
        ShortcutKind::Other => "File",
    };
    format!("{kind}: {}", entry.path.display())
}

fn dialog_window(title: impl Into<egui::WidgetText>) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

fn parse_hex_color(input: &str, fallback: Color32) -> Color32 {
    let s = input.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return fallback;
    }

    let Ok(v) = u32::from_str_radix(hex, 16) else {
        return fallback;
    };

    let r = ((v >> 16) & 0xFF) as u8;
    let g = ((v >> 8) & 0xFF) as u8;
    let b = (v & 0xFF) as u8;
    Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(
            parse_hex_color("#323232", Color32::RED),
            Color32::from_rgb(50, 50, 50)
        );
        assert_eq!(
            parse_hex_color(" 3c3c3c ", Color32::RED),
            Color32::from_rgb(60, 60, 60)
        );
    }

    #[test]
    fn bad_hex_color_falls_back() {
        assert_eq!(parse_hex_color("#12345", Color32::RED), Color32::RED);
        assert_eq!(parse_hex_color("zzzzzz", Color32::RED), Color32::RED);
        assert_eq!(parse_hex_color("", Color32::RED), Color32::RED);
    }

    #[test]
    fn default_palette_matches_classic_colors() {
        let palette = Palette::from_config(&Config::default());
        assert_eq!(palette.background, Color32::from_rgb(50, 50, 50));
        assert_eq!(palette.active_background, Color32::from_rgb(40, 40, 40));
        assert_eq!(palette.button_hover, Color32::from_rgb(60, 60, 60));
        assert_eq!(palette.text, Color32::WHITE);
    }

    #[test]
    fn window_fills_monitor_height_minus_margin() {
        let config = Config::default();
        assert_eq!(fit_window_height(1080.0, &config), 980.0);
        // Tiny monitors still fit the header and one button.
        assert!(fit_window_height(50.0, &config) >= HEADER_HEIGHT);
    }

    #[test]
    fn configured_height_wins_over_fallback() {
        let mut config = Config::default();
        assert_eq!(initial_window_height(&config), FALLBACK_WINDOW_HEIGHT);
        config.appearance.window_height = 640;
        assert_eq!(initial_window_height(&config), 640.0);
    }

    #[test]
    fn hover_text_names_kind_and_path() {
        let entry = ShortcutEntry::from_path(PathBuf::from("Toolbar/Notepad.lnk"));
        assert_eq!(hover_text(&entry), "Shortcut: Toolbar/Notepad.lnk");
    }

    #[test]
    fn docks_to_top_right() {
        assert_eq!(default_position(1920.0, 130.0), egui::pos2(1790.0, 0.0));
        assert_eq!(default_position(100.0, 130.0), egui::pos2(0.0, 0.0));
    }

    #[test]
    fn drop_target_picks_entry_under_pointer() {
        let rects = vec![
            (
                PathBuf::from("a.lnk"),
                egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(110.0, 90.0)),
            ),
            (
                PathBuf::from("b.lnk"),
                egui::Rect::from_min_size(egui::pos2(0.0, 95.0), egui::vec2(110.0, 90.0)),
            ),
        ];
        assert_eq!(
            drop_target(&rects, egui::pos2(50.0, 120.0)),
            Some(Path::new("b.lnk"))
        );
        assert_eq!(drop_target(&rects, egui::pos2(50.0, 92.0)), None);
    }
}
