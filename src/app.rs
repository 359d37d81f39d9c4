use crate::canvas::Canvas;
use crate::config::AppConfig;
use crate::map::MapImage;
use crate::persistence::FileRepository;
use crate::session::{DisplaySurface, MarkerGlyph, Session};
use crate::ui::UiState;
use clipboard::ClipboardContext;
use clipboard::ClipboardProvider;
use egui::{Color32, Context, Painter, Rect, Stroke, Ui, Vec2};

const MARKER_STROKE: f32 = 2.0;
const LABEL_GAP: f32 = 5.0;

/// Base map plus the texture uploaded for the zoom it was last drawn at.
struct MapLayer {
    image: Option<MapImage>,
    texture: Option<(i32, egui::TextureHandle)>,
    placeholder_size: Vec2,
}

impl MapLayer {
    fn new(image: Option<MapImage>, placeholder_size: Vec2) -> Self {
        Self {
            image,
            texture: None,
            placeholder_size,
        }
    }

    fn replace(&mut self, image: MapImage) {
        self.image = Some(image);
        self.texture = None;
    }

    // Device-space size of the map at this zoom.
    fn extent(&self, zoom_factor: f64) -> Vec2 {
        match &self.image {
            Some(image) => {
                let (w, h) = image.scaled_size(zoom_factor);
                egui::vec2(w as f32, h as f32)
            }
            None => egui::vec2(
                (self.placeholder_size.x as f64 * zoom_factor) as f32,
                (self.placeholder_size.y as f64 * zoom_factor) as f32,
            ),
        }
    }

    fn texture_for(
        &mut self,
        ctx: &Context,
        zoom_factor: f64,
        key: i32,
    ) -> Option<&egui::TextureHandle> {
        let image = self.image.as_ref()?;
        let stale = !matches!(&self.texture, Some((cached, _)) if *cached == key);
        if stale {
            let scaled = image.scaled(zoom_factor);
            let size = [scaled.width() as usize, scaled.height() as usize];
            let pixels = scaled.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            let texture = ctx.load_texture("map", color_image, egui::TextureOptions::LINEAR);
            self.texture = Some((key, texture));
        }
        self.texture.as_ref().map(|(_, texture)| texture)
    }
}

/// Paints a session redraw into the central panel.
struct EguiSurface<'a> {
    ctx: &'a Context,
    painter: &'a Painter,
    view_rect: Rect,
    zoom_steps: i32,
    canvas: &'a Canvas,
    map: &'a mut MapLayer,
}

impl DisplaySurface for EguiSurface<'_> {
    fn clear_markers(&mut self) {
        self.painter
            .rect_filled(self.view_rect, 0.0, Color32::from_gray(40));
    }

    fn draw_base_image(&mut self, zoom_factor: f64) {
        let map_rect = self
            .canvas
            .map_rect(self.view_rect, self.map.extent(zoom_factor));

        if let Some(texture) = self.map.texture_for(self.ctx, zoom_factor, self.zoom_steps) {
            self.painter.image(
                texture.id(),
                map_rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            self.painter
                .rect_filled(map_rect, 0.0, Color32::from_rgb(225, 225, 215));
            self.painter.text(
                map_rect.center(),
                egui::Align2::CENTER_CENTER,
                "No map loaded",
                egui::FontId::proportional(24.0),
                Color32::from_gray(120),
            );
        }
    }

    fn draw_marker(&mut self, glyph: &MarkerGlyph) {
        let center = self
            .canvas
            .device_to_screen(egui::pos2(glyph.x, glyph.y), self.view_rect);
        self.painter.circle_stroke(
            center,
            glyph.radius,
            Stroke::new(MARKER_STROKE, glyph.color.to_color32()),
        );

        if !glyph.label.is_empty() {
            self.painter.text(
                center + egui::vec2(glyph.radius + LABEL_GAP, 0.0),
                egui::Align2::LEFT_CENTER,
                &glyph.label,
                egui::FontId::default(),
                Color32::BLACK,
            );
        }
    }
}

pub struct MapMarkerApp {
    session: Session<FileRepository>,
    canvas: Canvas,
    map: MapLayer,
    ui_state: UiState,
    clipboard: Option<ClipboardContext>,
}

impl MapMarkerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        cc.egui_ctx.set_style(style);

        let clipboard = ClipboardProvider::new().ok();
        let mut ui_state = UiState::default();

        let image = match MapImage::open(&config.map_path) {
            Ok(image) => Some(image),
            Err(err) => {
                log::error!("{err:#}");
                ui_state.status = Some(format!(
                    "Failed to open the map image {}",
                    config.map_path.display()
                ));
                None
            }
        };

        let repository = FileRepository::new(&config.markers_path);
        log::info!("Markers are stored in {}", repository.path().display());
        let session = Session::open(repository);

        Self {
            session,
            canvas: Canvas::new(),
            map: MapLayer::new(
                image,
                egui::vec2(config.window_width, config.window_height),
            ),
            ui_state,
            clipboard,
        }
    }

    pub fn copy_to_clipboard(&mut self, text: String) -> bool {
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_contents(text).is_ok()
        } else {
            false
        }
    }

    fn open_map_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            return;
        };

        match MapImage::open(&path) {
            Ok(image) => {
                self.map.replace(image);
                self.canvas.reset_view();
                self.ui_state.status = None;
            }
            Err(err) => {
                log::error!("{err:#}");
                self.ui_state.status = Some(format!("Failed to open {}", path.display()));
            }
        }
    }

    fn toggle_color(&mut self, ctx: &Context) {
        let color = self.session.toggle_color();
        log::debug!("Active marker color is now {color}");
        ctx.request_repaint();
    }

    // Handle mouse interactions with the canvas
    fn handle_canvas_interactions(&mut self, ui: &mut Ui, response: egui::Response) {
        let view_rect = response.rect;
        let zoom_factor = self.session.view().zoom_factor();
        let map_rect = self.canvas.map_rect(view_rect, self.map.extent(zoom_factor));
        let mut changed = false;

        if response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary) && ui.input(|i| i.modifiers.alt))
        {
            self.canvas.pan(response.drag_delta());
            changed = true;
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.scroll_delta.y);
            changed |= self.session.scroll(scroll_delta);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if map_rect.contains(pos) {
                    let device = self.canvas.screen_to_device(pos, view_rect);
                    self.session.primary_click(
                        device.x as f64,
                        device.y as f64,
                        &self.ui_state.label_input,
                    );
                    self.ui_state.label_input.clear();
                    changed = true;
                }
            }
        }

        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if map_rect.contains(pos) {
                    let device = self.canvas.screen_to_device(pos, view_rect);
                    changed |= self
                        .session
                        .secondary_click(device.x as f64, device.y as f64);
                }
            }
        }

        if changed {
            ui.ctx().request_repaint();
        }
    }

    // Draw the map and all markers, then report the canvas response
    fn draw_canvas(&mut self, ui: &mut Ui) -> egui::Response {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        let mut surface = EguiSurface {
            ctx: ui.ctx(),
            painter: &painter,
            view_rect: response.rect,
            zoom_steps: self.session.view().zoom_steps(),
            canvas: &self.canvas,
            map: &mut self.map,
        };
        self.session.redraw(&mut surface);

        response
    }

    fn marker_list(&mut self, ui: &mut Ui) {
        ui.heading(format!("Markers ({})", self.session.store().len()));

        if self.session.store().is_empty() {
            ui.label("Click the map to place a marker.");
            return;
        }

        if ui.button("Copy All Coordinates").clicked() {
            let all_coords = self
                .session
                .store()
                .iter()
                .enumerate()
                .map(|(i, marker)| format!("{}. ({}, {}) {}", i + 1, marker.x, marker.y, marker.label))
                .collect::<Vec<String>>()
                .join("\n");
            self.copy_to_clipboard(all_coords);
        }

        let mut to_copy: Option<String> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (i, marker) in self.session.store().iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.colored_label(marker.color.to_color32(), "●");
                    ui.label(format!("{}. ({}, {}) {}", i + 1, marker.x, marker.y, marker.label));
                    if ui.button("Copy").clicked() {
                        to_copy = Some(format!("{}, {}", marker.x, marker.y));
                    }
                });
            }
        });

        if let Some(coords) = to_copy {
            self.copy_to_clipboard(coords);
        }
    }
}

impl eframe::App for MapMarkerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let tab_toggle = color_shortcut_pressed(ctx);
        if tab_toggle {
            self.toggle_color(ctx);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Map Markers");
                ui.separator();
                ui.label("Label:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.ui_state.label_input)
                        .desired_width(200.0),
                );
                let active = self.session.view().active_color();
                ui.colored_label(active.to_color32(), format!("● {active}"));
                if ui.button("Toggle Color").clicked() {
                    self.toggle_color(ctx);
                }
                ui.separator();
                if ui.button("−").clicked() {
                    self.session.zoom_out();
                }
                let zoom_percentage = (self.session.view().zoom_factor() * 100.0).round() as i32;
                ui.label(format!("{}%", zoom_percentage));
                if ui.button("+").clicked() {
                    self.session.zoom_in();
                }
                if ui.button("Reset View").clicked() {
                    self.canvas.reset_view();
                }
                ui.separator();
                if ui.button("Open Map…").clicked() {
                    self.open_map_dialog();
                }
                ui.checkbox(&mut self.ui_state.show_marker_list, "Marker list");
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.ui_state.status {
                    Some(status) => {
                        ui.colored_label(Color32::from_rgb(200, 60, 60), status.as_str());
                    }
                    None => {
                        if let Some(image) = &self.map.image {
                            ui.label(image.path().display().to_string());
                        }
                    }
                }
                if self.session.saving_paused() {
                    ui.separator();
                    ui.colored_label(
                        Color32::from_rgb(200, 60, 60),
                        "Marker file could not be read, changes are not saved",
                    );
                    if ui.button("Overwrite marker file").clicked() {
                        self.session.resume_saving();
                    }
                }
                ui.separator();
                ui.label("Click: add  •  Right-click: remove  •  Scroll: zoom  •  Tab: toggle color  •  Middle-drag: pan");
            });
        });

        if self.ui_state.show_marker_list {
            egui::SidePanel::right("marker_panel")
                .resizable(true)
                .default_width(250.0)
                .show(ctx, |ui| {
                    self.marker_list(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.draw_canvas(ui);
            self.handle_canvas_interactions(ui, response);
        });

        if tab_toggle {
            release_tab_focus(ctx);
        }
    }
}

/// Tab flips the active colour while no widget holds keyboard focus.
fn color_shortcut_pressed(ctx: &Context) -> bool {
    let nothing_focused = ctx.memory(|m| m.focus().is_none());
    nothing_focused && ctx.input(|i| i.key_pressed(egui::Key::Tab))
}

// egui moves focus to the first focusable widget on the same Tab press.
// Taking it back keeps the next press a colour toggle.
fn release_tab_focus(ctx: &Context) {
    ctx.memory_mut(|m| {
        if let Some(id) = m.focus() {
            m.surrender_focus(id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{color_shortcut_pressed, release_tab_focus};
    use egui::{Context, Event, Key, Modifiers, RawInput, Rect};

    fn tab_frame() -> RawInput {
        RawInput {
            screen_rect: Some(Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))),
            events: vec![
                Event::Key {
                    key: Key::Tab,
                    pressed: true,
                    repeat: false,
                    modifiers: Modifiers::NONE,
                },
                Event::Key {
                    key: Key::Tab,
                    pressed: false,
                    repeat: false,
                    modifiers: Modifiers::NONE,
                },
            ],
            ..RawInput::default()
        }
    }

    // Label field plus a button, like the top bar.
    fn run_toolbar(ctx: &Context, label: &mut String, release: bool) -> bool {
        let mut pressed = false;
        let _ = ctx.run(tab_frame(), |ctx| {
            pressed = color_shortcut_pressed(ctx);
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.text_edit_singleline(label);
                let _ = ui.button("Toggle Color");
            });
            if pressed && release {
                release_tab_focus(ctx);
            }
        });
        pressed
    }

    #[test]
    fn every_tab_press_toggles_when_focus_is_released() {
        let ctx = Context::default();
        let mut label = String::new();
        for _ in 0..3 {
            assert!(run_toolbar(&ctx, &mut label, true));
            assert!(ctx.memory(|m| m.focus().is_none()));
        }
    }

    #[test]
    fn tab_without_release_hands_focus_to_the_label_field() {
        let ctx = Context::default();
        let mut label = String::new();
        assert!(run_toolbar(&ctx, &mut label, false));
        assert!(ctx.memory(|m| m.focus().is_some()));
        assert!(!run_toolbar(&ctx, &mut label, false));
    }

    #[test]
    fn focused_label_field_keeps_tab() {
        let ctx = Context::default();
        let mut label = String::new();
        let _ = ctx.run(RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.text_edit_singleline(&mut label).request_focus();
            });
        });
        assert!(!run_toolbar(&ctx, &mut label, true));
    }
}
