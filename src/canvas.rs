use egui::{Pos2, Rect, Vec2};

/// Pan state of the map view.
///
/// Device coordinates are measured from the top-left corner of the rendered
/// (zoomed) map, wherever it currently sits inside the panel.
#[derive(Debug, Default)]
pub struct Canvas {
    offset: Vec2,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn reset_view(&mut self) {
        self.offset = Vec2::ZERO;
    }

    pub fn origin(&self, view_rect: Rect) -> Pos2 {
        view_rect.min + self.offset
    }

    /// Screen rectangle covered by a map of `size` device pixels.
    pub fn map_rect(&self, view_rect: Rect, size: Vec2) -> Rect {
        Rect::from_min_size(self.origin(view_rect), size)
    }

    pub fn screen_to_device(&self, screen_pos: Pos2, view_rect: Rect) -> Pos2 {
        (screen_pos - self.origin(view_rect)).to_pos2()
    }

    pub fn device_to_screen(&self, device_pos: Pos2, view_rect: Rect) -> Pos2 {
        self.origin(view_rect) + device_pos.to_vec2()
    }
}
