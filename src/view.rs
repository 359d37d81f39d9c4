use crate::marker::MarkerColor;

// Zoom is kept in tenths so the bounds are reached exactly.
const MIN_ZOOM_STEPS: i32 = 5;
const MAX_ZOOM_STEPS: i32 = 20;
const DEFAULT_ZOOM_STEPS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    zoom_steps: i32,
    active_color: MarkerColor,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom_steps: DEFAULT_ZOOM_STEPS,
            active_color: MarkerColor::default(),
        }
    }
}

impl ViewState {
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_steps as f64 / 10.0
    }

    /// Zoom level as a whole number of tenths, handy as a cache key.
    pub fn zoom_steps(&self) -> i32 {
        self.zoom_steps
    }

    pub fn active_color(&self) -> MarkerColor {
        self.active_color
    }

    /// Returns `false` when already at the maximum zoom.
    pub fn zoom_in(&mut self) -> bool {
        self.step_zoom(1)
    }

    /// Returns `false` when already at the minimum zoom.
    pub fn zoom_out(&mut self) -> bool {
        self.step_zoom(-1)
    }

    /// One zoom step per wheel event, direction taken from the sign of `delta`.
    pub fn zoom_by_scroll(&mut self, delta: f32) -> bool {
        if delta > 0.0 {
            self.zoom_in()
        } else if delta < 0.0 {
            self.zoom_out()
        } else {
            false
        }
    }

    pub fn toggle_color(&mut self) -> MarkerColor {
        self.active_color = self.active_color.toggled();
        self.active_color
    }

    fn step_zoom(&mut self, step: i32) -> bool {
        let next = (self.zoom_steps + step).clamp(MIN_ZOOM_STEPS, MAX_ZOOM_STEPS);
        let changed = next != self.zoom_steps;
        self.zoom_steps = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::ViewState;
    use crate::marker::MarkerColor;

    #[test]
    fn starts_at_unit_zoom_and_red() {
        let view = ViewState::default();
        assert_eq!(view.zoom_factor(), 1.0);
        assert_eq!(view.active_color(), MarkerColor::Red);
    }

    #[test]
    fn zoom_in_clamps_at_two() {
        let mut view = ViewState::default();
        for _ in 0..25 {
            view.zoom_in();
        }
        assert_eq!(view.zoom_factor(), 2.0);
        assert!(!view.zoom_in());
        assert_eq!(view.zoom_factor(), 2.0);
        assert_eq!(view.zoom_steps(), 20);
    }

    #[test]
    fn zoom_out_clamps_at_half() {
        let mut view = ViewState::default();
        for _ in 0..25 {
            view.zoom_by_scroll(-120.0);
        }
        assert_eq!(view.zoom_factor(), 0.5);
        assert!(!view.zoom_out());
    }

    #[test]
    fn scroll_steps_by_a_tenth() {
        let mut view = ViewState::default();
        assert!(view.zoom_by_scroll(3.0));
        assert_eq!(view.zoom_factor(), 1.1);
        assert!(!view.zoom_by_scroll(0.0));
        assert!(view.zoom_by_scroll(-50.0));
        assert_eq!(view.zoom_factor(), 1.0);
    }

    #[test]
    fn toggle_is_independent_of_zoom() {
        let mut view = ViewState::default();
        view.zoom_in();
        assert_eq!(view.toggle_color(), MarkerColor::Blue);
        assert_eq!(view.zoom_factor(), 1.1);
        assert_eq!(view.toggle_color(), MarkerColor::Red);
    }
}
