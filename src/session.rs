//! The editing session: marker store, view state and persistence wired
//! together behind pointer/keyboard style entry points.

use crate::coordinate::{to_device_space, to_image_space};
use crate::marker::{Marker, MarkerColor};
use crate::persistence::{LoadOutcome, MarkerRepository};
use crate::store::MarkerStore;
use crate::view::ViewState;

/// Radius of the circle drawn for each marker, in device pixels.
pub const GLYPH_RADIUS: f32 = 10.0;

/// A marker projected onto the current zoomed view.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGlyph {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub label: String,
    pub color: MarkerColor,
}

impl MarkerGlyph {
    fn project(marker: &Marker, zoom_factor: f64) -> Self {
        let (x, y) = to_device_space(marker.x, marker.y, zoom_factor);
        Self {
            x: x as f32,
            y: y as f32,
            radius: GLYPH_RADIUS,
            label: marker.label.clone(),
            color: marker.color,
        }
    }
}

/// Whatever renders the map. It keeps no marker data of its own.
pub trait DisplaySurface {
    fn clear_markers(&mut self);
    fn draw_base_image(&mut self, zoom_factor: f64);
    fn draw_marker(&mut self, glyph: &MarkerGlyph);
}

pub struct Session<R: MarkerRepository> {
    store: MarkerStore,
    view: ViewState,
    repository: R,
    // Set when the persisted markers could not be read. Saving stays off so
    // the unread file is not replaced by a partial list.
    saving_paused: bool,
}

impl<R: MarkerRepository> Session<R> {
    /// Loads persisted markers. A missing source is a first run and gets
    /// created straight away.
    pub fn open(mut repository: R) -> Self {
        let mut store = MarkerStore::new();
        let mut saving_paused = false;
        match repository.load(&mut store) {
            Ok(LoadOutcome::Loaded(count)) => log::info!("Loaded {count} marker(s)"),
            Ok(LoadOutcome::Missing) => {
                log::info!("Marker file not found, creating a new one");
                if let Err(err) = repository.save(&store) {
                    log::error!("Failed to create marker file: {err:#}");
                }
            }
            Err(err) => {
                log::error!("Failed to load markers, saving is paused: {err:#}");
                store = MarkerStore::new();
                saving_paused = true;
            }
        }

        Self {
            store,
            view: ViewState::default(),
            repository,
            saving_paused,
        }
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    pub fn saving_paused(&self) -> bool {
        self.saving_paused
    }

    /// Re-enables saving after a failed load and writes the current markers,
    /// replacing whatever the unreadable source held.
    pub fn resume_saving(&mut self) {
        if self.saving_paused {
            log::warn!("Saving resumed, the previous marker file will be overwritten");
            self.saving_paused = false;
            self.persist();
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[cfg(test)]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Places a marker under the pointer with the active colour.
    pub fn primary_click(&mut self, device_x: f64, device_y: f64, label: &str) -> usize {
        let (x, y) = to_image_space(device_x, device_y, self.view.zoom_factor());
        // Commas would break the line format.
        let label = label.replace(',', " ");
        let index = self.store.add(x, y, label, self.view.active_color());
        log::debug!("Added marker #{index} at ({x}, {y})");
        self.persist();
        index
    }

    /// Removes the marker under the pointer, if any.
    pub fn secondary_click(&mut self, device_x: f64, device_y: f64) -> bool {
        let (x, y) = to_image_space(device_x, device_y, self.view.zoom_factor());
        match self.store.remove_nearest(x, y) {
            Some(removed) => {
                log::debug!("Removed marker at ({}, {})", removed.x, removed.y);
                self.persist();
                true
            }
            None => false,
        }
    }

    pub fn scroll(&mut self, delta: f32) -> bool {
        self.view.zoom_by_scroll(delta)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.view.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.view.zoom_out()
    }

    /// Only affects markers added afterwards.
    pub fn toggle_color(&mut self) -> MarkerColor {
        self.view.toggle_color()
    }

    pub fn glyphs(&self) -> impl Iterator<Item = MarkerGlyph> + '_ {
        let zoom_factor = self.view.zoom_factor();
        self.store
            .iter()
            .map(move |marker| MarkerGlyph::project(marker, zoom_factor))
    }

    /// Full redraw from the current zoom and store contents.
    pub fn redraw<S: DisplaySurface>(&self, surface: &mut S) {
        surface.clear_markers();
        surface.draw_base_image(self.view.zoom_factor());
        for glyph in self.glyphs() {
            surface.draw_marker(&glyph);
        }
    }

    fn persist(&mut self) {
        if self.saving_paused {
            log::warn!("Not saving markers, the marker file could not be loaded");
            return;
        }
        if let Err(err) = self.repository.save(&self.store) {
            log::error!("Failed to save markers: {err:#}");
        }
    }
}
