mod app;
mod canvas;
mod config;
mod coordinate;
mod hit;
mod map;
mod marker;
mod persistence;
mod session;
mod store;
mod ui;
mod view;

use app::MapMarkerApp;
use config::AppConfig;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(config.window_width, config.window_height)),
        min_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Map Markers",
        native_options,
        Box::new(move |cc| Box::new(MapMarkerApp::new(cc, config))),
    )
}
