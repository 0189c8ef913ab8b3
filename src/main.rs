#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use sayings_paint::SayingsApp;

// When compiling natively:
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // Optional settings file: `sayings path/to/settings.json`
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Sayings"),
        ..Default::default()
    };

    eframe::run_native(
        "Sayings",
        native_options,
        Box::new(move |cc| Ok(Box::new(SayingsApp::new(cc, config_path.as_deref())?))),
    )
}
