#![warn(clippy::all, rust_2018_idioms)]

use paint_canvas::{PaintApp, SessionConfig};

/// Environment variable naming an optional JSON session config
const CONFIG_ENV: &str = "PAINT_CANVAS_CONFIG";

fn load_config() -> SessionConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return SessionConfig::default();
    };
    SessionConfig::load(&path).unwrap_or_else(|err| {
        log::error!("Ignoring {CONFIG_ENV}={}: {err}", path.to_string_lossy());
        SessionConfig::default()
    })
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = load_config();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Paint Canvas")
            .with_inner_size([
                config.canvas_width as f32 + 260.0,
                config.canvas_height as f32 + 40.0,
            ])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Paint Canvas",
        native_options,
        Box::new(move |cc| Ok(Box::new(PaintApp::new(cc, config)))),
    )
}
