mod engine;
mod model;
mod ui;

use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::ui::settings_io::load_settings;

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "table_role_game=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = load_settings();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Table Role Game")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Table Role Game",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::TableApp::new(settings)))),
    )
}
