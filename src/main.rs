mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::TitanicApp;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::parse();
    log::info!("Starting dashboard with {}", config.data.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Titanic Analytics")
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Titanic Analytics",
        options,
        Box::new(move |_cc| Ok(Box::new(TitanicApp::new(&config)))),
    )
}
