mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::EmissionsApp;
use clap::Parser;
use config::Cli;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // The viewer has nothing to show without its dataset: fail before opening a window.
    let dataset = data::loader::load_file(&cli.data)
        .with_context(|| format!("cannot start without dataset {}", cli.data.display()))?;
    let state = AppState::new(Arc::new(dataset), &cli);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GHG Viewer – Emissions by Sector",
        options,
        Box::new(|_cc| Ok(Box::new(EmissionsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
