//! Europe Electricity Explorer - energy mix & CO2 intensity dashboard
//!
//! Loads the Ember yearly electricity release and renders the interactive charts.

use eframe::egui;
use europower::config::DashboardConfig;
use europower::gui::DashboardApp;
use europower::logging;

fn main() -> anyhow::Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = DashboardConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title("Europe Electricity Data"),
        ..Default::default()
    };

    eframe::run_native(
        "Europe Electricity Data",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard exited with error: {e}"))
}
