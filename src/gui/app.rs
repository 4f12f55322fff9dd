//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::{defaults_present, DashboardConfig};
use crate::data::{CleanedDataset, DataLoader, DataProcessor};
use crate::export::{ReportExporter, ResultsSnapshot};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, SelectionTarget};
use crate::stats::StatsCalculator;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{debug, error, warn};

/// CSV loading result from background thread
enum LoadResult {
    Complete(CleanedDataset),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    dataset: Option<CleanedDataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            chart_viewer: ChartViewer::new(config.frame_interval),
            config,
            dataset: None,
            control_panel: ControlPanel::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load the fixed data file in a background thread.
    fn start_loading(&mut self) {
        let path = self.config.resolve_data_file();
        self.control_panel.data_file = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::load_csv(&path) {
                Ok(dataset) => LoadResult::Complete(dataset),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(dataset)) => {
                self.install_dataset(dataset);
                self.is_loading = false;
            }
            Ok(LoadResult::Error(message)) => {
                error!("Dashboard failed to start: {}", message);
                self.control_panel
                    .set_status(&format!("Error: {}", message));
                self.chart_viewer.load_error = Some(message);
                self.is_loading = false;
            }
            Err(TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                error!("CSV loader thread exited without a result");
                self.control_panel
                    .set_status("Error: CSV loader stopped unexpectedly");
                self.chart_viewer.load_error = Some("CSV loader stopped unexpectedly".to_string());
                self.is_loading = false;
            }
        }
    }

    fn install_dataset(&mut self, dataset: CleanedDataset) {
        if dataset.is_empty() {
            warn!("Data file has no rows left after cleaning");
        }
        let options = dataset.areas();
        let mix_defaults = defaults_present(&self.config.default_mix_countries, &options);
        let trend_defaults = defaults_present(&self.config.default_trend_countries, &options);
        self.control_panel
            .update_countries(options, mix_defaults, trend_defaults);
        self.control_panel.row_count = dataset.height();

        match dataset.preview(self.config.preview_rows) {
            Ok(preview) => self.chart_viewer.set_preview(preview, dataset.height()),
            Err(e) => error!("Failed to build dataset preview: {}", e),
        }

        self.control_panel.set_status(&format!(
            "Loaded {} rows, {} countries",
            dataset.height(),
            self.control_panel.country_options.len()
        ));
        self.dataset = Some(dataset);
        self.refresh_mix();
        self.refresh_trends();
    }

    /// Re-run the mix reshape for the current selection.
    fn refresh_mix(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let selected = &self.control_panel.mix_selection.selected;
        debug!("Mix selection: {:?}", selected);

        match DataProcessor::reshape_mix(dataset, selected) {
            Ok(rows) => self.chart_viewer.set_mix_rows(rows),
            Err(e) => {
                error!("Mix reshape failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Re-run the trend fit for the current selection.
    fn refresh_trends(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let selected = &self.control_panel.trend_selection.selected;
        debug!("Trend selection: {:?}", selected);

        let result = StatsCalculator::estimate_trends(dataset, selected).and_then(|trends| {
            StatsCalculator::co2_series(dataset, selected).map(|series| (trends, series))
        });
        match result {
            Ok((trends, series)) => self.chart_viewer.set_trends(trends, series),
            Err(e) => {
                error!("Trend estimation failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn save_dialog(filter: &str, extension: &str, file_name: String) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, &[extension])
            .set_file_name(file_name)
            .save_file()
    }

    fn handle_export_mix_png(&mut self) {
        let Some(year) = self.chart_viewer.current_year() else {
            self.control_panel.set_status("No mix chart to export");
            return;
        };
        let Some(path) = Self::save_dialog("PNG Image", "png", format!("energy_mix_{year}.png"))
        else {
            return;
        };

        match ReportExporter::export_mix_png(&self.chart_viewer.mix_rows, year, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Mix chart exported: {}", path.display()));
                ReportExporter::open_exported(&path);
            }
            Err(e) => {
                error!("Mix chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_export_co2_png(&mut self) {
        if self.chart_viewer.co2_series.is_empty() {
            self.control_panel.set_status("No CO2 chart to export");
            return;
        }
        let Some(path) = Self::save_dialog("PNG Image", "png", "co2_intensity.png".to_string())
        else {
            return;
        };

        match ReportExporter::export_co2_png(
            &self.chart_viewer.co2_series,
            &self.chart_viewer.trends,
            &path,
        ) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("CO2 chart exported: {}", path.display()));
                ReportExporter::open_exported(&path);
            }
            Err(e) => {
                error!("CO2 chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_export_json(&mut self) {
        let Some(path) = Self::save_dialog("JSON", "json", "europe_electricity.json".to_string())
        else {
            return;
        };

        let snapshot = ResultsSnapshot {
            mix_countries: &self.control_panel.mix_selection.selected,
            trend_countries: &self.control_panel.trend_selection.selected,
            mix: &self.chart_viewer.mix_rows,
            trends: &self.chart_viewer.trends,
        };
        let result = ReportExporter::write_json(&snapshot, &path);

        match result {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Results exported: {}", path.display())),
            Err(e) => {
                error!("Results export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged(SelectionTarget::Mix) => {
                            self.refresh_mix()
                        }
                        ControlPanelAction::SelectionChanged(SelectionTarget::Trend) => {
                            self.refresh_trends()
                        }
                        ControlPanelAction::ExportMixPng => self.handle_export_mix_png(),
                        ControlPanelAction::ExportCo2Png => self.handle_export_co2_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.is_loading {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            }
            self.chart_viewer.show(ctx, ui);
        });
    }
}
