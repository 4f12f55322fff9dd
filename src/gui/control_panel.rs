//! Control Panel Widget
//! Left side panel with the country selectors, exports and status line.

use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// Which of the two independent selectors a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTarget {
    Mix,
    Trend,
}

/// A multi-select list of countries. Selection order is kept.
#[derive(Debug, Default, Clone)]
pub struct CountrySelection {
    pub selected: Vec<String>,
}

impl CountrySelection {
    pub fn new(selected: Vec<String>) -> Self {
        Self { selected }
    }

    pub fn contains(&self, country: &str) -> bool {
        self.selected.iter().any(|c| c == country)
    }

    /// Add or remove a country; newly added countries go last.
    pub fn set(&mut self, country: &str, on: bool) -> bool {
        match (on, self.contains(country)) {
            (true, false) => {
                self.selected.push(country.to_string());
                true
            }
            (false, true) => {
                self.selected.retain(|c| c != country);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    pub fn select_all(&mut self, options: &[String]) -> bool {
        options
            .iter()
            .fold(false, |changed, option| self.set(option, true) || changed)
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub data_file: Option<PathBuf>,
    pub country_options: Vec<String>,
    pub mix_selection: CountrySelection,
    pub trend_selection: CountrySelection,
    pub row_count: usize,
    pub status: String,
    pub exports_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_file: None,
            country_options: Vec::new(),
            mix_selection: CountrySelection::default(),
            trend_selection: CountrySelection::default(),
            row_count: 0,
            status: "Ready".to_string(),
            exports_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the country list and the initial selections after loading.
    pub fn update_countries(
        &mut self,
        options: Vec<String>,
        mix_defaults: Vec<String>,
        trend_defaults: Vec<String>,
    ) {
        self.country_options = options;
        self.mix_selection = CountrySelection::new(mix_defaults);
        self.trend_selection = CountrySelection::new(trend_defaults);
        self.exports_enabled = !self.country_options.is_empty();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🔋 Europe Electricity")
                    .size(22.0)
                    .color(Color32::from_rgb(0, 104, 201)),
            );
            ui.label(
                RichText::new("Energy mix & CO2 intensity, 1990-2024")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let name = self
                    .data_file
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file".to_string());
                ui.label(RichText::new(name).size(12.0));
                if self.row_count > 0 {
                    ui.label(
                        RichText::new(format!("{} rows after cleaning", self.row_count))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Selectors =====
        ui.label(RichText::new("1. Energy mix countries").size(14.0).strong());
        ui.add_space(5.0);
        if Self::country_picker(
            ui,
            "mix_countries",
            &self.country_options,
            &mut self.mix_selection,
        ) {
            action = ControlPanelAction::SelectionChanged(SelectionTarget::Mix);
        }

        ui.add_space(15.0);
        ui.label(RichText::new("2. CO2 trend countries").size(14.0).strong());
        ui.add_space(5.0);
        if Self::country_picker(
            ui,
            "trend_countries",
            &self.country_options,
            &mut self.trend_selection,
        ) {
            action = ControlPanelAction::SelectionChanged(SelectionTarget::Trend);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.exports_enabled, |ui| {
                let size = egui::vec2(200.0, 28.0);
                if ui
                    .add(egui::Button::new("🖼 Export mix chart").min_size(size))
                    .clicked()
                {
                    action = ControlPanelAction::ExportMixPng;
                }
                ui.add_space(4.0);
                if ui
                    .add(egui::Button::new("📈 Export CO2 chart").min_size(size))
                    .clicked()
                {
                    action = ControlPanelAction::ExportCo2Png;
                }
                ui.add_space(4.0);
                if ui
                    .add(egui::Button::new("📄 Export results (JSON)").min_size(size))
                    .clicked()
                {
                    action = ControlPanelAction::ExportJson;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list with Select All / Clear All. Returns true on change.
    fn country_picker(
        ui: &mut egui::Ui,
        id: &str,
        options: &[String],
        selection: &mut CountrySelection,
    ) -> bool {
        let mut changed = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for country in options {
                            let mut checked = selection.contains(country);
                            if ui.checkbox(&mut checked, country).changed() {
                                changed |= selection.set(country, checked);
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                changed |= selection.select_all(options);
            }
            if ui.small_button("Clear All").clicked() {
                changed |= selection.clear();
            }
            ui.label(
                RichText::new(format!("{} selected", selection.selected.len()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        changed
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged(SelectionTarget),
    ExportMixPng,
    ExportCo2Png,
    ExportJson,
}
