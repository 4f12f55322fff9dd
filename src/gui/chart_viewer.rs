//! Chart Viewer Widget
//! Central scrollable page: dataset preview, animated energy mix, CO2 trends.

use crate::charts::ChartPlotter;
use crate::data::{DataProcessor, MixRow, Observation};
use crate::stats::{TrendResult, TrendSeries};
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::time::Duration;

const SECTION_SPACING: f32 = 20.0;
const SOURCE_URL: &str = "https://ember-energy.org/data/yearly-electricity-data/";

/// Year animation for the mix chart.
#[derive(Debug, Clone, Default)]
pub struct MixAnimation {
    pub years: Vec<i64>,
    pub frame: usize,
    pub playing: bool,
    last_advance: f64,
}

impl MixAnimation {
    /// Replace the frames, keeping the current year when it still exists.
    pub fn set_years(&mut self, years: Vec<i64>) {
        let current = self.current_year();
        self.frame = current
            .and_then(|year| years.iter().position(|&y| y == year))
            .unwrap_or(0);
        self.years = years;
        if self.years.len() < 2 {
            self.playing = false;
        }
    }

    pub fn current_year(&self) -> Option<i64> {
        self.years.get(self.frame).copied()
    }

    /// Move to the next year, wrapping back to the first.
    pub fn advance(&mut self) {
        if !self.years.is_empty() {
            self.frame = (self.frame + 1) % self.years.len();
        }
    }

    /// Advance when `interval` has elapsed since the last step.
    pub fn tick(&mut self, now: f64, interval: Duration) -> bool {
        if !self.playing {
            self.last_advance = now;
            return false;
        }
        if now - self.last_advance >= interval.as_secs_f64() {
            self.advance();
            self.last_advance = now;
            return true;
        }
        false
    }
}

/// Scrollable display of the two dashboard sections.
#[derive(Default)]
pub struct ChartViewer {
    pub preview: Vec<Observation>,
    pub total_rows: usize,
    pub mix_rows: Vec<MixRow>,
    /// Countries on the mix x-axis, fixed across frames.
    pub mix_areas: Vec<String>,
    pub animation: MixAnimation,
    pub trends: TrendResult,
    pub co2_series: Vec<TrendSeries>,
    pub load_error: Option<String>,
    pub frame_interval: Duration,
}

impl ChartViewer {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            ..Self::default()
        }
    }

    pub fn set_preview(&mut self, preview: Vec<Observation>, total_rows: usize) {
        self.preview = preview;
        self.total_rows = total_rows;
    }

    pub fn set_mix_rows(&mut self, rows: Vec<MixRow>) {
        self.mix_areas = rows
            .iter()
            .map(|row| row.area.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.animation.set_years(DataProcessor::years(&rows));
        self.mix_rows = rows;
    }

    pub fn set_trends(&mut self, trends: TrendResult, series: Vec<TrendSeries>) {
        self.trends = trends;
        self.co2_series = series;
    }

    pub fn current_year(&self) -> Option<i64> {
        self.animation.current_year()
    }

    /// Draw the page
    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        if self.animation.tick(ctx.input(|i| i.time), self.frame_interval) {
            ctx.request_repaint();
        }
        if self.animation.playing {
            ctx.request_repaint_after(self.frame_interval);
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Exploring Europe's electricity data").size(26.0));
                ui.label(
                    RichText::new(
                        "A snapshot of Europe's energy mix and CO2 intensity from 1990 to 2024",
                    )
                    .size(16.0),
                );
                ui.add_space(SECTION_SPACING);

                if let Some(error) = &self.load_error {
                    ui.label(
                        RichText::new(format!("Error: {}", error))
                            .size(14.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                    return;
                }

                self.show_dataset_section(ui);
                ui.add_space(SECTION_SPACING);
                self.show_mix_section(ui);
                ui.add_space(SECTION_SPACING);
                self.show_trend_section(ui);
            });
    }

    fn show_dataset_section(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Dataset").size(18.0).strong());
        ui.horizontal_wrapped(|ui| {
            ui.label("This dashboard relies on the dataset published by");
            ui.hyperlink_to("Ember", SOURCE_URL);
            ui.label("labelled 'Yearly electricity data Europe'.");
        });
        ui.label(
            RichText::new(format!(
                "Showing {} of {} rows",
                self.preview.len(),
                self.total_rows
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
        ui.add_space(5.0);
        ChartPlotter::draw_dataset_table(ui, &self.preview);
    }

    fn show_mix_section(&mut self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("1. Visualising changes in the energy mix")
                .size(18.0)
                .strong(),
        );
        ui.label(
            "The energy mix is the combination of sources a country uses to generate \
             electricity. The animated chart plays out how sources of generation have \
             varied over time.",
        );
        ui.add_space(8.0);

        let Some(year) = self.animation.current_year() else {
            ui.label(RichText::new("No mix data for the selected countries.").color(Color32::GRAY));
            return;
        };

        ui.horizontal(|ui| {
            let play_label = if self.animation.playing { "⏸ Pause" } else { "▶ Play" };
            if ui
                .add_enabled(self.animation.years.len() > 1, egui::Button::new(play_label))
                .clicked()
            {
                self.animation.playing = !self.animation.playing;
            }

            let last = self.animation.years.len().saturating_sub(1);
            let years = self.animation.years.clone();
            ui.add(
                egui::Slider::new(&mut self.animation.frame, 0..=last)
                    .show_value(false)
                    .text("Year"),
            );
            ui.label(RichText::new(year.to_string()).size(16.0).strong());
            if let (Some(first), Some(end)) = (years.first(), years.last()) {
                ui.label(
                    RichText::new(format!("({}-{})", first, end))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
        });

        let year = self.animation.current_year().unwrap_or(year);
        let frame = DataProcessor::rows_for_year(&self.mix_rows, year);
        ui.label(
            RichText::new("The source of electricity generation over time")
                .size(14.0)
                .strong(),
        );
        ui.label(RichText::new("Source of generation").size(11.0).color(Color32::GRAY));
        ChartPlotter::draw_mix_chart(ui, &frame, &self.mix_areas, year);
    }

    fn show_trend_section(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("2. Carbon dioxide intensity over the years")
                .size(18.0)
                .strong(),
        );
        ui.label(
            "Carbon dioxide intensity is the mass of CO2 emitted to produce a kilowatt \
             hour of electricity. The table gives each country's rate of change from a \
             line of best fit.",
        );
        ui.add_space(8.0);

        ChartPlotter::draw_trend_table(ui, &self.trends);
        ui.add_space(10.0);

        ui.label(RichText::new("CO2 intensity vs time").size(14.0).strong());
        ChartPlotter::draw_co2_chart(ui, &self.co2_series, &self.trends);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mix_row(area: &str, year: i64) -> MixRow {
        MixRow {
            area: area.to_string(),
            year,
            values: BTreeMap::new(),
        }
    }

    #[test]
    fn animation_wraps_around() {
        let mut animation = MixAnimation::default();
        animation.set_years(vec![2019, 2020, 2021]);
        animation.advance();
        animation.advance();
        assert_eq!(animation.current_year(), Some(2021));
        animation.advance();
        assert_eq!(animation.current_year(), Some(2019));
    }

    #[test]
    fn animation_ticks_only_while_playing() {
        let interval = Duration::from_millis(500);
        let mut animation = MixAnimation::default();
        animation.set_years(vec![2019, 2020]);

        assert!(!animation.tick(10.0, interval));
        animation.playing = true;
        assert!(!animation.tick(10.2, interval));
        assert!(animation.tick(10.6, interval));
        assert_eq!(animation.current_year(), Some(2020));
    }

    #[test]
    fn new_years_keep_current_frame_when_possible() {
        let mut animation = MixAnimation::default();
        animation.set_years(vec![2019, 2020, 2021]);
        animation.advance();
        animation.set_years(vec![2020, 2021]);
        assert_eq!(animation.current_year(), Some(2020));

        animation.set_years(vec![1990]);
        assert_eq!(animation.current_year(), Some(1990));
        assert!(!animation.playing);
    }

    #[test]
    fn mix_areas_are_stable_across_years() {
        let mut viewer = ChartViewer::new(Duration::from_millis(800));
        viewer.set_mix_rows(vec![
            mix_row("Spain", 2020),
            mix_row("Germany", 2021),
            mix_row("Spain", 2021),
        ]);
        assert_eq!(viewer.mix_areas, ["Germany", "Spain"]);
        assert_eq!(viewer.animation.years, [2020, 2021]);
        assert_eq!(viewer.current_year(), Some(2020));
    }
}
