//! Chart Plotter Module
//! Creates the interactive dashboard charts and tables using egui_plot.

use crate::charts::{linear_ticks, PALETTE, YEAR_TICK_ANCHOR, YEAR_TICK_STEP};
use crate::data::{Fuel, MixRow, Observation};
use crate::stats::{TrendResult, TrendSeries};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, Corner, GridInput, GridMark, Legend, Line, LineStyle, Plot, PlotPoints, Points,
};

const MIX_CHART_HEIGHT: f32 = 420.0;
const CO2_CHART_HEIGHT: f32 = 420.0;
const BAR_WIDTH: f64 = 0.6;

pub const RATE_HEADER: &str = "Rate of change in CO2 intensity (gCO2e/kWh per year)";

/// Slope formatted for the trend table.
pub fn format_rate(slope: f64) -> String {
    format!("{:.3}", slope)
}

/// Bar heights of one fuel across `areas`. Absent shares draw as zero height.
pub fn mix_bar_heights(frame: &[&MixRow], areas: &[String], fuel: Fuel) -> Vec<f64> {
    areas
        .iter()
        .map(|area| {
            frame
                .iter()
                .find(|row| &row.area == area)
                .and_then(|row| row.share(fuel))
                .unwrap_or(0.0)
        })
        .collect()
}

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn fuel_color(fuel: Fuel) -> Color32 {
        Self::palette_color(fuel.index())
    }

    pub fn series_color(index: usize) -> Color32 {
        Self::palette_color(index)
    }

    fn palette_color(index: usize) -> Color32 {
        let (r, g, b) = PALETTE[index % PALETTE.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Stacked generation mix for one year. X-axis: countries, Y-axis: share (%).
    ///
    /// Every fuel gets one bar per area so stacking stays aligned by index.
    pub fn draw_mix_chart(ui: &mut egui::Ui, frame: &[&MixRow], areas: &[String], year: i64) {
        let x_labels: Vec<String> = areas.to_vec();
        let area_count = areas.len();

        Plot::new("mix_chart")
            .height(MIX_CHART_HEIGHT)
            .legend(Legend::default().position(Corner::RightTop))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(100.0)
            .include_x(-0.5)
            .include_x(area_count as f64 - 0.5)
            .x_axis_label("Country")
            .y_axis_label("Electricity Generated (%)")
            .x_grid_spacer(move |input: GridInput| {
                (0..area_count)
                    .map(|i| i as f64)
                    .filter(|&x| x >= input.bounds.0 && x <= input.bounds.1)
                    .map(|value| GridMark {
                        value,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < x_labels.len() {
                    x_labels[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let mut charts: Vec<BarChart> = Vec::with_capacity(Fuel::ALL.len());

                for fuel in Fuel::ALL {
                    let color = Self::fuel_color(fuel);
                    let bars: Vec<Bar> = mix_bar_heights(frame, areas, fuel)
                        .into_iter()
                        .enumerate()
                        .map(|(i, share)| {
                            Bar::new(i as f64, share)
                                .width(BAR_WIDTH)
                                .name(format!("{} {}", areas[i], year))
                        })
                        .collect();

                    let below: Vec<&BarChart> = charts.iter().collect();
                    let chart = BarChart::new(bars)
                        .name(fuel.label())
                        .color(color)
                        .stack_on(&below);
                    charts.push(chart);
                }

                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// CO2 intensity over time, one line with markers per country and the
    /// fitted trend as a dashed overlay.
    pub fn draw_co2_chart(ui: &mut egui::Ui, series: &[TrendSeries], trends: &TrendResult) {
        Plot::new("co2_chart")
            .height(CO2_CHART_HEIGHT)
            .legend(Legend::default().position(Corner::RightTop))
            .x_axis_label("Year")
            .y_axis_label("CO2 Intensity (gCO2e per kWh)")
            .allow_scroll(false)
            .include_y(0.0)
            .x_grid_spacer(|input: GridInput| {
                linear_ticks(input.bounds.0, input.bounds.1, YEAR_TICK_ANCHOR, YEAR_TICK_STEP)
                    .into_iter()
                    .map(|value| GridMark {
                        value,
                        step_size: YEAR_TICK_STEP,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64))
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(i);
                    let points: Vec<[f64; 2]> = s
                        .points
                        .iter()
                        .map(|&(year, value)| [year as f64, value])
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(color)
                            .width(1.5)
                            .name(&s.country),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(3.0)
                            .color(color),
                    );

                    if let (Some(fit), Some(first), Some(last)) =
                        (trends.get(&s.country), points.first(), points.last())
                    {
                        let ends = vec![
                            [first[0], fit.predict(first[0])],
                            [last[0], fit.predict(last[0])],
                        ];
                        plot_ui.line(
                            Line::new(PlotPoints::new(ends))
                                .color(color.gamma_multiply(0.6))
                                .width(1.0)
                                .style(LineStyle::dashed_loose()),
                        );
                    }
                }
            });
    }

    /// Rate-of-change table, or the selection prompt when nothing was fitted.
    pub fn draw_trend_table(ui: &mut egui::Ui, trends: &TrendResult) {
        if trends.is_empty() {
            ui.label(
                RichText::new("ℹ Select at least 1 country to calculate rate of change.")
                    .size(13.0)
                    .color(Color32::from_rgb(0, 104, 201)),
            );
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    egui::Grid::new("trend_table")
                        .striped(true)
                        .min_col_width(80.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("Country").strong().size(12.0));
                            ui.label(RichText::new(RATE_HEADER).strong().size(12.0));
                            ui.end_row();

                            for trend in &trends.trends {
                                ui.label(RichText::new(&trend.country).size(12.0));
                                ui.label(RichText::new(format_rate(trend.fit.slope)).size(12.0));
                                ui.end_row();
                            }
                        });
                });
        }

        if !trends.skipped.is_empty() {
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("Not enough data: {}", trends.skipped.join(", ")))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
    }

    /// Striped preview of the cleaned dataset.
    pub fn draw_dataset_table(ui: &mut egui::Ui, rows: &[Observation]) {
        egui::ScrollArea::both()
            .id_salt("dataset_preview")
            .max_height(260.0)
            .show(ui, |ui| {
                egui::Grid::new("dataset_table")
                    .striped(true)
                    .spacing([10.0, 2.0])
                    .show(ui, |ui| {
                        for header in crate::data::REQUIRED_COLUMNS {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in rows {
                            ui.label(RichText::new(&row.area).size(11.0));
                            ui.label(RichText::new(row.year.to_string()).size(11.0));
                            ui.label(RichText::new(&row.category).size(11.0));
                            ui.label(RichText::new(&row.subcategory).size(11.0));
                            ui.label(RichText::new(&row.variable).size(11.0));
                            ui.label(RichText::new(&row.unit).size(11.0));
                            ui.label(RichText::new(row.value.to_string()).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(area: &str, year: i64, shares: &[(Fuel, f64)]) -> MixRow {
        MixRow {
            area: area.to_string(),
            year,
            values: shares
                .iter()
                .map(|(fuel, share)| (fuel.label().to_string(), *share))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn rates_use_three_decimals() {
        assert_eq!(format_rate(-20.0), "-20.000");
        assert_eq!(format_rate(-7.12345), "-7.123");
    }

    #[test]
    fn bar_heights_follow_area_order_and_zero_missing() {
        let germany = row("Germany", 2020, &[(Fuel::Gas, 20.0), (Fuel::Solar, 50.0)]);
        let spain = row("Spain", 2020, &[(Fuel::Gas, 25.0)]);
        let frame = vec![&spain, &germany];
        let areas = vec!["Germany".to_string(), "Spain".to_string(), "Malta".to_string()];

        assert_eq!(mix_bar_heights(&frame, &areas, Fuel::Gas), [20.0, 25.0, 0.0]);
        assert_eq!(mix_bar_heights(&frame, &areas, Fuel::Solar), [50.0, 0.0, 0.0]);
        assert_eq!(mix_bar_heights(&frame, &areas, Fuel::Nuclear), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn fuel_colours_follow_stack_order() {
        assert_eq!(
            ChartPlotter::fuel_color(Fuel::HardCoal),
            Color32::from_rgb(0x00, 0x68, 0xc9)
        );
        assert_eq!(
            ChartPlotter::fuel_color(Fuel::OtherRenewables),
            Color32::from_rgb(0xbf, 0xc2, 0xc7)
        );
        assert_eq!(ChartPlotter::series_color(11), ChartPlotter::series_color(0));
    }
}
