//! Static Chart Renderer
//! Draws the dashboard charts to PNG files with plotters.
//!
//! - Mix chart: one stacked bar per country for a single year, fuels stacked
//!   in fixed order with the fuel palette.
//! - CO2 chart: one line with markers per country, fitted trend overlaid,
//!   year ticks every 5 years.

use crate::charts::{linear_ticks, PALETTE, YEAR_TICK_ANCHOR, YEAR_TICK_STEP};
use crate::data::{DataProcessor, Fuel, MixRow};
use crate::stats::{TrendResult, TrendSeries};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render: {0}")]
    Empty(&'static str),
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// One coloured block of a stacked bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackSegment {
    pub fuel: Fuel,
    pub area_index: usize,
    pub base: f64,
    pub top: f64,
}

/// Stack layout for one frame. Absent shares produce no segment.
pub fn stack_segments(frame: &[&MixRow], areas: &[String]) -> Vec<StackSegment> {
    let mut bases = vec![0.0; areas.len()];
    let mut segments = Vec::new();

    for fuel in Fuel::ALL {
        for (i, area) in areas.iter().enumerate() {
            let share = frame
                .iter()
                .find(|row| &row.area == area)
                .and_then(|row| row.share(fuel));
            if let Some(share) = share {
                segments.push(StackSegment {
                    fuel,
                    area_index: i,
                    base: bases[i],
                    top: bases[i] + share,
                });
                bases[i] += share;
            }
        }
    }
    segments
}

fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    RGBColor(r, g, b)
}

/// Year axis label, blank away from the 5-year ticks.
fn year_label(x: &f64) -> String {
    let offset = (x - YEAR_TICK_ANCHOR).rem_euclid(YEAR_TICK_STEP);
    if offset.min(YEAR_TICK_STEP - offset) < 1e-6 {
        format!("{:.0}", x)
    } else {
        String::new()
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the stacked mix chart of `year` to a PNG file.
    pub fn render_mix_png(
        rows: &[MixRow],
        year: i64,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let frame = DataProcessor::rows_for_year(rows, year);
        if frame.is_empty() {
            return Err(RenderError::Empty("no mix rows for the selected year"));
        }
        let areas: Vec<String> = frame.iter().map(|row| row.area.clone()).collect();
        let segments = stack_segments(&frame, &areas);
        let y_max = segments
            .iter()
            .map(|s| s.top)
            .fold(100.0_f64, f64::max)
            .ceil();

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let area_count = areas.len() as i32;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("The source of electricity generation over time ({year})"),
                (FONT, 24),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..area_count).into_segmented(), 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(areas.len())
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => areas.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("Country")
            .y_desc("Electricity Generated (%)")
            .draw()
            .map_err(draw_err)?;

        for fuel in Fuel::ALL {
            let color = palette_color(fuel.index());
            let bars = segments.iter().filter(|s| s.fuel == fuel).map(|s| {
                let i = s.area_index as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), s.base),
                        (SegmentValue::Exact(i + 1), s.top),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            });

            chart
                .draw_series(bars)
                .map_err(draw_err)?
                .label(fuel.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Render the CO2 intensity chart with fitted trends to a PNG file.
    pub fn render_co2_png(
        series: &[TrendSeries],
        trends: &TrendResult,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let years = series.iter().flat_map(|s| s.points.iter().map(|&(y, _)| y));
        let (Some(first_year), Some(last_year)) = (years.clone().min(), years.max()) else {
            return Err(RenderError::Empty("no CO2 intensity data for the selection"));
        };
        let x_range = (first_year as f64 - 1.0)..(last_year as f64 + 1.0);
        let y_max = series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, v)| v))
            .fold(0.0_f64, f64::max)
            * 1.1;
        let y_max = if y_max > 0.0 { y_max } else { 1.0 };

        // With as many labels as 5-year ticks, plotters settles on a step of 5.
        let tick_count = linear_ticks(x_range.start, x_range.end, YEAR_TICK_ANCHOR, YEAR_TICK_STEP)
            .len()
            .max(1);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("CO2 intensity vs time", (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(tick_count)
            .x_label_formatter(&year_label)
            .x_desc("Year")
            .y_desc("CO2 Intensity (gCO2e per kWh)")
            .draw()
            .map_err(draw_err)?;

        for (i, s) in series.iter().enumerate() {
            let color = palette_color(i);
            let points: Vec<(f64, f64)> = s.points.iter().map(|&(y, v)| (y as f64, v)).collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(draw_err)?
                .label(s.country.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
                .map_err(draw_err)?;

            if let (Some(fit), Some(&(x0, _)), Some(&(x1, _))) =
                (trends.get(&s.country), points.first(), points.last())
            {
                chart
                    .draw_series(LineSeries::new(
                        [(x0, fit.predict(x0)), (x1, fit.predict(x1))],
                        color.mix(0.5).stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CountryTrend, LinearFit};
    use tempfile::tempdir;

    fn row(area: &str, year: i64, shares: &[(Fuel, f64)]) -> MixRow {
        MixRow {
            area: area.to_string(),
            year,
            values: shares
                .iter()
                .map(|(fuel, share)| (fuel.label().to_string(), *share))
                .collect(),
        }
    }

    #[test]
    fn segments_stack_in_fuel_order_and_skip_missing() {
        let germany = row(
            "Germany",
            2020,
            &[(Fuel::Solar, 50.0), (Fuel::HardCoal, 30.0), (Fuel::Gas, 20.0)],
        );
        let frame = vec![&germany];
        let areas = vec!["Germany".to_string()];

        let segments = stack_segments(&frame, &areas);
        let layout: Vec<_> = segments.iter().map(|s| (s.fuel, s.base, s.top)).collect();
        assert_eq!(
            layout,
            [
                (Fuel::HardCoal, 0.0, 30.0),
                (Fuel::Gas, 30.0, 50.0),
                (Fuel::Solar, 50.0, 100.0),
            ]
        );
    }

    #[test]
    fn segments_track_each_area_separately() {
        let germany = row("Germany", 2020, &[(Fuel::Gas, 20.0)]);
        let spain = row("Spain", 2020, &[(Fuel::Gas, 25.0), (Fuel::Solar, 15.0)]);
        let frame = vec![&germany, &spain];
        let areas = vec!["Germany".to_string(), "Spain".to_string()];

        let segments = stack_segments(&frame, &areas);
        let solar: Vec<_> = segments.iter().filter(|s| s.fuel == Fuel::Solar).collect();
        assert_eq!(solar.len(), 1);
        assert_eq!(solar[0].area_index, 1);
        assert_eq!((solar[0].base, solar[0].top), (25.0, 40.0));
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn mix_chart_renders_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mix.png");
        let rows = vec![
            row(
                "Germany",
                2020,
                &[(Fuel::HardCoal, 30.0), (Fuel::Gas, 20.0), (Fuel::Solar, 50.0)],
            ),
            row("Spain", 2020, &[(Fuel::Nuclear, 22.0), (Fuel::OnshoreWind, 21.0)]),
            row("Spain", 2021, &[(Fuel::Nuclear, 20.0)]),
        ];

        StaticChartRenderer::render_mix_png(&rows, 2020, &path, (800, 600)).unwrap();
        assert_png(&path);
    }

    #[test]
    fn co2_chart_renders_png_with_fit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("co2.png");
        let series = vec![
            TrendSeries {
                country: "Germany".to_string(),
                points: vec![(2015, 400.0), (2016, 380.0), (2017, 360.0)],
            },
            TrendSeries {
                country: "Spain".to_string(),
                points: vec![(2017, 250.0)],
            },
        ];
        let trends = TrendResult {
            trends: vec![CountryTrend {
                country: "Germany".to_string(),
                fit: LinearFit {
                    slope: -20.0,
                    intercept: 40700.0,
                    points: 3,
                },
            }],
            skipped: vec!["Spain".to_string()],
        };

        StaticChartRenderer::render_co2_png(&series, &trends, &path, (800, 600)).unwrap();
        assert_png(&path);
    }

    #[test]
    fn year_labels_only_on_five_year_ticks() {
        assert_eq!(year_label(&2015.0), "2015");
        assert_eq!(year_label(&1990.0), "1990");
        assert_eq!(year_label(&2016.0), "");
        assert_eq!(year_label(&2017.5), "");
    }

    #[test]
    fn empty_frame_is_not_rendered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mix.png");
        let rows = vec![row("Germany", 2020, &[(Fuel::Gas, 20.0)])];

        let result = StaticChartRenderer::render_mix_png(&rows, 1999, &path, (800, 600));
        assert!(matches!(result, Err(RenderError::Empty(_))));
        assert!(!path.exists());
    }

    #[test]
    fn empty_series_is_not_rendered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("co2.png");
        let result = StaticChartRenderer::render_co2_png(
            &[],
            &TrendResult::default(),
            &path,
            (800, 600),
        );
        assert!(matches!(result, Err(RenderError::Empty(_))));
    }
}
