//! Statistics Calculator Module
//! Fits linear CO2-intensity trends per country.

use crate::data::CleanedDataset;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::HashSet;
use tracing::debug;

/// `Variable` value of the CO2 intensity rows.
pub const CO2_INTENSITY: &str = "CO2 intensity";

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub points: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fitted trend for one country. The slope is in gCO2e/kWh per year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTrend {
    pub country: String,
    pub fit: LinearFit,
}

/// Trends for the selected countries, in selection order.
///
/// Countries with fewer than two observations have no entry in `trends`;
/// they are listed in `skipped` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendResult {
    pub trends: Vec<CountryTrend>,
    pub skipped: Vec<String>,
}

impl TrendResult {
    pub fn get(&self, country: &str) -> Option<&LinearFit> {
        self.trends
            .iter()
            .find(|t| t.country == country)
            .map(|t| &t.fit)
    }

    pub fn slope(&self, country: &str) -> Option<f64> {
        self.get(country).map(|fit| fit.slope)
    }

    pub fn countries(&self) -> Vec<&str> {
        self.trends.iter().map(|t| t.country.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}

/// CO2 intensity observations of one country, sorted by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub country: String,
    pub points: Vec<(i64, f64)>,
}

/// Handles the per-country regression.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Ordinary least squares over paired samples.
    ///
    /// Returns `None` for fewer than two points, mismatched lengths or zero
    /// spread in `xs`.
    pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let var_x = xs.variance();
        if !var_x.is_finite() || var_x == 0.0 {
            return None;
        }

        let slope = xs.covariance(ys) / var_x;
        let intercept = ys.mean() - slope * xs.mean();
        Some(LinearFit {
            slope,
            intercept,
            points: xs.len(),
        })
    }

    /// CO2 intensity points of a single country.
    pub fn co2_points(dataset: &CleanedDataset, country: &str) -> PolarsResult<Vec<(i64, f64)>> {
        let rows = dataset.filter(
            col("Area")
                .eq(lit(country))
                .and(col("Variable").eq(lit(CO2_INTENSITY))),
        )?;

        let year = rows.column("Year")?.i64()?;
        let value = rows.column("Value")?.f64()?;
        let mut points: Vec<(i64, f64)> = year
            .into_iter()
            .zip(value)
            .filter_map(|(y, v)| Some((y?, v?)))
            .collect();
        points.sort_by_key(|&(y, _)| y);
        Ok(points)
    }

    /// Fit a trend for every selected country.
    pub fn estimate_trends(
        dataset: &CleanedDataset,
        selected: &[String],
    ) -> PolarsResult<TrendResult> {
        let countries = unique_in_order(selected);

        let fits = countries
            .par_iter()
            .map(|country| -> PolarsResult<(String, Option<LinearFit>)> {
                let points = Self::co2_points(dataset, country)?;
                let xs: Vec<f64> = points.iter().map(|&(y, _)| y as f64).collect();
                let ys: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
                Ok((country.to_string(), Self::linear_fit(&xs, &ys)))
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        let mut result = TrendResult::default();
        for (country, fit) in fits {
            match fit {
                Some(fit) => result.trends.push(CountryTrend { country, fit }),
                None => {
                    debug!("Not enough CO2 intensity data to fit {}", country);
                    result.skipped.push(country);
                }
            }
        }
        Ok(result)
    }

    /// Series for the CO2 line chart; countries without data are left out.
    pub fn co2_series(
        dataset: &CleanedDataset,
        selected: &[String],
    ) -> PolarsResult<Vec<TrendSeries>> {
        let mut series = Vec::new();
        for country in unique_in_order(selected) {
            let points = Self::co2_points(dataset, country)?;
            if !points.is_empty() {
                series.push(TrendSeries {
                    country: country.to_string(),
                    points,
                });
            }
        }
        Ok(series)
    }
}

fn unique_in_order(selected: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .map(String::as_str)
        .filter(|c| seen.insert(*c))
        .collect()
}
