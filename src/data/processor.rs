//! Data Processor Module
//! Reshapes generation-mix rows from long format into one row per country and year.

use crate::data::CleanedDataset;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;
use tracing::debug;

pub const FUEL_SUBCATEGORY: &str = "Fuel";
pub const PERCENT_UNIT: &str = "%";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Generation source, in stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Fuel {
    HardCoal,
    Lignite,
    Gas,
    OtherFossil,
    Nuclear,
    Hydro,
    Bioenergy,
    Solar,
    OnshoreWind,
    OffshoreWind,
    OtherRenewables,
}

impl Fuel {
    pub const ALL: [Fuel; 11] = [
        Fuel::HardCoal,
        Fuel::Lignite,
        Fuel::Gas,
        Fuel::OtherFossil,
        Fuel::Nuclear,
        Fuel::Hydro,
        Fuel::Bioenergy,
        Fuel::Solar,
        Fuel::OnshoreWind,
        Fuel::OffshoreWind,
        Fuel::OtherRenewables,
    ];

    /// The `Variable` value used for this fuel in the source file.
    pub fn label(self) -> &'static str {
        match self {
            Fuel::HardCoal => "Hard coal",
            Fuel::Lignite => "Lignite",
            Fuel::Gas => "Gas",
            Fuel::OtherFossil => "Other fossil",
            Fuel::Nuclear => "Nuclear",
            Fuel::Hydro => "Hydro",
            Fuel::Bioenergy => "Bioenergy",
            Fuel::Solar => "Solar",
            Fuel::OnshoreWind => "Onshore wind",
            Fuel::OffshoreWind => "Offshore wind",
            Fuel::OtherRenewables => "Other renewables",
        }
    }

    /// Position in the stack, also the palette index.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Wide-format mix for one country and year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixRow {
    pub area: String,
    pub year: i64,
    /// Share of generation (%) keyed by `Variable`.
    pub values: BTreeMap<String, f64>,
}

impl MixRow {
    /// Share for a fuel; `None` when the source had no row for it.
    pub fn share(&self, fuel: Fuel) -> Option<f64> {
        self.values.get(fuel.label()).copied()
    }

    /// Sum of the charted fuel shares.
    pub fn fuel_total(&self) -> f64 {
        Fuel::ALL.iter().filter_map(|&fuel| self.share(fuel)).sum()
    }
}

/// Handles the long-to-wide reshape of the generation mix.
pub struct DataProcessor;

impl DataProcessor {
    /// Pivot percentage-of-generation fuel rows of the selected countries.
    ///
    /// Output is ordered by area then year. An empty selection yields no rows.
    pub fn reshape_mix(
        dataset: &CleanedDataset,
        selected: &[String],
    ) -> Result<Vec<MixRow>, ProcessorError> {
        if selected.is_empty() {
            return Ok(Vec::new());
        }
        let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();

        let fuel_rows = dataset.filter(
            col("Subcategory")
                .eq(lit(FUEL_SUBCATEGORY))
                .and(col("Unit").eq(lit(PERCENT_UNIT))),
        )?;

        let area = fuel_rows.column("Area")?.str()?;
        let year = fuel_rows.column("Year")?.i64()?;
        let variable = fuel_rows.column("Variable")?.str()?;
        let value = fuel_rows.column("Value")?.f64()?;

        let mut grouped: BTreeMap<(String, i64), BTreeMap<String, f64>> = BTreeMap::new();
        for i in 0..fuel_rows.height() {
            let (Some(a), Some(y), Some(var), Some(v)) =
                (area.get(i), year.get(i), variable.get(i), value.get(i))
            else {
                continue;
            };
            if !selected.contains(a) {
                continue;
            }

            let previous = grouped
                .entry((a.to_string(), y))
                .or_default()
                .insert(var.to_string(), v);
            if previous.is_some() {
                debug!("Duplicate mix entry for {} {} {}, keeping last", a, y, var);
            }
        }

        let rows: Vec<MixRow> = grouped
            .into_iter()
            .map(|((area, year), values)| MixRow { area, year, values })
            .collect();
        debug!("Reshaped mix: {} rows for {} countries", rows.len(), selected.len());
        Ok(rows)
    }

    /// Distinct years present, ascending. These are the animation frames.
    pub fn years(rows: &[MixRow]) -> Vec<i64> {
        rows.iter()
            .map(|row| row.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows belonging to one animation frame.
    pub fn rows_for_year(rows: &[MixRow], year: i64) -> Vec<&MixRow> {
        rows.iter().filter(|row| row.year == year).collect()
    }
}
