//! CSV Data Loader Module
//! Loads the electricity release with Polars and cleans it into the shared dataset.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Columns kept from the source file, in output order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Area",
    "Year",
    "Category",
    "Subcategory",
    "Variable",
    "Unit",
    "Value",
];

/// Area label of the EU-wide aggregate rows.
pub const AGGREGATE_AREA: &str = "EU";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing required column: {column}")]
    Schema { column: String },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// One row of the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub area: String,
    pub year: i64,
    pub category: String,
    pub subcategory: String,
    pub variable: String,
    pub unit: String,
    pub value: f64,
}

/// Country-level observations with the seven required columns.
///
/// Built once and never mutated; cloning shares the underlying column buffers.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    frame: DataFrame,
}

impl CleanedDataset {
    /// Restrict a raw frame to the required columns and drop aggregate rows.
    ///
    /// `Year` is cast to integer and `Value` to float; rows where either does
    /// not parse are dropped.
    pub fn from_frame(df: DataFrame) -> Result<Self, LoaderError> {
        for column in REQUIRED_COLUMNS {
            if df.column(column).is_err() {
                return Err(LoaderError::Schema {
                    column: column.to_string(),
                });
            }
        }

        let typed = df
            .lazy()
            .select([
                col("Area").cast(DataType::String),
                col("Year").cast(DataType::Int64),
                col("Category").cast(DataType::String),
                col("Subcategory").cast(DataType::String),
                col("Variable").cast(DataType::String),
                col("Unit").cast(DataType::String),
                col("Value").cast(DataType::Float64),
            ])
            .collect()?;

        let typed_rows = typed.height();
        let parsed = typed
            .lazy()
            .filter(col("Year").is_not_null().and(col("Value").is_not_null()))
            .collect()?;
        let unparsed = typed_rows - parsed.height();
        if unparsed > 0 {
            warn!("Dropped {} rows with unparsable Year or Value", unparsed);
        }

        let frame = parsed
            .lazy()
            .filter(col("Area").neq(lit(AGGREGATE_AREA)))
            .collect()?;

        Ok(Self { frame })
    }

    /// Get a reference to the underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct areas in order of first appearance.
    pub fn areas(&self) -> Vec<String> {
        let Ok(areas) = self.frame.column("Area").and_then(|c| c.str()) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        areas
            .into_iter()
            .flatten()
            .filter(|area| seen.insert(*area))
            .map(str::to_string)
            .collect()
    }

    /// Rows matching a Polars predicate.
    pub fn filter(&self, predicate: Expr) -> PolarsResult<DataFrame> {
        self.frame.clone().lazy().filter(predicate).collect()
    }

    /// Materialize every row.
    pub fn observations(&self) -> PolarsResult<Vec<Observation>> {
        observations_of(&self.frame)
    }

    /// First `limit` rows, for the dataset table.
    pub fn preview(&self, limit: usize) -> PolarsResult<Vec<Observation>> {
        observations_of(&self.frame.head(Some(limit)))
    }
}

/// Read rows of a frame shaped like [`CleanedDataset`].
pub(crate) fn observations_of(df: &DataFrame) -> PolarsResult<Vec<Observation>> {
    let area = df.column("Area")?.str()?;
    let year = df.column("Year")?.i64()?;
    let category = df.column("Category")?.str()?;
    let subcategory = df.column("Subcategory")?.str()?;
    let variable = df.column("Variable")?.str()?;
    let unit = df.column("Unit")?.str()?;
    let value = df.column("Value")?.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(a), Some(y), Some(v)) = (area.get(i), year.get(i), value.get(i)) else {
            continue;
        };
        rows.push(Observation {
            area: a.to_string(),
            year: y,
            category: category.get(i).unwrap_or_default().to_string(),
            subcategory: subcategory.get(i).unwrap_or_default().to_string(),
            variable: variable.get(i).unwrap_or_default().to_string(),
            unit: unit.get(i).unwrap_or_default().to_string(),
            value: v,
        });
    }
    Ok(rows)
}

/// Fixed dtypes for the numeric columns. Inference only samples the head of
/// the file, which would read `Value` as integers when the early rows are whole.
fn numeric_schema() -> Schema {
    let mut schema = Schema::default();
    schema.with_column("Year".into(), DataType::Int64);
    schema.with_column("Value".into(), DataType::Float64);
    schema
}

/// Loads the source CSV into a [`CleanedDataset`].
pub struct DataLoader;

impl DataLoader {
    pub fn load_csv(file_path: &Path) -> Result<CleanedDataset, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_dtype_overwrite(Some(Arc::new(numeric_schema())))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        let raw_rows = df.height();

        let dataset = CleanedDataset::from_frame(df)?;
        info!(
            "Loaded {} ({} rows, {} after cleaning)",
            file_path.display(),
            raw_rows,
            dataset.height()
        );
        Ok(dataset)
    }
}
