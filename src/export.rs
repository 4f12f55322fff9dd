//! Report Export Module
//! Saves the current dashboard results as PNG charts or a JSON snapshot.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::data::MixRow;
use crate::stats::{TrendResult, TrendSeries};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Pixel size of exported chart images.
pub const EXPORT_SIZE: (u32, u32) = (1400, 900);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to render chart: {0}")]
    Render(#[from] RenderError),
}

/// Everything the dashboard currently shows, as written to JSON.
#[derive(Debug, Serialize)]
pub struct ResultsSnapshot<'a> {
    pub mix_countries: &'a [String],
    pub trend_countries: &'a [String],
    pub mix: &'a [MixRow],
    pub trends: &'a TrendResult,
}

pub struct ReportExporter;

impl ReportExporter {
    pub fn write_json(snapshot: &ResultsSnapshot<'_>, path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;
        info!(
            "Results exported: {} ({} mix rows, {} trends)",
            path.display(),
            snapshot.mix.len(),
            snapshot.trends.len()
        );
        Ok(())
    }

    pub fn export_mix_png(rows: &[MixRow], year: i64, path: &Path) -> Result<(), ExportError> {
        StaticChartRenderer::render_mix_png(rows, year, path, EXPORT_SIZE)?;
        info!("Mix chart exported: {}", path.display());
        Ok(())
    }

    pub fn export_co2_png(
        series: &[TrendSeries],
        trends: &TrendResult,
        path: &Path,
    ) -> Result<(), ExportError> {
        StaticChartRenderer::render_co2_png(series, trends, path, EXPORT_SIZE)?;
        info!("CO2 chart exported: {}", path.display());
        Ok(())
    }

    /// Show an exported file in the system viewer.
    pub fn open_exported(path: &Path) {
        if let Err(e) = open::that(path) {
            warn!("Could not open {}: {}", path.display(), e);
        }
    }
}
