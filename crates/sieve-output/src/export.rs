//! CSV and JSON export of result tables.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::record::{ImportanceRow, ResultRow};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Format implied by a path's extension; CSV unless it ends in `.json`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::PrettyJson,
            _ => Self::Csv,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

fn records_to_string<T: Serialize>(
    records: &[T],
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            for record in records {
                wtr.serialize(record)?;
            }
            let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
            String::from_utf8(bytes).map_err(|e| {
                ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })
        }
        ExportFormat::Json => Ok(serde_json::to_string(records)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(records)?),
    }
}

impl Exporter for [ResultRow] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        records_to_string(self, format)
    }
}

impl Exporter for Vec<ResultRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        records_to_string(self, format)
    }
}

impl Exporter for ResultRow {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        records_to_string(std::slice::from_ref(self), format)
    }
}

impl Exporter for [ImportanceRow] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        records_to_string(self, format)
    }
}

impl Exporter for Vec<ImportanceRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        records_to_string(self, format)
    }
}

/// Read result rows back from a CSV results file.
pub fn read_results(path: &Path) -> Result<Vec<ResultRow>, ExportError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<Result<Vec<ResultRow>, _>>()?;
    Ok(rows)
}
