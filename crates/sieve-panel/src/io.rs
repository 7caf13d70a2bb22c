//! Frame persistence.
//!
//! Frames are read and written as parquet or CSV, chosen by file extension.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::schema::{DATE, SYMBOL};
use crate::{PanelError, Result};

/// On-disk frame formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Apache Parquet
    Parquet,
    /// Comma-separated values with a header row
    Csv,
}

impl FrameFormat {
    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("parquet" | "pq") => Ok(Self::Parquet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(PanelError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read a frame from a parquet or CSV file.
pub fn read_frame(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let frame = match FrameFormat::from_path(path)? {
        FrameFormat::Parquet => ParquetReader::new(File::open(path)?).finish()?,
        FrameFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
    };
    debug!(path = %path.display(), rows = frame.height(), "read frame");
    Ok(frame)
}

/// Write a frame to a parquet or CSV file, creating parent directories.
pub fn write_frame(frame: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = FrameFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    match format {
        FrameFormat::Parquet => {
            ParquetWriter::new(file).finish(frame)?;
        }
        FrameFormat::Csv => CsvWriter::new(file).finish(frame)?,
    }
    debug!(path = %path.display(), rows = frame.height(), "wrote frame");
    Ok(())
}

/// Rename a source's date and entity columns to `date` and `symbol`.
///
/// Columns already carrying the target name are left alone.
pub fn rename_keys(mut frame: DataFrame, date_col: &str, symbol_col: &str) -> Result<DataFrame> {
    for (source, target) in [(date_col, DATE), (symbol_col, SYMBOL)] {
        if source == target {
            continue;
        }
        if frame.column(source).is_err() {
            return Err(PanelError::MissingField {
                field: source.to_string(),
            });
        }
        frame.rename(source, target.into())?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("panel.parquet", Some(FrameFormat::Parquet))]
    #[case("panel.PQ", Some(FrameFormat::Parquet))]
    #[case("out/results.csv", Some(FrameFormat::Csv))]
    #[case("panel.feather", None)]
    #[case("panel", None)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: Option<FrameFormat>) {
        assert_eq!(FrameFormat::from_path(Path::new(path)).ok(), expected);
    }

    #[test]
    fn test_rename_keys() {
        let frame = df![
            "datetime" => ["2024-01-01"],
            "instrument" => ["A"],
            "close" => [1.0]
        ]
        .unwrap();
        let renamed = rename_keys(frame, "datetime", "instrument").unwrap();
        assert!(renamed.column(DATE).is_ok());
        assert!(renamed.column(SYMBOL).is_ok());
        assert!(renamed.column("datetime").is_err());
    }

    #[test]
    fn test_rename_keys_missing_source() {
        let frame = df!["date" => ["2024-01-01"], "close" => [1.0]].unwrap();
        assert!(matches!(
            rename_keys(frame, "date", "instrument"),
            Err(PanelError::MissingField { field }) if field == "instrument"
        ));
    }
}
