//! Panel round trips through disk and projections over a validated panel.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use polars::prelude::*;
use sieve_panel::{ByDate, ByEntity, CLOSE, DATE, Panel, SYMBOL, read_frame, write_frame};

fn raw_panel() -> DataFrame {
    df![
        "date" => ["2023-12-29", "2024-01-02", "2024-01-03", "2023-12-29", "2024-01-02", "2024-01-03"],
        "symbol" => ["AAA", "AAA", "AAA", "BBB", "BBB", "BBB"],
        "open" => [10.0, 10.5, 11.0, 50.0, 49.0, 48.0],
        "high" => [10.8, 11.0, 11.4, 51.0, 50.0, 49.5],
        "low" => [9.9, 10.2, 10.9, 49.0, 48.5, 47.5],
        "close" => [10.5, 10.9, 11.2, 49.5, 48.8, 49.0],
        "volume" => [1000.0, 1200.0, 900.0, 300.0, 0.0, 250.0],
        "amount" => [10500.0, 13080.0, 10080.0, 14850.0, 0.0, 12250.0],
        "label" => [0.02, 0.01, -0.01, -0.005, 0.003, 0.01]
    ]
    .unwrap()
}

fn scratch(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("sieve-panel-{}", std::process::id()))
        .join(name)
}

#[test]
fn test_parquet_round_trip_preserves_panel() {
    let path = scratch("panel.parquet");
    let mut frame = Panel::new(raw_panel()).unwrap().into_frame();
    write_frame(&mut frame, &path).unwrap();

    let restored = Panel::new(read_frame(&path).unwrap()).unwrap();
    assert_eq!(restored.height(), 6);
    assert!(restored.frame().equals_missing(&frame));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_csv_round_trip_keeps_values() {
    let path = scratch("panel.csv");
    let mut frame = Panel::new(raw_panel()).unwrap().into_frame();
    write_frame(&mut frame, &path).unwrap();

    let restored = Panel::new(read_frame(&path).unwrap()).unwrap();
    let close: Vec<f64> = restored
        .frame()
        .column(CLOSE)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(close, vec![10.5, 10.9, 11.2, 49.5, 48.8, 49.0]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_split_is_disjoint_and_complete() {
    let panel = Panel::new(raw_panel()).unwrap();
    let train = panel
        .between(
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
        .unwrap();
    let test = panel
        .between(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap();

    assert_eq!(train.height(), 2);
    assert_eq!(test.height(), 4);
    assert_eq!(train.n_dates().unwrap(), 1);
    assert_eq!(test.n_dates().unwrap(), 2);
}

#[test]
fn test_time_series_never_crosses_symbols() {
    let panel = Panel::new(raw_panel()).unwrap();
    let out = panel
        .lazy()
        .with_columns([ByEntity::diff(col(CLOSE), 1).alias("d")])
        .collect()
        .unwrap();
    let d: Vec<Option<f64>> = out
        .column("d")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect();

    assert_eq!(d[0], None);
    assert_eq!(d[3], None);
    assert_relative_eq!(d[1].unwrap(), 0.4, epsilon = 1e-9);
    assert_relative_eq!(d[4].unwrap(), -0.7, epsilon = 1e-9);
}

#[test]
fn test_cross_section_never_crosses_dates() {
    let panel = Panel::new(raw_panel()).unwrap();
    let out = panel
        .lazy()
        .with_columns([ByDate::pct_rank(col(CLOSE)).alias("rank")])
        .sort([DATE, SYMBOL], Default::default())
        .collect()
        .unwrap();
    let rank: Vec<f64> = out
        .column("rank")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();

    // AAA trades below BBB on every date.
    assert_eq!(rank, vec![0.5, 1.0, 0.5, 1.0, 0.5, 1.0]);
}
