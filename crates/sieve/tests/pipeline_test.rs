//! The full pipeline over a synthetic raw file.

use chrono::{Days, NaiveDate};
use polars::prelude::*;
use sieve::output::MULTIFACTOR;
use sieve::panel::write_frame;
use sieve::select::{GbmConfig, SelectConfig};
use sieve::{PipelineConfig, SplitConfig, build, load_panel, run_multi_factor, run_single_factor, split};

const N_SYMBOLS: usize = 8;
const N_DAYS: u64 = 101;

fn raw_frame() -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
    let mut dates = Vec::new();
    let mut symbols = Vec::new();
    let (mut open, mut high, mut low, mut close) = (vec![], vec![], vec![], vec![]);
    let (mut volume, mut amount, mut label) = (vec![], vec![], vec![]);

    for d in 0..N_DAYS {
        for s in 0..N_SYMBOLS {
            let (sf, df) = (s as f64, d as f64);
            let c = 10.0 + sf * 0.5 + 2.0 * (df * 0.7 + sf).sin() + 0.05 * df;
            let o = c - 0.3 * (df * 1.3 + sf * 0.5).cos();
            let v = 1000.0 + 100.0 * sf + 200.0 * (df * 0.9 + sf * 2.0).sin();
            dates.push((start + Days::new(d)).to_string());
            symbols.push(format!("SH60{s:04}"));
            open.push(o);
            high.push(o.max(c) + 0.2 + 0.05 * sf);
            low.push(o.min(c) - 0.15);
            close.push(c);
            volume.push(v);
            amount.push(v * (o + c) / 2.0);
            label.push(0.01 * (df * 0.5 + sf).sin());
        }
    }

    df![
        "datetime" => dates,
        "instrument" => symbols,
        "open" => open,
        "high" => high,
        "low" => low,
        "close" => close,
        "volume" => volume,
        "amount" => amount,
        "label" => label,
        "extra" => vec![1.0; (N_DAYS as usize) * N_SYMBOLS]
    ]
    .unwrap()
}

fn config() -> PipelineConfig {
    PipelineConfig {
        split: SplitConfig {
            train_start: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            train_end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            test_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            test_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        },
        select: SelectConfig {
            top_k: 3,
            gbm: GbmConfig {
                n_rounds: 25,
                ..Default::default()
            },
        },
        ..Default::default()
    }
}

#[test]
fn test_pipeline_end_to_end() {
    let dir = std::env::temp_dir().join("sieve_pipeline_test");
    let raw = dir.join("raw.csv");
    write_frame(&mut raw_frame(), &raw).unwrap();

    let config = config();
    let panel = load_panel(&raw, &config.source).unwrap();
    assert!(!panel.has_field("extra"));
    assert!(panel.has_field("vwap"));
    assert_eq!(panel.n_symbols().unwrap(), N_SYMBOLS);

    let (train, test) = split(&panel, &config.split).unwrap();
    assert_eq!(train.n_dates().unwrap(), 61);
    assert_eq!(test.n_dates().unwrap(), 40);
    assert_eq!(train.height() + test.height(), panel.height());

    let train = build(&train, &config.factors).unwrap();
    let test = build(&test, &config.factors).unwrap();
    assert_eq!(train.factor_names().len(), 11);
    assert!(!test.is_empty());

    let single = run_single_factor(&test, &config.backtest, |_| {});
    assert_eq!(single.rows.len() + single.failures.len(), 11);
    assert!(single.failures.is_empty());
    assert_eq!(single.rows[0].factor, "alpha01");

    let multi = run_multi_factor(&train, &test, &config.select, &config.backtest).unwrap();
    assert_eq!(multi.selection.selected.len(), 3);
    assert_eq!(multi.importance.len(), 11);
    assert_eq!(multi.result.factor, MULTIFACTOR);
    assert_eq!(multi.composite.height(), test.height());
    assert!(multi.result.ic_mean.is_finite());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_build_subset_of_factors() {
    let frame = raw_frame();
    let dir = std::env::temp_dir().join("sieve_pipeline_subset_test");
    let raw = dir.join("raw.parquet");
    write_frame(&mut frame.clone(), &raw).unwrap();

    let panel = load_panel(&raw, &Default::default()).unwrap();
    let table = build(&panel, &["alpha07".to_string(), "alpha01".to_string()]).unwrap();
    let mut names = table.factor_names();
    names.sort();
    assert_eq!(names, vec!["alpha01", "alpha07"]);

    assert!(build(&panel, &["alpha99".to_string()]).is_err());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_inverted_split_range_is_rejected() {
    let dir = std::env::temp_dir().join("sieve_pipeline_split_test");
    let raw = dir.join("raw.csv");
    write_frame(&mut raw_frame(), &raw).unwrap();
    let panel = load_panel(&raw, &Default::default()).unwrap();

    let mut ranges = config().split;
    ranges.test_end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
    assert!(split(&panel, &ranges).is_err());
    std::fs::remove_dir_all(dir).ok();
}
