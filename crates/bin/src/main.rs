//! Sieve CLI binary.
//!
//! Runs the factor evaluation pipeline stage by stage from the command line.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use sieve::factors::{FactorCategory, FactorInfo, FactorTable, available_factors, factors_by_category};
use sieve::output::{EvaluationSummary, ExportFormat, Exporter};
use sieve::panel::write_frame;
use sieve::{PipelineConfig, build, load_panel, run_multi_factor, run_single_factor, split};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(about = "Sieve: alpha factor evaluation over (date, symbol) panels", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of quantile buckets per date
    #[arg(long, global = true)]
    buckets: Option<usize>,

    /// Number of factors kept by selection
    #[arg(long, global = true)]
    top_k: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered factors
    Factors {
        /// Only show one category
        #[arg(long)]
        category: Option<FactorCategory>,
    },

    /// Split a raw panel into train and test panels
    Split {
        /// Raw panel file (parquet or csv)
        input: PathBuf,

        /// Train panel output
        #[arg(long, default_value = "data/train.parquet")]
        train_out: PathBuf,

        /// Test panel output
        #[arg(long, default_value = "data/test.parquet")]
        test_out: PathBuf,

        /// First training date
        #[arg(long)]
        train_start: Option<NaiveDate>,

        /// Last training date
        #[arg(long)]
        train_end: Option<NaiveDate>,

        /// First test date
        #[arg(long)]
        test_start: Option<NaiveDate>,

        /// Last test date
        #[arg(long)]
        test_end: Option<NaiveDate>,
    },

    /// Compute the factor table of a panel
    Build {
        /// Panel file
        input: PathBuf,

        /// Factor table output
        output: PathBuf,
    },

    /// Backtest every factor of a factor table
    Single {
        /// Factor table file
        input: PathBuf,

        /// Results output (csv or json)
        #[arg(long, default_value = "results/single_factor.csv")]
        output: PathBuf,

        /// Also write a Markdown summary
        #[arg(long)]
        markdown: Option<PathBuf>,
    },

    /// Select factors on the train table and backtest their composite on
    /// the test table
    Multi {
        /// Train factor table
        train: PathBuf,

        /// Test factor table
        test: PathBuf,

        /// Importance output (csv or json)
        #[arg(long, default_value = "results/importance.csv")]
        importance_out: PathBuf,

        /// Composite result output (csv or json)
        #[arg(long, default_value = "results/multi_factor.csv")]
        output: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sieve=info".parse()?)
                .add_directive("polars=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = cli
        .config
        .as_deref()
        .map(PipelineConfig::from_json_file)
        .transpose()?
        .unwrap_or_default();
    if let Some(buckets) = cli.buckets {
        config.backtest.n_buckets = buckets;
    }
    if let Some(top_k) = cli.top_k {
        config.select.top_k = top_k;
    }

    match cli.command {
        Commands::Factors { category } => list_factors(category),
        Commands::Split {
            input,
            train_out,
            test_out,
            train_start,
            train_end,
            test_start,
            test_end,
        } => {
            let ranges = &mut config.split;
            ranges.train_start = train_start.unwrap_or(ranges.train_start);
            ranges.train_end = train_end.unwrap_or(ranges.train_end);
            ranges.test_start = test_start.unwrap_or(ranges.test_start);
            ranges.test_end = test_end.unwrap_or(ranges.test_end);
            split_panel(&config, &input, &train_out, &test_out)?;
        }
        Commands::Build { input, output } => build_table(&config, &input, &output)?,
        Commands::Single {
            input,
            output,
            markdown,
        } => single_factor(&config, &input, &output, markdown.as_deref())?,
        Commands::Multi {
            train,
            test,
            importance_out,
            output,
        } => multi_factor(&config, &train, &test, &importance_out, &output)?,
    }

    Ok(())
}

fn list_factors(category: Option<FactorCategory>) {
    let factors: Vec<FactorInfo> = match category {
        Some(category) => factors_by_category(category),
        None => available_factors(),
    };

    println!("\n{:<10} {:<12} Description", "Factor", "Category");
    println!("{}", "-".repeat(80));
    for info in &factors {
        println!("{:<10} {:<12} {}", info.name, info.category, info.description);
    }
    println!("\n{} factors", factors.len());
}

fn split_panel(
    config: &PipelineConfig,
    input: &Path,
    train_out: &Path,
    test_out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let panel = load_panel(input, &config.source)?;
    let (train, test) = split(&panel, &config.split)?;

    println!(
        "Train {} to {}: {} rows",
        config.split.train_start,
        config.split.train_end,
        train.height()
    );
    println!(
        "Test  {} to {}: {} rows",
        config.split.test_start,
        config.split.test_end,
        test.height()
    );

    write_frame(&mut train.into_frame(), train_out)?;
    write_frame(&mut test.into_frame(), test_out)?;
    println!("Wrote {} and {}", train_out.display(), test_out.display());
    Ok(())
}

fn build_table(
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let panel = load_panel(input, &config.source)?;
    let table = build(&panel, &config.factors)?;
    table.write(output)?;
    println!(
        "Wrote {} rows x {} factors to {}",
        table.height(),
        table.factor_names().len(),
        output.display()
    );
    Ok(())
}

fn single_factor(
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    markdown: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = FactorTable::read(input)?;

    let pb = ProgressBar::new(table.factor_names().len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.set_message("Evaluating factors...");

    let run = run_single_factor(&table, &config.backtest, |outcome| {
        pb.set_message(outcome.factor.clone());
        pb.inc(1);
    });
    pb.finish_with_message(format!("Evaluated {} factors", run.rows.len()));

    for (factor, reason) in &run.failures {
        eprintln!("  {factor}: {reason}");
    }

    run.rows.export_to_file(output, ExportFormat::from_path(output))?;
    let summary = EvaluationSummary::new("Single-factor backtest", run.rows);
    println!("{}", summary.to_ascii_table());
    if let Some(path) = markdown {
        std::fs::write(path, summary.to_markdown())?;
    }
    println!("Wrote {}", output.display());
    Ok(())
}

fn multi_factor(
    config: &PipelineConfig,
    train: &Path,
    test: &Path,
    importance_out: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let train = FactorTable::read(train)?;
    let test = FactorTable::read(test)?;

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Fitting importance model on {} rows...",
        train.height()
    ));
    let run = run_multi_factor(&train, &test, &config.select, &config.backtest)?;
    spinner.finish_with_message(format!("Selected {}", run.selection.selected.join(", ")));

    if run.selection.rows_dropped > 0 {
        println!(
            "Dropped {} training rows with undefined values",
            run.selection.rows_dropped
        );
    }

    run.importance
        .export_to_file(importance_out, ExportFormat::from_path(importance_out))?;
    run.result
        .export_to_file(output, ExportFormat::from_path(output))?;

    let summary = EvaluationSummary::new("Multi-factor backtest", vec![run.result])
        .with_importance(run.importance);
    println!("{}", summary.to_ascii_table());
    println!("Wrote {} and {}", importance_out.display(), output.display());
    Ok(())
}
