//! Human-readable summaries of an evaluation run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{ImportanceRow, ResultRow};

/// Results of a single- or multi-factor run, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Heading of the summary
    pub title: String,
    /// Per-factor statistics
    pub results: Vec<ResultRow>,
    /// Importance ranking, empty for single-factor runs
    pub importance: Vec<ImportanceRow>,
}

impl EvaluationSummary {
    /// Create a summary of result rows.
    pub fn new(title: impl Into<String>, results: Vec<ResultRow>) -> Self {
        Self {
            title: title.into(),
            results,
            importance: Vec::new(),
        }
    }

    /// Attach an importance ranking.
    pub fn with_importance(mut self, importance: Vec<ImportanceRow>) -> Self {
        self.importance = importance;
        self
    }

    /// Factor with the highest IC information ratio, ignoring undefined ratios.
    pub fn best_by_ic_ir(&self) -> Option<&ResultRow> {
        self.results
            .iter()
            .filter(|row| row.ic_ir.is_finite())
            .max_by(|a, b| a.ic_ir.total_cmp(&b.ic_ir))
    }

    /// Rows sorted by descending IC information ratio; undefined ratios last.
    pub fn ranked(&self) -> Vec<&ResultRow> {
        let mut rows: Vec<&ResultRow> = self.results.iter().collect();
        rows.sort_by(|a, b| match (a.ic_ir.is_finite(), b.ic_ir.is_finite()) {
            (true, true) => b.ic_ir.total_cmp(&a.ic_ir),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => std::cmp::Ordering::Equal,
        });
        rows
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(88));
        output.push('\n');
        output.push_str(&format!(
            "{:<14} {:>9} {:>9} {:>9} {:>10} {:>10} {:>10} {:>10}\n",
            "Factor", "IC Mean", "IC Std", "IC IR", "Ann. L", "Ann. LS", "Sharpe L", "Sharpe LS"
        ));
        output.push_str(&"-".repeat(88));
        output.push('\n');

        for row in self.ranked() {
            output.push_str(&format!(
                "{:<14} {:>9.4} {:>9.4} {:>9.3} {:>9.2}% {:>9.2}% {:>10.3} {:>10.3}\n",
                row.factor,
                row.ic_mean,
                row.ic_std,
                row.ic_ir,
                row.annualized_long_return * 100.0,
                row.annualized_long_short_return * 100.0,
                row.sharpe_long,
                row.sharpe_long_short
            ));
        }

        if !self.importance.is_empty() {
            output.push_str("\nFactor Importance:\n");
            output.push_str(&"-".repeat(88));
            output.push('\n');
            for (rank, row) in self.importance.iter().enumerate() {
                output.push_str(&format!(
                    "{:>3}. {:<14} {:>12.2}\n",
                    rank + 1,
                    row.factor,
                    row.importance
                ));
            }
        }

        output.push_str(&"=".repeat(88));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));
        output.push_str(
            "| Factor | IC Mean | IC Std | IC IR | Ann. Long | Ann. Long-Short | Sharpe L | Sharpe LS |\n",
        );
        output.push_str(
            "|--------|---------|--------|-------|-----------|-----------------|----------|-----------|\n",
        );
        for row in self.ranked() {
            output.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.3} | {:.2}% | {:.2}% | {:.3} | {:.3} |\n",
                row.factor,
                row.ic_mean,
                row.ic_std,
                row.ic_ir,
                row.annualized_long_return * 100.0,
                row.annualized_long_short_return * 100.0,
                row.sharpe_long,
                row.sharpe_long_short
            ));
        }

        if !self.importance.is_empty() {
            output.push_str("\n## Factor Importance\n\n");
            output.push_str("| Rank | Factor | Importance |\n");
            output.push_str("|------|--------|------------|\n");
            for (rank, row) in self.importance.iter().enumerate() {
                output.push_str(&format!(
                    "| {} | {} | {:.2} |\n",
                    rank + 1,
                    row.factor,
                    row.importance
                ));
            }
        }

        output
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} factors", self.title, self.results.len())?;
        if let Some(best) = self.best_by_ic_ir() {
            writeln!(
                f,
                "  Best: {} (IC {:.4}, IR {:.3})",
                best.factor, best.ic_mean, best.ic_ir
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(factor: &str, ic_ir: f64) -> ResultRow {
        ResultRow {
            factor: factor.to_string(),
            ic_mean: ic_ir / 10.0,
            ic_std: 0.1,
            ic_ir,
            annualized_long_return: 0.1,
            annualized_long_short_return: 0.05,
            sharpe_long: 1.0,
            sharpe_long_short: 0.5,
        }
    }

    fn summary() -> EvaluationSummary {
        EvaluationSummary::new(
            "Single-factor results",
            vec![row("alpha01", 0.2), row("alpha02", f64::NAN), row("alpha03", 0.5)],
        )
    }

    #[test]
    fn test_ranked_puts_undefined_last() {
        let summary = summary();
        let order: Vec<&str> = summary.ranked().iter().map(|r| r.factor.as_str()).collect();
        assert_eq!(order, vec!["alpha03", "alpha01", "alpha02"]);
        assert_eq!(summary.best_by_ic_ir().unwrap().factor, "alpha03");
    }

    #[test]
    fn test_ascii_table() {
        let ascii = summary()
            .with_importance(vec![ImportanceRow {
                factor: "alpha03".to_string(),
                importance: 42.0,
            }])
            .to_ascii_table();
        assert!(ascii.contains("Single-factor results"));
        assert!(ascii.contains("alpha01"));
        assert!(ascii.contains("NaN"));
        assert!(ascii.contains("Factor Importance"));
        assert!(ascii.contains("42.00"));
    }

    #[test]
    fn test_markdown() {
        let markdown = summary().to_markdown();
        assert!(markdown.starts_with("# Single-factor results"));
        assert!(markdown.contains("| Factor | IC Mean |"));
        assert!(markdown.contains("| alpha03 |"));
        assert!(!markdown.contains("Factor Importance"));
    }

    #[test]
    fn test_display() {
        let text = summary().to_string();
        assert!(text.contains("3 factors"));
        assert!(text.contains("Best: alpha03"));
    }
}
