//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use ycns_attribution::{Attribution, AttributionRequest};
use ycns_core::{Currency, Date, DateSeries, Tenor};

use crate::cli::OutputFormat;
use crate::error::CliResult;

/// Header of the total column.
pub const TOTAL_COLUMN: &str = "Total";

// =============================================================================
// ATTRIBUTION REPORT
// =============================================================================

/// One dated PnL value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnlPoint {
    pub date: Date,
    pub pnl: f64,
}

/// PnL series of one curve node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketReport {
    pub tenor: Tenor,
    pub label: String,
    pub pnl: Vec<PnlPoint>,
}

/// Attribution result as printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionReport {
    pub position: String,
    pub curve: String,
    pub implied: bool,
    pub currency: Currency,
    pub buckets: Vec<BucketReport>,
    pub total: Vec<PnlPoint>,
    #[serde(skip)]
    columns: Vec<DateSeries>,
}

fn points(series: &DateSeries) -> Vec<PnlPoint> {
    series
        .iter()
        .map(|(date, pnl)| PnlPoint { date, pnl })
        .collect()
}

impl AttributionReport {
    /// Builds the report of `attribution` for `request`.
    pub fn new(request: &AttributionRequest, attribution: &Attribution) -> Self {
        let matrix = &attribution.matrix;
        let total = matrix.total_series();
        let buckets = matrix
            .iter()
            .map(|(tenor, label, series)| BucketReport {
                tenor,
                label: label.to_string(),
                pnl: points(series),
            })
            .collect();
        let mut columns = matrix.series().to_vec();
        columns.push(total.clone());

        Self {
            position: request.position.id.to_string(),
            curve: request.curve.name().to_string(),
            implied: request.curve.is_implied(),
            currency: attribution.currency,
            buckets,
            total: points(&total),
            columns,
        }
    }

    /// Column headers: date, one per node label, then the total.
    pub fn header(&self) -> Vec<String> {
        std::iter::once("Date".to_string())
            .chain(self.buckets.iter().map(|b| b.label.clone()))
            .chain(std::iter::once(TOTAL_COLUMN.to_string()))
            .collect()
    }

    /// One row per date with any PnL. Nodes without a value on a date
    /// print as an empty cell.
    pub fn rows(&self, precision: Option<usize>) -> Vec<Vec<String>> {
        let dates = self.columns.last().map(DateSeries::dates).unwrap_or_default();
        dates
            .iter()
            .map(|date| {
                std::iter::once(date.to_string())
                    .chain(self.columns.iter().map(|series| {
                        series
                            .value_on(*date)
                            .map(|v| match precision {
                                Some(p) => format!("{v:.p$}"),
                                None => v.to_string(),
                            })
                            .unwrap_or_default()
                    }))
                    .collect()
            })
            .collect()
    }

    /// Whether no PnL date was produced.
    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }
}

/// Prints an attribution report in `format`.
pub fn print_report(report: &AttributionReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => print_report_table(report),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(report.header())?;
            for row in report.rows(None) {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
            Ok(())
        }
    }
}

fn print_report_table(report: &AttributionReport) -> CliResult<()> {
    print_header(&format!(
        "{} on {}{} ({})",
        report.position,
        report.curve,
        if report.implied { " [implied]" } else { "" },
        report.currency
    ));
    if report.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(report.header());
    for row in report.rows(Some(2)) {
        builder.push_record(row);
    }
    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
    Ok(())
}

// =============================================================================
// KEY-VALUE OUTPUT
// =============================================================================

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Setting")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Prints key-value pairs in `format`.
pub fn print_key_values(data: &[KeyValue], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            let table = Table::new(data)
                .with(Style::rounded())
                .with(Modify::new(Columns::first()).with(Alignment::left()))
                .to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            let object: serde_json::Map<String, serde_json::Value> = data
                .iter()
                .map(|kv| (kv.key.clone(), serde_json::Value::String(kv.value.clone())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for item in data {
                wtr.serialize(item)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}
