//! Check command implementation.
//!
//! Validates a configuration and prints how it will be run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ycns_attribution::prelude::*;

use crate::cli::OutputFormat;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{print_key_values, print_success, KeyValue};

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Attribution configuration (.toml or .json)
    #[arg(short, long, env = "YCNS_CONFIG")]
    pub config: PathBuf,
}

/// Execute the check command.
pub fn execute(args: CheckArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(&args.config)?;
    let request = AttributionRequest::from_config(&config).map_err(CliError::from)?;

    let mut rows = vec![
        KeyValue::new("Position", &request.position.id),
        KeyValue::new(
            "Currencies",
            format!(
                "pays {} / receives {}",
                request.position.pay_currency, request.position.receive_currency
            ),
        ),
        KeyValue::new("Curve", request.curve.name()),
        KeyValue::new("Curve currency", request.curve_currency),
    ];
    match &request.curve {
        CurveIdentity::Implied { construction, .. } => {
            rows.push(KeyValue::new("Nodes", "implied"));
            rows.push(KeyValue::new("Construction", &construction.name));
        }
        CurveIdentity::Quoted(_) => rows.push(KeyValue::new("Nodes", "quoted")),
    }
    rows.push(KeyValue::new("Window", request.window));
    rows.push(KeyValue::new("Fetch window", request.window.fetch_window()));
    rows.push(KeyValue::new("Valuation date", config.valuation_date()));
    rows.push(KeyValue::new(
        "Output currency",
        request
            .output_currency
            .map_or_else(|| "native".to_string(), |c| c.to_string()),
    ));
    if request.curve.is_implied() && request.output_currency.is_some() {
        let mode = match request.fx_mode {
            FxConversionMode::HistoricalSpot => "historical spot",
            FxConversionMode::Snapshot => "snapshot",
        };
        rows.push(KeyValue::new("FX conversion", mode));
    }
    rows.push(KeyValue::new("Returns", format!("{:?}", config.return_kind).to_lowercase()));

    if format == OutputFormat::Table {
        print_success(&format!("{} is valid", args.config.display()));
    }
    print_key_values(&rows, format)?;
    Ok(())
}
