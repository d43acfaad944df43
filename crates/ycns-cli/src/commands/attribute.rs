//! Attribute command implementation.
//!
//! Loads the collaborators from a data directory and runs one attribution.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use ycns_attribution::prelude::*;
use ycns_config::ReturnKind;
use ycns_ext_file::{
    CsvHistoricalSource, CsvImpliedCurveSource, DataDirectory, JsonCurveSpecificationSource,
    JsonSensitivitySource, MarketConventionPairs, StaticFxMatrix,
};
use ycns_traits::{TraitError, ValuationContext};

use crate::cli::OutputFormat;
use crate::commands::load_config;
use crate::error::{CliError, CliResult};
use crate::output::{print_report, AttributionReport};

/// Arguments for the attribute command.
#[derive(Args, Debug)]
pub struct AttributeArgs {
    /// Attribution configuration (.toml or .json)
    #[arg(short, long, env = "YCNS_CONFIG")]
    pub config: PathBuf,

    /// Directory holding nodes.csv, curves.json, sensitivities.json,
    /// implied.csv and fx.json
    #[arg(short, long, default_value = ".")]
    pub data: PathBuf,
}

/// Execute the attribute command.
pub fn execute(args: AttributeArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(&args.config)?;
    let data = DataDirectory::new(&args.data);
    if !data.root().is_dir() {
        return Err(CliError::MissingDataDirectory(args.data).into());
    }

    let request = AttributionRequest::from_config(&config).map_err(CliError::from)?;
    let collaborators = load_collaborators(&data, config.return_kind)?;
    let ctx = ValuationContext::new(config.valuation_date());

    info!(
        position = %request.position.id,
        curve = %request.curve.name(),
        window = %request.window,
        valuation_date = %ctx.valuation_date(),
        "running attribution"
    );

    let attribution = AttributionOrchestrator::new(collaborators)
        .run(&ctx, &request)
        .map_err(CliError::from)?;

    print_report(&AttributionReport::new(&request, &attribution), format)?;
    Ok(())
}

fn load<T>(
    data: &DataDirectory,
    name: &str,
    loader: impl FnOnce(PathBuf) -> Result<T, TraitError>,
) -> CliResult<T> {
    let path = data.file(name);
    loader(path.clone()).map_err(|source| CliError::Data { path, source })
}

/// Builds file-backed collaborators from `data`.
pub fn load_collaborators(
    data: &DataDirectory,
    return_kind: ReturnKind,
) -> CliResult<Collaborators> {
    Ok(Collaborators {
        sensitivities: Arc::new(load(
            data,
            DataDirectory::SENSITIVITIES,
            JsonSensitivitySource::new,
        )?),
        curve_specifications: Arc::new(load(
            data,
            DataDirectory::CURVES,
            JsonCurveSpecificationSource::new,
        )?),
        market_data: Arc::new(load(data, DataDirectory::HISTORY, CsvHistoricalSource::new)?),
        fx_matrix: Arc::new(load(data, DataDirectory::FX, StaticFxMatrix::from_path)?),
        currency_pairs: Arc::new(MarketConventionPairs),
        returns: calculator_for(return_kind),
        implied_curves: Arc::new(load(
            data,
            DataDirectory::IMPLIED,
            CsvImpliedCurveSource::new,
        )?),
    })
}
