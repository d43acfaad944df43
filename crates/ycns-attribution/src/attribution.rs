//! Attribution of a position's curve PnL to the curve's nodes.
//!
//! [`AttributionOrchestrator::attribute`] dispatches once on the curve
//! identity:
//!
//! - **Quoted** curves have a history per node. Each node's series is
//!   fetched, trimmed, turned into returns (pre-multiplied by the FX
//!   history when converting) and weighted by the node's sensitivity.
//! - **Implied** curves are rebuilt day by day to recover par-rate
//!   histories per tenor, which are then trimmed, turned into returns,
//!   weighted and converted with the requested FX policy.
//!
//! Both produce a [`LabeledSeriesMatrix`] whose columns sum to the
//! curve-driven PnL of the position.

use std::sync::Arc;

use tracing::{debug, info};

use ycns_config::AttributionConfig;
use ycns_core::{Currency, DateSeries, DateWindow, LabeledSeriesMatrix, Tenor};
use ycns_traits::curves::{
    CurveConstructionConfig, CurveDefinition, CurveSpecificationSource, ImpliedCurveResolver,
};
use ycns_traits::market_data::{
    CurrencyPairSource, FxMatrixSource, HistoricalMarketData, ReturnSeriesCalculator,
};
use ycns_traits::sensitivity::{CurrencySensitivityBundle, Position, SensitivitySource};
use ycns_traits::{CurveName, TraitError, ValuationContext};

use crate::error::{AttributionError, AttributionResult, Collaborator, UpstreamFailure};
use crate::fx::{conversion_required, FxConversionMode, FxResolver, PnlConversion};
use crate::implied::ImpliedNodeHistoryBuilder;
use crate::matcher::SensitivityBucketMatcher;
use crate::returns::ReturnConverter;
use crate::trim::SeriesTrimmer;

// =============================================================================
// REQUEST
// =============================================================================

/// How the attributed curve's node history is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurveIdentity {
    /// Nodes are quoted instruments with their own history.
    Quoted(CurveDefinition),
    /// Nodes are outputs of curve construction.
    Implied {
        /// The curve.
        definition: CurveDefinition,
        /// Construction configuration replayed per day.
        construction: CurveConstructionConfig,
    },
}

impl CurveIdentity {
    /// The curve definition.
    pub fn definition(&self) -> &CurveDefinition {
        match self {
            CurveIdentity::Quoted(definition) | CurveIdentity::Implied { definition, .. } => {
                definition
            }
        }
    }

    /// The curve name.
    pub fn name(&self) -> &CurveName {
        &self.definition().name
    }

    /// Whether the curve is implied.
    pub fn is_implied(&self) -> bool {
        matches!(self, CurveIdentity::Implied { .. })
    }
}

/// Per-node PnL together with the currency it is expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    /// One PnL series per node.
    pub matrix: LabeledSeriesMatrix,
    /// Output currency if one was requested, else the native currency:
    /// the matched sensitivity currency for quoted curves, the curve
    /// currency for implied ones.
    pub currency: Currency,
}

/// One attribution request.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionRequest {
    /// Position being attributed.
    pub position: Position,
    /// Curve being attributed.
    pub curve: CurveIdentity,
    /// Currency of the curve; PnL is native in it on the implied path.
    pub curve_currency: Currency,
    /// PnL window.
    pub window: DateWindow,
    /// Requested output currency; `None` means no conversion.
    pub output_currency: Option<Currency>,
    /// Conversion policy for the implied path.
    pub fx_mode: FxConversionMode,
}

impl AttributionRequest {
    /// Builds a request from a loaded configuration.
    ///
    /// An implied curve without a construction configuration is replayed
    /// with a configuration named after the curve.
    pub fn from_config(config: &AttributionConfig) -> AttributionResult<Self> {
        let definition = CurveDefinition::new(config.curve.name.clone());
        let curve = if config.is_implied_curve() {
            let construction = config
                .curve
                .construction_config
                .clone()
                .unwrap_or_else(|| config.curve.name.clone());
            CurveIdentity::Implied {
                definition,
                construction: CurveConstructionConfig::new(construction),
            }
        } else {
            CurveIdentity::Quoted(definition)
        };

        Ok(Self {
            position: Position::new(
                config.position.id.clone(),
                config.position.pay_currency,
                config.position.receive_currency,
            ),
            curve,
            curve_currency: config.curve.currency,
            window: DateWindow::new(config.window.start, config.window.end)?,
            output_currency: config.output_currency,
            fx_mode: FxConversionMode::from_flag(config.use_historical_spot),
        })
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// The external services an attribution run calls.
#[derive(Clone)]
pub struct Collaborators {
    /// Block curve sensitivity pricing.
    pub sensitivities: Arc<dyn SensitivitySource>,
    /// Curve node specifications.
    pub curve_specifications: Arc<dyn CurveSpecificationSource>,
    /// Historical node and FX series.
    pub market_data: Arc<dyn HistoricalMarketData>,
    /// Snapshot FX rates.
    pub fx_matrix: Arc<dyn FxMatrixSource>,
    /// Currency pair conventions.
    pub currency_pairs: Arc<dyn CurrencyPairSource>,
    /// Return-series routine.
    pub returns: Arc<dyn ReturnSeriesCalculator>,
    /// Implied curve construction.
    pub implied_curves: Arc<dyn ImpliedCurveResolver>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Runs attributions against a fixed set of collaborators.
#[derive(Debug, Clone)]
pub struct AttributionOrchestrator {
    collaborators: Collaborators,
    matcher: SensitivityBucketMatcher,
}

impl AttributionOrchestrator {
    /// Creates an orchestrator.
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            matcher: SensitivityBucketMatcher::new(),
        }
    }

    /// The collaborators in use.
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Attributes the position's curve PnL over the request window.
    ///
    /// # Errors
    ///
    /// Any failure aborts the run; no partial matrix is returned.
    pub fn attribute(
        &self,
        ctx: &ValuationContext,
        request: &AttributionRequest,
    ) -> AttributionResult<LabeledSeriesMatrix> {
        Ok(self.run(ctx, request)?.matrix)
    }

    /// Like [`attribute`](Self::attribute), also reporting the PnL currency.
    pub fn run(
        &self,
        ctx: &ValuationContext,
        request: &AttributionRequest,
    ) -> AttributionResult<Attribution> {
        let attribution = match &request.curve {
            CurveIdentity::Quoted(definition) => self.attribute_quoted(ctx, request, definition)?,
            CurveIdentity::Implied {
                definition,
                construction,
            } => self.attribute_implied(ctx, request, definition, construction)?,
        };

        info!(
            curve = %request.curve.name(),
            position = %request.position.id,
            implied = request.curve.is_implied(),
            buckets = attribution.matrix.len(),
            currency = %attribution.currency,
            window = %request.window,
            "attribution complete"
        );
        Ok(attribution)
    }

    fn attribute_quoted(
        &self,
        ctx: &ValuationContext,
        request: &AttributionRequest,
        definition: &CurveDefinition,
    ) -> AttributionResult<Attribution> {
        let pair = request.position.currency_pair();
        let pair_result = self.collaborators.currency_pairs.currency_pair(&pair);
        let bundle_result = self
            .collaborators
            .sensitivities
            .block_curve_sensitivities(ctx, &request.position);
        let spec_result = self
            .collaborators
            .curve_specifications
            .curve_specification(ctx, definition);

        let (bundle, spec) = match (pair_result, bundle_result, spec_result) {
            (Ok(_), Ok(bundle), Ok(spec)) => (bundle, spec),
            (p, b, s) => {
                return Err(UpstreamFailure::default()
                    .with_err(Collaborator::CurrencyPairs, pair.to_string(), p.err())
                    .with_err(
                        Collaborator::SensitivityCalculator,
                        request.position.id.to_string(),
                        b.err(),
                    )
                    .with_err(Collaborator::CurveSpecification, definition.name.to_string(), s.err())
                    .into())
            }
        };

        let matched = self.matcher.match_curve(&bundle, &definition.name)?;
        check_bucket_count(&definition.name, spec.len(), matched.sensitivity.len())?;

        let fetch_window = request.window.fetch_window();
        let fx = self.fx_resolver();
        let conversion = match conversion_required(matched.currency, request.output_currency) {
            Some(output) => Some(fx.conversion_series(ctx, matched.currency, output, &fetch_window)?),
            None => None,
        };

        let trimmer = SeriesTrimmer::new(request.window.start());
        let converter = ReturnConverter::new(self.collaborators.returns.as_ref());

        let mut keys = Vec::with_capacity(spec.len());
        let mut labels = Vec::with_capacity(spec.len());
        let mut series = Vec::with_capacity(spec.len());
        for (node, sensitivity) in spec.nodes.iter().zip(matched.sensitivity.as_slice()) {
            let history = self
                .collaborators
                .market_data
                .curve_node_series(ctx, node, &fetch_window)
                .map_err(|e| {
                    AttributionError::upstream(
                        Collaborator::HistoricalMarketData,
                        node.key.to_string(),
                        e,
                    )
                })?;
            let returns = converter.convert(ctx, &trimmer.trim(&history), conversion.as_ref())?;
            debug!(
                curve = %definition.name,
                node = %node.key,
                sensitivity = *sensitivity,
                samples = returns.len(),
                "node attributed"
            );
            keys.push(node.maturity);
            labels.push(node.label());
            series.push(returns.scale(*sensitivity));
        }

        Ok(Attribution {
            matrix: LabeledSeriesMatrix::new(keys, labels, series)?,
            currency: request.output_currency.unwrap_or(matched.currency),
        })
    }

    fn attribute_implied(
        &self,
        ctx: &ValuationContext,
        request: &AttributionRequest,
        definition: &CurveDefinition,
        construction: &CurveConstructionConfig,
    ) -> AttributionResult<Attribution> {
        let native = request.curve_currency;
        let (bundle, conversion) = self.implied_prerequisites(ctx, request, native)?;

        let history = ImpliedNodeHistoryBuilder::new(
            self.collaborators.implied_curves.as_ref(),
            construction,
        )
        .replay(ctx, &request.window)?;
        debug!(
            curve = %definition.name,
            built = history.built_days(),
            skipped = history.skips().count(),
            "implied history replayed"
        );

        let matched = self.matcher.match_curve(&bundle, &definition.name)?;
        let buckets = history.buckets.into_sorted_series()?;
        check_bucket_count(&definition.name, buckets.len(), matched.sensitivity.len())?;

        let trimmer = SeriesTrimmer::new(request.window.start());
        let converter = ReturnConverter::new(self.collaborators.returns.as_ref());

        let mut keys: Vec<Tenor> = Vec::with_capacity(buckets.len());
        let mut series: Vec<DateSeries> = Vec::with_capacity(buckets.len());
        for ((tenor, par_rates), sensitivity) in
            buckets.into_iter().zip(matched.sensitivity.as_slice())
        {
            let returns = converter.convert(ctx, &trimmer.trim(&par_rates), None)?;
            let pnl = conversion.apply(returns.scale(*sensitivity))?;
            debug!(
                curve = %definition.name,
                tenor = %tenor,
                sensitivity = *sensitivity,
                samples = pnl.len(),
                "tenor attributed"
            );
            keys.push(tenor);
            series.push(pnl);
        }

        Ok(Attribution {
            matrix: LabeledSeriesMatrix::keyed(keys, series)?,
            currency: request.output_currency.unwrap_or(native),
        })
    }

    /// Currency pair, sensitivities and FX inputs, resolved before the
    /// replay so a missing input fails fast.
    fn implied_prerequisites(
        &self,
        ctx: &ValuationContext,
        request: &AttributionRequest,
        native: Currency,
    ) -> AttributionResult<(CurrencySensitivityBundle, PnlConversion)> {
        let pair = request.position.currency_pair();
        let pair_result = self.collaborators.currency_pairs.currency_pair(&pair);
        let bundle_result = self
            .collaborators
            .sensitivities
            .block_curve_sensitivities(ctx, &request.position);
        let conversion_result = self.fx_resolver().pnl_conversion(
            ctx,
            native,
            request.output_currency,
            request.fx_mode,
            &request.window.fetch_window(),
        );

        match (pair_result, bundle_result, conversion_result) {
            (Ok(_), Ok(bundle), Ok(conversion)) => Ok((bundle, conversion)),
            (p, b, c) => {
                let failure = UpstreamFailure::default()
                    .with_err(Collaborator::CurrencyPairs, pair.to_string(), p.err())
                    .with_err(
                        Collaborator::SensitivityCalculator,
                        request.position.id.to_string(),
                        b.err(),
                    );
                match c {
                    Err(AttributionError::Upstream(fx_failure)) => {
                        Err(failure.merge(fx_failure).into())
                    }
                    Err(other) if failure.is_empty() => Err(other),
                    Err(other) => Err(failure
                        .with_err(
                            Collaborator::HistoricalMarketData,
                            "conversion series",
                            Some(TraitError::InvalidInput(other.to_string())),
                        )
                        .into()),
                    Ok(_) => Err(failure.into()),
                }
            }
        }
    }

    fn fx_resolver(&self) -> FxResolver<'_> {
        FxResolver::new(
            self.collaborators.currency_pairs.as_ref(),
            self.collaborators.market_data.as_ref(),
            self.collaborators.fx_matrix.as_ref(),
        )
    }
}

fn check_bucket_count(curve: &CurveName, buckets: usize, sensitivities: usize) -> AttributionResult<()> {
    if buckets == sensitivities {
        Ok(())
    } else {
        Err(AttributionError::BucketCountMismatch {
            curve: curve.to_string(),
            expected: buckets,
            actual: sensitivities,
        })
    }
}
