//! End-to-end attribution scenarios against in-memory collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use ycns_attribution::prelude::*;
use ycns_attribution::{AbsoluteReturnCalculator, Collaborator, ImpliedNodeHistoryBuilder};
use ycns_core::{Currency, CurrencyPair, Date, DateSeries, DateWindow, Tenor, UnorderedCurrencyPair};
use ycns_traits::curves::{
    CurveConstructionConfig, CurveDefinition, CurveNode, CurveNodeSpecification,
    CurveSpecificationSource, ImpliedCurveData, ImpliedCurveResolver,
};
use ycns_traits::market_data::{CurrencyPairSource, FxMatrixSource, HistoricalMarketData};
use ycns_traits::sensitivity::{CurrencySensitivityBundle, Position, SensitivitySource};
use ycns_traits::{CancellationToken, TraitError, ValuationContext};

// =============================================================================
// FAKES
// =============================================================================

fn d(day: u32) -> Date {
    Date::from_ymd(2025, 1, day).unwrap()
}

struct Sensitivities(Result<CurrencySensitivityBundle, TraitError>);

impl SensitivitySource for Sensitivities {
    fn block_curve_sensitivities(
        &self,
        _ctx: &ValuationContext,
        _position: &Position,
    ) -> Result<CurrencySensitivityBundle, TraitError> {
        self.0.clone()
    }
}

struct Specs(Result<CurveNodeSpecification, TraitError>);

impl CurveSpecificationSource for Specs {
    fn curve_specification(
        &self,
        _ctx: &ValuationContext,
        _definition: &CurveDefinition,
    ) -> Result<CurveNodeSpecification, TraitError> {
        self.0.clone()
    }
}

#[derive(Default)]
struct Market {
    nodes: HashMap<String, DateSeries>,
    fx: HashMap<String, DateSeries>,
    node_calls: AtomicUsize,
}

impl HistoricalMarketData for Market {
    fn curve_node_series(
        &self,
        _ctx: &ValuationContext,
        node: &CurveNode,
        window: &DateWindow,
    ) -> Result<DateSeries, TraitError> {
        self.node_calls.fetch_add(1, Ordering::SeqCst);
        self.nodes
            .get(node.key.as_str())
            .map(|s| s.between(window.start(), window.end()))
            .ok_or_else(|| TraitError::NotFound(node.key.to_string()))
    }

    fn fx_series(
        &self,
        _ctx: &ValuationContext,
        pair: &CurrencyPair,
        window: &DateWindow,
    ) -> Result<DateSeries, TraitError> {
        self.fx
            .get(&pair.code())
            .map(|s| s.between(window.start(), window.end()))
            .ok_or_else(|| TraitError::NotFound(pair.code()))
    }
}

struct FixedFx(f64);

impl FxMatrixSource for FixedFx {
    fn fx_rate(
        &self,
        _ctx: &ValuationContext,
        _from: Currency,
        _to: Currency,
    ) -> Result<f64, TraitError> {
        Ok(self.0)
    }
}

/// EUR is always the base currency.
struct Pairs {
    fail: bool,
}

impl CurrencyPairSource for Pairs {
    fn currency_pair(&self, pair: &UnorderedCurrencyPair) -> Result<CurrencyPair, TraitError> {
        if self.fail {
            return Err(TraitError::NotFound(pair.to_string()));
        }
        let (a, b) = pair.currencies();
        if b == Currency::EUR {
            Ok(CurrencyPair::new(b, a))
        } else {
            Ok(CurrencyPair::new(a, b))
        }
    }
}

/// Two-node implied curve; rates move every day. Fails on `failing`
/// dates and cancels the run after `cancel_on`.
struct Implied {
    failing: Vec<Date>,
    cancel_on: Option<Date>,
    calls: AtomicUsize,
}

impl Implied {
    fn failing(failing: Vec<Date>) -> Self {
        Self {
            failing,
            cancel_on: None,
            calls: AtomicUsize::new(0),
        }
    }
}

fn implied_rate(tenor_idx: usize, date: Date) -> f64 {
    let day = f64::from(date.day());
    0.01 * (tenor_idx as f64 + 1.0) + 0.0001 * day * day * (tenor_idx as f64 + 1.0)
}

impl ImpliedCurveResolver for Implied {
    fn implied_curve_data(
        &self,
        ctx: &ValuationContext,
        _construction: &CurveConstructionConfig,
    ) -> Result<ImpliedCurveData, TraitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let date = ctx.valuation_date();
        if self.cancel_on == Some(date) {
            ctx.cancellation().cancel();
        }
        if self.failing.contains(&date) {
            return Err(TraitError::CurveConstructionFailed(format!("no quotes on {date}")));
        }
        ImpliedCurveData::new(
            vec![Tenor::Months(3), Tenor::Years(1)],
            vec![implied_rate(0, date), implied_rate(1, date)],
        )
    }
}

#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn with_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.count())
}

// =============================================================================
// FIXTURES
// =============================================================================

struct Fixture {
    sensitivities: Result<CurrencySensitivityBundle, TraitError>,
    spec: Result<CurveNodeSpecification, TraitError>,
    market: Arc<Market>,
    fx_rate: f64,
    pairs_fail: bool,
    implied: Arc<Implied>,
}

impl Fixture {
    fn quoted() -> Self {
        let mut market = Market::default();
        market.nodes.insert(
            "USD3M".into(),
            DateSeries::new(vec![d(2), d(10), d(13)], vec![0.5, 1.00, 1.01]).unwrap(),
        );
        market.nodes.insert(
            "USD1Y".into(),
            DateSeries::new(vec![d(2), d(10), d(13)], vec![0.5, 2.00, 1.98]).unwrap(),
        );
        Self {
            sensitivities: Ok(CurrencySensitivityBundle::new().with(
                "USD-OIS",
                Currency::USD,
                vec![10.0, 20.0],
            )),
            spec: Ok(CurveNodeSpecification::new(
                "USD-OIS",
                vec![
                    CurveNode::new("USD3M", Tenor::Months(3)),
                    CurveNode::new("USD1Y", Tenor::Years(1)).with_display_name("1Y Swap"),
                ],
            )),
            market: Arc::new(market),
            fx_rate: 0.9,
            pairs_fail: false,
            implied: Arc::new(Implied::failing(vec![])),
        }
    }

    fn implied(failing: Vec<Date>) -> Self {
        let mut market = Market::default();
        let dates: Vec<Date> = (1..=31).map(d).collect();
        let rates: Vec<f64> = (1..=31).map(|day| 1.0 + f64::from(day) / 100.0).collect();
        market
            .fx
            .insert("EURUSD".into(), DateSeries::new(dates, rates).unwrap());
        Self {
            sensitivities: Ok(CurrencySensitivityBundle::new().with(
                "USD-DEPO",
                Currency::USD,
                vec![1_000.0, -500.0],
            )),
            spec: Err(TraitError::NotFound("implied curves have no quoted nodes".into())),
            market: Arc::new(market),
            fx_rate: 0.9,
            pairs_fail: false,
            implied: Arc::new(Implied::failing(failing)),
        }
    }

    fn orchestrator(&self) -> AttributionOrchestrator {
        AttributionOrchestrator::new(Collaborators {
            sensitivities: Arc::new(Sensitivities(self.sensitivities.clone())),
            curve_specifications: Arc::new(Specs(self.spec.clone())),
            market_data: self.market.clone(),
            fx_matrix: Arc::new(FixedFx(self.fx_rate)),
            currency_pairs: Arc::new(Pairs {
                fail: self.pairs_fail,
            }),
            returns: Arc::new(AbsoluteReturnCalculator),
            implied_curves: self.implied.clone(),
        })
    }
}

fn quoted_request(start: Date, end: Date, output: Option<Currency>) -> AttributionRequest {
    AttributionRequest {
        position: Position::new("FXF-1", Currency::USD, Currency::EUR),
        curve: CurveIdentity::Quoted(CurveDefinition::new("USD-OIS")),
        curve_currency: Currency::USD,
        window: DateWindow::new(start, end).unwrap(),
        output_currency: output,
        fx_mode: FxConversionMode::Snapshot,
    }
}

fn implied_request(
    start: Date,
    end: Date,
    output: Option<Currency>,
    fx_mode: FxConversionMode,
) -> AttributionRequest {
    AttributionRequest {
        position: Position::new("FXF-1", Currency::USD, Currency::EUR),
        curve: CurveIdentity::Implied {
            definition: CurveDefinition::new("USD-DEPO"),
            construction: CurveConstructionConfig::new("USD-FX-IMPLIED"),
        },
        curve_currency: Currency::USD,
        window: DateWindow::new(start, end).unwrap(),
        output_currency: output,
        fx_mode,
    }
}

fn ctx(date: Date) -> ValuationContext {
    ValuationContext::new(date)
}

// =============================================================================
// QUOTED CURVES
// =============================================================================

#[test]
fn test_scenario_a_quoted_pnl() {
    let fixture = Fixture::quoted();
    let matrix = fixture
        .orchestrator()
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap();

    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.keys(), &[Tenor::Months(3), Tenor::Years(1)]);
    assert_eq!(matrix.labels(), &["3M".to_string(), "1Y Swap".to_string()]);

    let first = &matrix.series()[0];
    let second = &matrix.series()[1];
    assert_eq!(first.dates(), &[d(13)]);
    assert_relative_eq!(first.values()[0], 0.1, epsilon = 1e-10);
    assert_relative_eq!(second.values()[0], -0.4, epsilon = 1e-10);

    let total = matrix.total_series();
    assert_relative_eq!(total.value_on(d(13)).unwrap(), -0.3, epsilon = 1e-10);
}

#[test]
fn test_pnl_currency_follows_native_currency() {
    let mut fixture = Fixture::quoted();
    fixture.sensitivities = Ok(CurrencySensitivityBundle::new().with(
        "USD-OIS",
        Currency::EUR,
        vec![10.0, 20.0],
    ));
    let quoted = fixture
        .orchestrator()
        .run(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap();
    assert_eq!(quoted.currency, Currency::EUR);
    assert_eq!(quoted.matrix.len(), 2);

    let fixture = Fixture::implied(vec![]);
    let orchestrator = fixture.orchestrator();
    let native = orchestrator
        .run(
            &ctx(d(17)),
            &implied_request(d(13), d(17), None, FxConversionMode::Snapshot),
        )
        .unwrap();
    assert_eq!(native.currency, Currency::USD);
    let converted = orchestrator
        .run(
            &ctx(d(17)),
            &implied_request(d(13), d(17), Some(Currency::EUR), FxConversionMode::Snapshot),
        )
        .unwrap();
    assert_eq!(converted.currency, Currency::EUR);
}

#[test]
fn test_scenario_b_bucket_count_mismatch() {
    let mut fixture = Fixture::quoted();
    fixture.sensitivities = Ok(CurrencySensitivityBundle::new().with(
        "USD-OIS",
        Currency::USD,
        vec![10.0, 20.0, 30.0],
    ));
    let err = fixture
        .orchestrator()
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap_err();

    match err {
        AttributionError::BucketCountMismatch {
            curve,
            expected,
            actual,
        } => {
            assert_eq!(curve, "USD-OIS");
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("expected bucket count mismatch, got {other:?}"),
    }
    assert_eq!(fixture.market.node_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_quoted_missing_sensitivity() {
    let mut fixture = Fixture::quoted();
    fixture.sensitivities =
        Ok(CurrencySensitivityBundle::new().with("EUR-OIS", Currency::EUR, vec![1.0, 2.0]));
    let err = fixture
        .orchestrator()
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap_err();
    assert!(matches!(err, AttributionError::MissingSensitivityData { ref curve } if curve == "USD-OIS"));
}

#[test]
fn test_quoted_upstream_failures_are_aggregated() {
    let mut fixture = Fixture::quoted();
    fixture.pairs_fail = true;
    fixture.spec = Err(TraitError::MissingData("USD-OIS".into()));
    let err = fixture
        .orchestrator()
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap_err();

    match err {
        AttributionError::Upstream(failure) => {
            assert_eq!(
                failure.collaborators(),
                vec![Collaborator::CurrencyPairs, Collaborator::CurveSpecification]
            );
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[test]
fn test_quoted_node_history_failure_is_fatal() {
    let mut fixture = Fixture::quoted();
    let mut market = Market::default();
    market.nodes.insert(
        "USD3M".into(),
        DateSeries::new(vec![d(10), d(13)], vec![1.00, 1.01]).unwrap(),
    );
    fixture.market = Arc::new(market);
    let err = fixture
        .orchestrator()
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap_err();
    match err {
        AttributionError::Upstream(failure) => {
            assert_eq!(failure.causes()[0].collaborator, Collaborator::HistoricalMarketData);
            assert_eq!(failure.causes()[0].context, "USD1Y");
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[test]
fn test_quoted_ambiguous_currency_warns_once() {
    let mut fixture = Fixture::quoted();
    fixture.sensitivities = Ok(CurrencySensitivityBundle::new()
        .with("USD-OIS", Currency::USD, vec![10.0, 20.0])
        .with("USD-OIS", Currency::EUR, vec![99.0, 99.0]));
    let orchestrator = fixture.orchestrator();

    let (result, warnings) = with_warnings(|| {
        orchestrator.attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
    });
    let matrix = result.unwrap();
    assert_eq!(warnings, 1);
    assert_relative_eq!(matrix.series()[0].values()[0], 0.1, epsilon = 1e-10);
}

#[test]
fn test_quoted_conversion_premultiplies_history() {
    let mut fixture = Fixture::quoted();
    let mut market = Market::default();
    market.nodes.insert(
        "USD3M".into(),
        DateSeries::new(vec![d(10), d(13)], vec![100.0, 100.0]).unwrap(),
    );
    market.nodes.insert(
        "USD1Y".into(),
        DateSeries::new(vec![d(10), d(13)], vec![100.0, 101.0]).unwrap(),
    );
    // USD per EUR; the engine inverts it to EUR per USD.
    market.fx.insert(
        "EURUSD".into(),
        DateSeries::new(vec![d(10), d(13)], vec![1.25, 1.0]).unwrap(),
    );
    fixture.market = Arc::new(market);

    let matrix = fixture
        .orchestrator()
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), Some(Currency::EUR)))
        .unwrap();

    // 3M: 100 * 1.0 - 100 * 0.8 = 20, times 10.
    assert_relative_eq!(matrix.series()[0].values()[0], 200.0, epsilon = 1e-9);
    // 1Y: 101 * 1.0 - 100 * 0.8 = 21, times 20.
    assert_relative_eq!(matrix.series()[1].values()[0], 420.0, epsilon = 1e-9);
}

#[test]
fn test_quoted_reconstruction_sum() {
    let mut fixture = Fixture::quoted();
    let dates: Vec<Date> = (2..=17).map(d).collect();
    let three_month: Vec<f64> = (2..=17).map(|x| 1.0 + f64::from(x) * 0.013).collect();
    let one_year: Vec<f64> = (2..=17).map(|x| 2.0 - f64::from(x * x) * 0.001).collect();
    let mut market = Market::default();
    market
        .nodes
        .insert("USD3M".into(), DateSeries::new(dates.clone(), three_month.clone()).unwrap());
    market
        .nodes
        .insert("USD1Y".into(), DateSeries::new(dates.clone(), one_year.clone()).unwrap());
    fixture.market = Arc::new(market);

    let matrix = fixture
        .orchestrator()
        .attribute(&ctx(d(17)), &quoted_request(d(13), d(17), None))
        .unwrap();
    assert_eq!(matrix.keys().len(), matrix.labels().len());
    assert_eq!(matrix.keys().len(), matrix.series().len());

    let total = matrix.total_series();
    assert_eq!(total.dates(), &[d(13), d(14), d(15), d(16), d(17)]);
    for (date, value) in total.iter() {
        let i = dates.iter().position(|x| *x == date).unwrap();
        let expected =
            10.0 * (three_month[i] - three_month[i - 1]) + 20.0 * (one_year[i] - one_year[i - 1]);
        assert_relative_eq!(value, expected, epsilon = 1e-10);
    }
}

// =============================================================================
// IMPLIED CURVES
// =============================================================================

#[test]
fn test_scenario_c_failed_weekdays_are_skipped() {
    // Fetch window 2025-01-06..=2025-01-15 covers ten days; the 7th and
    // 14th are Tuesdays.
    let fixture = Fixture::implied(vec![d(7), d(14)]);
    let window = DateWindow::new(d(13), d(15)).unwrap();
    let construction = CurveConstructionConfig::new("USD-FX-IMPLIED");

    let history = ImpliedNodeHistoryBuilder::new(fixture.implied.as_ref(), &construction)
        .replay(&ctx(d(15)), &window)
        .unwrap();
    assert_eq!(history.outcomes.len(), 10);
    for tenor in [Tenor::Months(3), Tenor::Years(1)] {
        assert_eq!(history.buckets.get(&tenor).unwrap().len(), 8);
    }

    let request = implied_request(d(13), d(15), None, FxConversionMode::Snapshot);
    let orchestrator = fixture.orchestrator();
    let (result, warnings) = with_warnings(|| orchestrator.attribute(&ctx(d(15)), &request));
    let matrix = result.unwrap();

    assert_eq!(warnings, 2);
    assert_eq!(matrix.keys(), &[Tenor::Months(3), Tenor::Years(1)]);
    for series in matrix.series() {
        assert_eq!(series.dates(), &[d(13), d(15)]);
    }
    let expected = 1_000.0 * (implied_rate(0, d(15)) - implied_rate(0, d(13)));
    assert_relative_eq!(matrix.series()[0].values()[1], expected, epsilon = 1e-10);
}

#[test]
fn test_weekend_failures_are_silent() {
    // 2025-01-11 and 2025-01-12 fall on a weekend.
    let fixture = Fixture::implied(vec![d(11), d(12)]);
    let request = implied_request(d(13), d(15), None, FxConversionMode::Snapshot);
    let orchestrator = fixture.orchestrator();
    let (result, warnings) = with_warnings(|| orchestrator.attribute(&ctx(d(15)), &request));
    assert!(result.is_ok());
    assert_eq!(warnings, 0);
}

#[test]
fn test_scenario_d_native_output_is_identity() {
    let fixture = Fixture::implied(vec![]);
    let orchestrator = fixture.orchestrator();
    let plain = orchestrator
        .attribute(
            &ctx(d(17)),
            &implied_request(d(13), d(17), None, FxConversionMode::HistoricalSpot),
        )
        .unwrap();
    let native = orchestrator
        .attribute(
            &ctx(d(17)),
            &implied_request(d(13), d(17), Some(Currency::USD), FxConversionMode::HistoricalSpot),
        )
        .unwrap();
    assert_eq!(plain, native);

    let quoted = Fixture::quoted();
    let orchestrator = quoted.orchestrator();
    let plain = orchestrator
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), None))
        .unwrap();
    let native = orchestrator
        .attribute(&ctx(d(13)), &quoted_request(d(13), d(13), Some(Currency::USD)))
        .unwrap();
    assert_eq!(plain, native);
}

#[test]
fn test_scenario_e_historical_spot_vs_snapshot() {
    let fixture = Fixture::implied(vec![]);
    let orchestrator = fixture.orchestrator();
    let attribute = |output, mode| {
        orchestrator
            .attribute(&ctx(d(17)), &implied_request(d(13), d(17), output, mode))
            .unwrap()
    };

    let unconverted = attribute(None, FxConversionMode::Snapshot);
    let snapshot = attribute(Some(Currency::EUR), FxConversionMode::Snapshot);
    let spot = attribute(Some(Currency::EUR), FxConversionMode::HistoricalSpot);

    for bucket in 0..unconverted.len() {
        let base = &unconverted.series()[bucket];
        let snap = &snapshot.series()[bucket];
        let hist = &spot.series()[bucket];
        assert_eq!(base.dates(), snap.dates());
        assert_eq!(base.dates(), hist.dates());

        let mut spot_ratios = Vec::new();
        for (i, (date, value)) in base.iter().enumerate() {
            assert_relative_eq!(snap.values()[i], value * 0.9, epsilon = 1e-12);

            // EURUSD is inverted to EUR per USD; dividing by it multiplies
            // by the USD per EUR quote.
            let eurusd = 1.0 + f64::from(date.day()) / 100.0;
            assert_relative_eq!(hist.values()[i], value * eurusd, epsilon = 1e-12);
            spot_ratios.push(hist.values()[i] / value);
        }
        assert!(spot_ratios.windows(2).all(|w| (w[0] - w[1]).abs() > 1e-6));
    }
}

#[test]
fn test_historical_spot_drops_weekend_pnl_without_fx() {
    let mut fixture = Fixture::implied(vec![]);
    let weekdays: Vec<Date> = (1..=31).map(d).filter(|date| date.is_weekday()).collect();
    let rates: Vec<f64> = weekdays
        .iter()
        .map(|date| 1.0 + f64::from(date.day()) / 100.0)
        .collect();
    let mut market = Market::default();
    market
        .fx
        .insert("EURUSD".into(), DateSeries::new(weekdays, rates).unwrap());
    fixture.market = Arc::new(market);
    let orchestrator = fixture.orchestrator();

    // Curves build on every day, including the 18th and 19th (a weekend).
    let unconverted = orchestrator
        .attribute(
            &ctx(d(19)),
            &implied_request(d(13), d(19), None, FxConversionMode::Snapshot),
        )
        .unwrap();
    let spot = orchestrator
        .attribute(
            &ctx(d(19)),
            &implied_request(d(13), d(19), Some(Currency::EUR), FxConversionMode::HistoricalSpot),
        )
        .unwrap();

    for (base, hist) in unconverted.series().iter().zip(spot.series()) {
        assert!(base.dates().contains(&d(18)));
        assert_eq!(hist.dates(), &[d(13), d(14), d(15), d(16), d(17)]);
        for (date, value) in hist.iter() {
            let eurusd = 1.0 + f64::from(date.day()) / 100.0;
            assert_relative_eq!(value, base.value_on(date).unwrap() * eurusd, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_implied_missing_fx_history_fails_before_replay() {
    let mut fixture = Fixture::implied(vec![]);
    fixture.market = Arc::new(Market::default());
    fixture.pairs_fail = false;
    let err = fixture
        .orchestrator()
        .attribute(
            &ctx(d(17)),
            &implied_request(d(13), d(17), Some(Currency::EUR), FxConversionMode::HistoricalSpot),
        )
        .unwrap_err();
    match err {
        AttributionError::Upstream(failure) => {
            assert_eq!(failure.collaborators(), vec![Collaborator::HistoricalMarketData]);
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
    assert_eq!(fixture.implied.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_implied_upstream_failures_are_aggregated() {
    let mut fixture = Fixture::implied(vec![]);
    fixture.pairs_fail = true;
    fixture.sensitivities = Err(TraitError::CalculationFailed("no model".into()));
    let err = fixture
        .orchestrator()
        .attribute(
            &ctx(d(17)),
            &implied_request(d(13), d(17), Some(Currency::EUR), FxConversionMode::HistoricalSpot),
        )
        .unwrap_err();
    match err {
        AttributionError::Upstream(failure) => {
            assert_eq!(
                failure.collaborators(),
                vec![
                    Collaborator::CurrencyPairs,
                    Collaborator::SensitivityCalculator,
                    Collaborator::CurrencyPairs
                ]
            );
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[test]
fn test_implied_invalid_fx_series_kept_with_other_failures() {
    let mut fixture = Fixture::implied(vec![]);
    fixture.sensitivities = Err(TraitError::CalculationFailed("no model".into()));
    let mut market = Market::default();
    market.fx.insert(
        "EURUSD".into(),
        DateSeries::new(vec![d(10), d(13)], vec![1.1, 0.0]).unwrap(),
    );
    fixture.market = Arc::new(market);
    let err = fixture
        .orchestrator()
        .attribute(
            &ctx(d(17)),
            &implied_request(d(13), d(17), Some(Currency::EUR), FxConversionMode::HistoricalSpot),
        )
        .unwrap_err();
    match err {
        AttributionError::Upstream(failure) => {
            assert_eq!(
                failure.collaborators(),
                vec![
                    Collaborator::SensitivityCalculator,
                    Collaborator::HistoricalMarketData
                ]
            );
            assert!(failure.causes()[1].error.to_string().contains("2025-01-13"));
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[test]
fn test_implied_bucket_count_mismatch() {
    let mut fixture = Fixture::implied(vec![]);
    fixture.sensitivities = Ok(CurrencySensitivityBundle::new().with(
        "USD-DEPO",
        Currency::USD,
        vec![1.0, 2.0, 3.0],
    ));
    let err = fixture
        .orchestrator()
        .attribute(
            &ctx(d(17)),
            &implied_request(d(13), d(17), None, FxConversionMode::Snapshot),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        AttributionError::BucketCountMismatch { expected: 2, actual: 3, .. }
    ));
}

#[test]
fn test_cancellation_between_dates() {
    let mut fixture = Fixture::implied(vec![]);
    fixture.implied = Arc::new(Implied {
        failing: vec![],
        cancel_on: Some(d(9)),
        calls: AtomicUsize::new(0),
    });
    let token = CancellationToken::new();
    let ctx = ValuationContext::new(d(17)).with_cancellation(token.clone());
    let err = fixture
        .orchestrator()
        .attribute(
            &ctx,
            &implied_request(d(13), d(17), None, FxConversionMode::Snapshot),
        )
        .unwrap_err();

    assert!(matches!(err, AttributionError::Cancelled { ref date } if date == "2025-01-10"));
    assert!(token.is_cancelled());
    // 2025-01-06 through 2025-01-09.
    assert_eq!(fixture.implied.calls.load(Ordering::SeqCst), 4);
}
