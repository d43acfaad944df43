//! File-based curve specifications and implied curve data.

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use ycns_core::{Date, Tenor};
use ycns_traits::curves::{
    CurveConstructionConfig, CurveDefinition, CurveNode, CurveNodeSpecification,
    CurveSpecificationSource, ImpliedCurveData, ImpliedCurveResolver,
};
use ycns_traits::error::TraitError;
use ycns_traits::ids::CurveName;
use ycns_traits::ValuationContext;

// =============================================================================
// JSON CURVE SPECIFICATIONS
// =============================================================================

/// JSON-based curve node specifications.
///
/// The file holds `[{"curve": .., "nodes": [{"key", "maturity", "name"?}]}]`
/// with nodes in sensitivity order.
pub struct JsonCurveSpecificationSource {
    file_path: PathBuf,
    specifications: DashMap<CurveName, CurveNodeSpecification>,
}

impl JsonCurveSpecificationSource {
    /// Create a new JSON curve specification source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            specifications: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload specifications from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        if !self.file_path.exists() {
            return Ok(()); // Empty source
        }

        let content = std::fs::read_to_string(&self.file_path)?;

        #[derive(Deserialize)]
        struct CurveData {
            curve: String,
            nodes: Vec<NodeData>,
        }

        #[derive(Deserialize)]
        struct NodeData {
            key: String,
            maturity: Tenor,
            #[serde(default)]
            name: Option<String>,
        }

        let curves: Vec<CurveData> =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;

        self.specifications.clear();
        for curve in curves {
            let nodes = curve
                .nodes
                .into_iter()
                .map(|n| {
                    let node = CurveNode::new(n.key, n.maturity);
                    match n.name {
                        Some(name) => node.with_display_name(name),
                        None => node,
                    }
                })
                .collect();
            let name = CurveName::new(curve.curve);
            self.specifications
                .insert(name.clone(), CurveNodeSpecification::new(name, nodes));
        }
        debug!(path = %self.file_path.display(), curves = self.specifications.len(), "curve specifications loaded");
        Ok(())
    }
}

impl CurveSpecificationSource for JsonCurveSpecificationSource {
    fn curve_specification(
        &self,
        _ctx: &ValuationContext,
        definition: &CurveDefinition,
    ) -> Result<CurveNodeSpecification, TraitError> {
        self.specifications
            .get(&definition.name)
            .map(|s| s.clone())
            .ok_or_else(|| TraitError::NotFound(format!("curve specification {}", definition.name)))
    }
}

// =============================================================================
// CSV IMPLIED CURVE DATA
// =============================================================================

/// CSV record for one implied node.
#[derive(Debug, Deserialize)]
struct ParRateRecord {
    date: Date,
    tenor: Tenor,
    par_rate: f64,
}

/// Pre-computed implied curve par rates, one curve per date.
///
/// Rows are `date,tenor,par_rate`, kept in file order within a date.
/// Asking for a date with no rows fails, which the replay treats as a
/// skipped day.
pub struct CsvImpliedCurveSource {
    file_path: PathBuf,
    curves: DashMap<Date, Vec<(Tenor, f64)>>,
}

impl CsvImpliedCurveSource {
    /// Create a new CSV implied curve source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            curves: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload par rates from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        if !self.file_path.exists() {
            return Ok(()); // Empty source
        }

        let mut reader = csv::Reader::from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        self.curves.clear();
        for result in reader.deserialize() {
            let record: ParRateRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            self.curves
                .entry(record.date)
                .or_default()
                .push((record.tenor, record.par_rate));
        }
        debug!(path = %self.file_path.display(), dates = self.curves.len(), "implied curve data loaded");
        Ok(())
    }

    /// Number of dates with data.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether no date has data.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl ImpliedCurveResolver for CsvImpliedCurveSource {
    fn implied_curve_data(
        &self,
        ctx: &ValuationContext,
        construction: &CurveConstructionConfig,
    ) -> Result<ImpliedCurveData, TraitError> {
        let date = ctx.valuation_date();
        let nodes = self.curves.get(&date).ok_or_else(|| {
            TraitError::CurveConstructionFailed(format!(
                "no {} curve data for {date}",
                construction.name
            ))
        })?;
        let (tenors, par_rates) = nodes.iter().copied().unzip();
        ImpliedCurveData::new(tenors, par_rates)
    }
}
