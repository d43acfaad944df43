//! Curve specification and implied-curve construction traits.
//!
//! - [`CurveSpecificationSource`]: the ordered nodes of a quoted curve
//! - [`ImpliedCurveResolver`]: runs curve construction for one valuation
//!   date and reports the par rate of every implied node

use serde::{Deserialize, Serialize};

use crate::context::ValuationContext;
use crate::error::TraitError;
use crate::ids::{CurveName, NodeKey};
use ycns_core::Tenor;

// =============================================================================
// CURVE DEFINITION
// =============================================================================

/// Definition of a curve as referenced by an attribution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveDefinition {
    /// Curve name; sensitivities are keyed by it.
    pub name: CurveName,
}

impl CurveDefinition {
    /// Create a definition for the named curve.
    pub fn new(name: impl Into<CurveName>) -> Self {
        Self { name: name.into() }
    }
}

/// Handle on the curve construction configuration an implied curve is
/// bootstrapped from. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveConstructionConfig {
    /// Configuration name.
    pub name: String,
}

impl CurveConstructionConfig {
    /// Create a construction configuration handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// =============================================================================
// CURVE NODE SPECIFICATION
// =============================================================================

/// One quoted node of a curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveNode {
    /// Market data identifier of the node's quote.
    pub key: NodeKey,
    /// Resolved maturity of the node.
    pub maturity: Tenor,
    /// Configured display name, if any.
    pub display_name: Option<String>,
}

impl CurveNode {
    /// Create a node without a display name.
    pub fn new(key: impl Into<NodeKey>, maturity: Tenor) -> Self {
        Self {
            key: key.into(),
            maturity,
            display_name: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The display name, falling back to the maturity.
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.maturity.to_string())
    }
}

/// Ordered node list of a quoted curve.
///
/// The order is the node order of the curve's sensitivity vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveNodeSpecification {
    /// Curve the nodes belong to.
    pub curve: CurveName,
    /// Nodes in sensitivity order.
    pub nodes: Vec<CurveNode>,
}

impl CurveNodeSpecification {
    /// Create a specification.
    pub fn new(curve: impl Into<CurveName>, nodes: Vec<CurveNode>) -> Self {
        Self {
            curve: curve.into(),
            nodes,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the curve has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Trait for curve specification providers.
pub trait CurveSpecificationSource: Send + Sync {
    /// Get the node specification of a curve as of the context's valuation date.
    fn curve_specification(
        &self,
        ctx: &ValuationContext,
        definition: &CurveDefinition,
    ) -> Result<CurveNodeSpecification, TraitError>;
}

// =============================================================================
// IMPLIED CURVE CONSTRUCTION
// =============================================================================

/// Par rates of an implied curve's nodes for one valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpliedCurveData {
    tenors: Vec<Tenor>,
    par_rates: Vec<f64>,
}

impl ImpliedCurveData {
    /// Create from parallel tenor and par-rate arrays, in construction order.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the arrays differ in length.
    pub fn new(tenors: Vec<Tenor>, par_rates: Vec<f64>) -> Result<Self, TraitError> {
        if tenors.len() != par_rates.len() {
            return Err(TraitError::InvalidInput(format!(
                "{} tenors but {} par rates",
                tenors.len(),
                par_rates.len()
            )));
        }
        Ok(Self { tenors, par_rates })
    }

    /// Node tenors in construction order.
    pub fn tenors(&self) -> &[Tenor] {
        &self.tenors
    }

    /// Par rates, index-aligned with [`tenors`](Self::tenors).
    pub fn par_rates(&self) -> &[f64] {
        &self.par_rates
    }

    /// Iterates `(tenor, par rate)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Tenor, f64)> + '_ {
        self.tenors
            .iter()
            .copied()
            .zip(self.par_rates.iter().copied())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.tenors.len()
    }

    /// Whether the curve has no nodes.
    pub fn is_empty(&self) -> bool {
        self.tenors.is_empty()
    }
}

/// Trait for the curve construction routine behind implied curves.
///
/// Called once per calendar day of a replay, with the context's
/// valuation date moved to that day. Implementations may depend on
/// market state scoped to that date, so calls are never parallelised.
pub trait ImpliedCurveResolver: Send + Sync {
    /// Build the implied curve for the context's valuation date.
    fn implied_curve_data(
        &self,
        ctx: &ValuationContext,
        construction: &CurveConstructionConfig,
    ) -> Result<ImpliedCurveData, TraitError>;
}
