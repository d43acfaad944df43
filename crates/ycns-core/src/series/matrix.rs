//! Tenor-keyed matrix of labelled series.

use serde::Serialize;
use std::collections::BTreeMap;

use super::DateSeries;
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Tenor};

/// Output of an attribution: one PnL series per curve node.
///
/// Holds three index-aligned arrays: the sort keys, the human-readable
/// labels (often the tenor itself, sometimes a configured node name) and
/// the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeriesMatrix {
    keys: Vec<Tenor>,
    labels: Vec<String>,
    series: Vec<DateSeries>,
}

impl LabeledSeriesMatrix {
    /// Creates a matrix from parallel arrays.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` unless all three arrays have the same length.
    pub fn new(keys: Vec<Tenor>, labels: Vec<String>, series: Vec<DateSeries>) -> CoreResult<Self> {
        if keys.len() != labels.len() {
            return Err(CoreError::length_mismatch(
                "matrix keys/labels",
                keys.len(),
                labels.len(),
            ));
        }
        if keys.len() != series.len() {
            return Err(CoreError::length_mismatch(
                "matrix keys/series",
                keys.len(),
                series.len(),
            ));
        }
        Ok(Self {
            keys,
            labels,
            series,
        })
    }

    /// Creates a matrix labelled by the keys themselves.
    pub fn keyed(keys: Vec<Tenor>, series: Vec<DateSeries>) -> CoreResult<Self> {
        let labels = keys.iter().map(ToString::to_string).collect();
        Self::new(keys, labels, series)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the matrix has no buckets.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Bucket keys.
    pub fn keys(&self) -> &[Tenor] {
        &self.keys
    }

    /// Display labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Per-bucket series.
    pub fn series(&self) -> &[DateSeries] {
        &self.series
    }

    /// Series for the bucket keyed `key`.
    pub fn series_for(&self, key: Tenor) -> Option<&DateSeries> {
        self.keys
            .iter()
            .position(|k| *k == key)
            .map(|idx| &self.series[idx])
    }

    /// Iterates `(key, label, series)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (Tenor, &str, &DateSeries)> {
        self.keys
            .iter()
            .zip(&self.labels)
            .zip(&self.series)
            .map(|((k, l), s)| (*k, l.as_str(), s))
    }

    /// Sum across buckets on every date sampled in any bucket.
    ///
    /// This is the total curve-attributed PnL the matrix decomposes.
    pub fn total_series(&self) -> DateSeries {
        let mut totals: BTreeMap<Date, f64> = BTreeMap::new();
        for series in &self.series {
            for (date, value) in series.iter() {
                *totals.entry(date).or_insert(0.0) += value;
            }
        }
        let (dates, values) = totals.into_iter().unzip();
        // BTreeMap keys are sorted and unique.
        DateSeries { dates, values }
    }

    /// Consumes the matrix, returning its three arrays.
    pub fn into_parts(self) -> (Vec<Tenor>, Vec<String>, Vec<DateSeries>) {
        (self.keys, self.labels, self.series)
    }
}
