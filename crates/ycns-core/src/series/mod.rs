//! Date-indexed series.
//!
//! - [`DateSeries`]: one historical series, strictly increasing dates
//! - [`LabeledSeriesMatrix`]: tenor-keyed, labelled collection of series

mod matrix;

pub use matrix::LabeledSeriesMatrix;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// A historical series of `(date, value)` samples.
///
/// Dates are unique and strictly increasing. There is no implicit
/// gap-filling: a date that was never sampled is simply absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct DateSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl TryFrom<RawSeries> for DateSeries {
    type Error = CoreError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        DateSeries::new(raw.dates, raw.values)
    }
}

impl DateSeries {
    /// Builds a series from parallel date and value arrays.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if the arrays differ in length, `UnorderedSeries`
    /// if the dates are not strictly increasing.
    pub fn new(dates: Vec<Date>, values: Vec<f64>) -> CoreResult<Self> {
        if dates.len() != values.len() {
            return Err(CoreError::length_mismatch(
                "series dates/values",
                dates.len(),
                values.len(),
            ));
        }
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::UnorderedSeries {
                previous: pair[0].to_string(),
                next: pair[1].to_string(),
            });
        }
        Ok(Self { dates, values })
    }

    /// Builds a series from `(date, value)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Date, f64)>) -> CoreResult<Self> {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// An empty series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Sample dates, oldest first.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Sample values, index-aligned with [`dates`](Self::dates).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates `(date, value)` pairs, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Date, f64)> + ExactSizeIterator + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Date of the oldest sample.
    pub fn first_date(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Date of the most recent sample.
    pub fn last_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Value sampled on `date`, if any.
    pub fn value_on(&self, date: Date) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Keeps the samples from index `from` onward.
    pub fn tail_from(&self, from: usize) -> Self {
        let from = from.min(self.len());
        Self {
            dates: self.dates[from..].to_vec(),
            values: self.values[from..].to_vec(),
        }
    }

    /// Restricts the series to dates inside `[start, end]`.
    pub fn between(&self, start: Date, end: Date) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end);
        Self {
            dates: self.dates[lo..hi.max(lo)].to_vec(),
            values: self.values[lo..hi.max(lo)].to_vec(),
        }
    }

    /// Applies `f` to every value, keeping the dates.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            dates: self.dates.clone(),
            values: self.values.iter().map(|v| f(*v)).collect(),
        }
    }

    /// Multiplies every value by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        self.map_values(|v| v * factor)
    }

    /// Replaces every value by its reciprocal.
    ///
    /// # Errors
    ///
    /// `MathError` if any value is zero.
    pub fn reciprocal(&self) -> CoreResult<Self> {
        if let Some((date, _)) = self.iter().find(|(_, v)| *v == 0.0) {
            return Err(CoreError::math_error(format!(
                "cannot invert zero sample on {date}"
            )));
        }
        Ok(self.map_values(|v| 1.0 / v))
    }

    /// Pointwise product against `other`, keeping the dates of `self`.
    ///
    /// Every date of `self` must be sampled in `other`; `other` may hold
    /// additional dates, which are ignored.
    ///
    /// # Errors
    ///
    /// `SeriesMisaligned` naming the first date of `self` missing from `other`.
    pub fn multiply_aligned(&self, other: &DateSeries, context: &str) -> CoreResult<Self> {
        let mut values = Vec::with_capacity(self.len());
        for (date, value) in self.iter() {
            let factor = other
                .value_on(date)
                .ok_or_else(|| CoreError::SeriesMisaligned {
                    date: date.to_string(),
                    context: context.to_string(),
                })?;
            values.push(value * factor);
        }
        Ok(Self {
            dates: self.dates.clone(),
            values,
        })
    }

    /// Pointwise product on the dates sampled in both series.
    ///
    /// Dates of `self` missing from `other` are dropped.
    pub fn multiply_common(&self, other: &DateSeries) -> Self {
        let (dates, values) = self
            .iter()
            .filter_map(|(date, value)| other.value_on(date).map(|factor| (date, value * factor)))
            .unzip();
        Self { dates, values }
    }
}
