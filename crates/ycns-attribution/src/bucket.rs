//! Append-only per-bucket sample accumulation.
//!
//! [`BucketCollection`] is a dense arena: buckets live in a `Vec` in
//! first-seen order and a key index points into it, so adding a sample to
//! an existing bucket never reallocates the map.

use std::collections::HashMap;
use std::hash::Hash;

use ycns_core::{CoreError, CoreResult, Date, DateSeries, LabeledSeriesMatrix, Tenor};

/// Samples of one bucket, in strictly increasing date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl BucketSeries {
    /// An empty bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    ///
    /// # Errors
    ///
    /// `UnorderedSeries` if `date` is not after the last sample.
    pub fn push(&mut self, date: Date, value: f64) -> CoreResult<()> {
        if let Some(last) = self.dates.last() {
            if *last >= date {
                return Err(CoreError::UnorderedSeries {
                    previous: last.to_string(),
                    next: date.to_string(),
                });
            }
        }
        self.dates.push(date);
        self.values.push(value);
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether no sample was added.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Sample dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Snapshot as a [`DateSeries`].
    pub fn to_series(&self) -> CoreResult<DateSeries> {
        DateSeries::new(self.dates.clone(), self.values.clone())
    }

    fn into_series(self) -> CoreResult<DateSeries> {
        DateSeries::new(self.dates, self.values)
    }
}

/// Buckets keyed by `K`, built incrementally while walking a date range.
#[derive(Debug, Clone)]
pub struct BucketCollection<K> {
    buckets: Vec<(K, BucketSeries)>,
    index: HashMap<K, usize>,
}

impl<K> Default for BucketCollection<K> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Ord + Hash + Clone> BucketCollection<K> {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` on `date` to the bucket for `key`, creating it if needed.
    ///
    /// # Errors
    ///
    /// `UnorderedSeries` if the bucket already holds a sample on or after `date`.
    pub fn add(&mut self, date: Date, key: &K, value: f64) -> CoreResult<()> {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                let idx = self.buckets.len();
                self.buckets.push((key.clone(), BucketSeries::new()));
                self.index.insert(key.clone(), idx);
                idx
            }
        };
        self.buckets[idx].1.push(date, value)
    }

    /// The bucket for `key`.
    pub fn get(&self, key: &K) -> Option<&BucketSeries> {
        self.index.get(key).map(|idx| &self.buckets[*idx].1)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket exists.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Keys in ascending order.
    pub fn sorted_keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.buckets.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys
    }

    /// Consumes the collection into `(key, series)` pairs sorted by key.
    pub fn into_sorted_series(self) -> CoreResult<Vec<(K, DateSeries)>> {
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| a.0.cmp(&b.0));
        buckets
            .into_iter()
            .map(|(key, bucket)| Ok((key, bucket.into_series()?)))
            .collect()
    }
}

impl BucketCollection<Tenor> {
    /// Consumes the collection into a matrix labelled by tenor, in
    /// ascending tenor order.
    pub fn to_matrix(self) -> CoreResult<LabeledSeriesMatrix> {
        let (keys, series): (Vec<Tenor>, Vec<DateSeries>) =
            self.into_sorted_series()?.into_iter().unzip();
        LabeledSeriesMatrix::keyed(keys, series)
    }
}
