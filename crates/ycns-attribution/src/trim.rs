//! Trimming of fetched histories to one sample before the PnL window.

use ycns_core::{Date, DateSeries};

/// Trims a series so it starts with the last sample strictly before
/// `start`.
///
/// The retained leading sample is the base for the first return, so the
/// first PnL sample lands on or after `start`. A series with no sample
/// before `start` is returned unchanged; its first return then falls
/// later and the output is simply shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesTrimmer {
    start: Date,
}

impl SeriesTrimmer {
    /// A trimmer for PnL windows starting on `start`.
    pub fn new(start: Date) -> Self {
        Self { start }
    }

    /// The window start.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Trims `series`.
    pub fn trim(&self, series: &DateSeries) -> DateSeries {
        // Walk back from the latest sample to the first one before start.
        let anchor = series
            .dates()
            .iter()
            .rposition(|date| *date < self.start);
        match anchor {
            Some(idx) => series.tail_from(idx),
            None => series.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(day: u32) -> Date {
        Date::from_ymd(2025, 1, day).unwrap()
    }

    #[test]
    fn test_keeps_one_sample_before_start() {
        let series =
            DateSeries::new(vec![d(1), d(2), d(3), d(6), d(7)], vec![1.0, 2.0, 3.0, 4.0, 5.0])
                .unwrap();
        let trimmed = SeriesTrimmer::new(d(6)).trim(&series);
        assert_eq!(trimmed.dates(), &[d(3), d(6), d(7)]);
        assert_eq!(trimmed.values(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_short_history_is_unchanged() {
        let series = DateSeries::new(vec![d(6), d(7)], vec![4.0, 5.0]).unwrap();
        let trimmed = SeriesTrimmer::new(d(6)).trim(&series);
        assert_eq!(trimmed, series);
    }

    #[test]
    fn test_history_entirely_before_start() {
        let series = DateSeries::new(vec![d(1), d(2)], vec![1.0, 2.0]).unwrap();
        let trimmed = SeriesTrimmer::new(d(10)).trim(&series);
        assert_eq!(trimmed.dates(), &[d(2)]);
    }

    #[test]
    fn test_empty_series() {
        let trimmed = SeriesTrimmer::new(d(10)).trim(&DateSeries::empty());
        assert!(trimmed.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_empties_with_prior_sample(offsets in prop::collection::btree_set(0i64..60, 1..30), start in 0i64..60) {
            let base = d(1);
            let dates: Vec<Date> = offsets.iter().map(|o| base.add_days(*o)).collect();
            let values = vec![1.0; dates.len()];
            let series = DateSeries::new(dates, values).unwrap();
            let start = base.add_days(start);
            let trimmed = SeriesTrimmer::new(start).trim(&series);

            let has_prior = series.dates().iter().any(|date| *date < start);
            if has_prior {
                prop_assert!(!trimmed.is_empty());
                prop_assert_eq!(trimmed.dates().iter().filter(|date| **date < start).count(), 1);
            } else {
                prop_assert_eq!(&trimmed, &series);
            }
            prop_assert_eq!(trimmed.last_date(), series.last_date());
        }
    }
}
