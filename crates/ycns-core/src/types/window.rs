//! Inclusive date windows.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Inclusive `[start, end]` calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    start: Date,
    end: Date,
}

#[derive(Deserialize)]
struct RawWindow {
    start: Date,
    end: Date,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = CoreError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        DateWindow::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Weeks added before `start` when fetching price history, so the
    /// first return sample can land on `start`.
    pub const FETCH_LEAD_WEEKS: i64 = 1;

    /// Creates a window, rejecting `start > end`.
    pub fn new(start: Date, end: Date) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// First date of the window.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last date of the window.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` lies inside the window.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// The window actually fetched: `[start - 1 week, end]`.
    pub fn fetch_window(&self) -> Self {
        Self {
            start: self.start.add_weeks(-Self::FETCH_LEAD_WEEKS),
            end: self.end,
        }
    }

    /// Every calendar day in the window, in increasing order.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            let next = d.succ();
            (next <= end).then_some(next)
        })
    }

    /// Number of calendar days in the window.
    pub fn len_days(&self) -> usize {
        usize::try_from(self.start.days_between(&self.end) + 1).unwrap_or(0)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_rejects_inverted_window() {
        assert!(DateWindow::new(d(2025, 1, 10), d(2025, 1, 9)).is_err());
        assert!(DateWindow::new(d(2025, 1, 10), d(2025, 1, 10)).is_ok());
    }

    #[test]
    fn test_fetch_window_extends_one_week() {
        let window = DateWindow::new(d(2025, 1, 10), d(2025, 1, 31)).unwrap();
        let fetch = window.fetch_window();
        assert_eq!(fetch.start(), d(2025, 1, 3));
        assert_eq!(fetch.end(), d(2025, 1, 31));
    }

    #[test]
    fn test_days_inclusive() {
        let window = DateWindow::new(d(2025, 1, 30), d(2025, 2, 2)).unwrap();
        let days: Vec<Date> = window.days().collect();
        assert_eq!(
            days,
            vec![d(2025, 1, 30), d(2025, 1, 31), d(2025, 2, 1), d(2025, 2, 2)]
        );
        assert_eq!(window.len_days(), 4);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DateWindow =
            serde_json::from_str(r#"{"start":"2025-01-01","end":"2025-01-31"}"#).unwrap();
        assert_eq!(ok.start(), d(2025, 1, 1));
        assert!(
            serde_json::from_str::<DateWindow>(r#"{"start":"2025-02-01","end":"2025-01-31"}"#)
                .is_err()
        );
    }
}
