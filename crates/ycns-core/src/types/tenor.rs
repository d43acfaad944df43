//! Tenor representation (e.g., 3M, 1Y, 10Y).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Time-to-maturity label of a curve node.
///
/// Tenors are the risk bucket keys of an attribution. They are ordered by
/// approximate length in days, so `18M` sorts after `1Y` and before `2Y`.
/// Tenors of identical approximate length (`12M` and `1Y`, `7D` and `1W`)
/// are ordered by unit, days first.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tenor {
    /// Days
    Days(u32),
    /// Weeks
    Weeks(u32),
    /// Months
    Months(u32),
    /// Years
    Years(u32),
}

impl Tenor {
    /// Parse tenor from string (e.g., "3M", "1Y", "10Y").
    pub fn parse(s: &str) -> CoreResult<Self> {
        let upper = s.trim().to_uppercase();
        if upper.len() < 2 {
            return Err(CoreError::invalid_tenor(s, "expected <number><unit>"));
        }

        let (num_str, unit) = upper.split_at(upper.len() - 1);
        let num: u32 = num_str
            .parse()
            .map_err(|_| CoreError::invalid_tenor(s, format!("invalid number '{num_str}'")))?;

        match unit {
            "D" => Ok(Tenor::Days(num)),
            "W" => Ok(Tenor::Weeks(num)),
            "M" => Ok(Tenor::Months(num)),
            "Y" => Ok(Tenor::Years(num)),
            _ => Err(CoreError::invalid_tenor(s, format!("invalid unit '{unit}'"))),
        }
    }

    /// Convert tenor to approximate days.
    pub fn to_days(&self) -> u64 {
        match self {
            Tenor::Days(d) => u64::from(*d),
            Tenor::Weeks(w) => u64::from(*w) * 7,
            Tenor::Months(m) => u64::from(*m) * 30,
            Tenor::Years(y) => u64::from(*y) * 365,
        }
    }

    fn unit_rank(&self) -> u8 {
        match self {
            Tenor::Days(_) => 0,
            Tenor::Weeks(_) => 1,
            Tenor::Months(_) => 2,
            Tenor::Years(_) => 3,
        }
    }
}

impl Ord for Tenor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_days()
            .cmp(&other.to_days())
            .then_with(|| self.unit_rank().cmp(&other.unit_rank()))
    }
}

impl PartialOrd for Tenor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenor::Days(d) => write!(f, "{}D", d),
            Tenor::Weeks(w) => write!(f, "{}W", w),
            Tenor::Months(m) => write!(f, "{}M", m),
            Tenor::Years(y) => write!(f, "{}Y", y),
        }
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tenor::parse(s)
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tenor::parse(&value)
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}
