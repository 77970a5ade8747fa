//! Monthly calendar used to align forcing data with a simulation window.
//!
//! The simulation advances one calendar month per step, so every date in the
//! input tables is reduced to a year-month pair. Days are ignored.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month (`year`, `month` with `month` in 1..=12).
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MonthParts")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Deserialize)]
struct MonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<MonthParts> for YearMonth {
    type Error = String;

    fn try_from(parts: MonthParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.month)
            .ok_or_else(|| format!("month {} is outside 1..=12", parts.month))
    }
}

impl YearMonth {
    /// Create a year-month, returning `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse `YYYY-MM` or `YYYY-MM-DD`. The day, when present, must be a valid
    /// date but is otherwise discarded.
    ///
    /// ```
    /// use tpg_model::YearMonth;
    ///
    /// assert_eq!(YearMonth::parse("2000-04"), YearMonth::new(2000, 4));
    /// assert_eq!(YearMonth::parse("2010-11-30"), YearMonth::new(2010, 11));
    /// assert_eq!(YearMonth::parse("2010-13"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
            .ok()?;
        Self::new(date.year(), date.month())
    }

    /// Months elapsed since year 0, January.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Inverse of [`YearMonth::ordinal`].
    pub fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal.div_euclid(12);
        let month = ordinal.rem_euclid(12) + 1;
        Self {
            year: year as i32,
            month: month as u32,
        }
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        Self::from_ordinal(self.ordinal() + 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive range of calendar months, `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct MonthRange {
    from: YearMonth,
    to: YearMonth,
}

/// Unchecked bounds; deserialization goes through [`MonthRange::new`].
#[derive(Deserialize)]
struct RangeBounds {
    from: YearMonth,
    to: YearMonth,
}

impl TryFrom<RangeBounds> for MonthRange {
    type Error = String;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        let RangeBounds { from, to } = bounds;
        Self::new(from, to)
            .ok_or_else(|| format!("month range {from}..{to} ends before it starts"))
    }
}

impl MonthRange {
    /// Returns `None` when `from` is after `to`.
    pub fn new(from: YearMonth, to: YearMonth) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    pub fn from(&self) -> YearMonth {
        self.from
    }

    pub fn to(&self) -> YearMonth {
        self.to
    }

    /// Number of months in the range, both ends included.
    pub fn len(&self) -> usize {
        (self.to.ordinal() - self.from.ordinal() + 1) as usize
    }

    /// Always false; a range holds at least one month.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, month: YearMonth) -> bool {
        self.from <= month && month <= self.to
    }

    /// Months of the range in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = YearMonth> + use<> {
        let start = self.from.ordinal();
        (start..=self.to.ordinal()).map(YearMonth::from_ordinal)
    }

    /// Calendar years touched by the range, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.from.year..=self.to.year
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}
