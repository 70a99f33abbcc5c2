//! Posted-date range used for one fetch

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format expected by the opportunities API (`postedFrom` / `postedTo`)
pub const API_DATE_FORMAT: &str = "%m/%d/%Y";

/// Inclusive posted-date range, kept in the API's `MM/DD/YYYY` wire format
///
/// The values are passed to the API verbatim; they are only parsed when a
/// calendar date is needed (e.g. for the artifact filename).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start of the range (`MM/DD/YYYY`)
    pub posted_from: String,

    /// End of the range (`MM/DD/YYYY`)
    pub posted_to: String,
}

impl DateRange {
    /// Creates a range from two API-format date strings
    pub fn new(posted_from: impl Into<String>, posted_to: impl Into<String>) -> Self {
        Self {
            posted_from: posted_from.into(),
            posted_to: posted_to.into(),
        }
    }

    /// Creates a single-day range
    pub fn single_day(date: NaiveDate) -> Self {
        let formatted = date.format(API_DATE_FORMAT).to_string();
        Self::new(formatted.clone(), formatted)
    }

    /// The day before `today`, as a single-day range
    ///
    /// ```
    /// use contract_fetcher::domain::DateRange;
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 1, 28).unwrap();
    /// let range = DateRange::yesterday(today);
    /// assert_eq!(range.posted_from, "01/27/2026");
    /// assert!(range.is_single_day());
    /// ```
    pub fn yesterday(today: NaiveDate) -> Self {
        Self::single_day(today.pred_opt().unwrap_or(today))
    }

    /// Resolves optional bounds: unless both are given, both default to yesterday
    pub fn resolve(
        posted_from: Option<&str>,
        posted_to: Option<&str>,
        today: NaiveDate,
    ) -> Self {
        match (non_blank(posted_from), non_blank(posted_to)) {
            (Some(from), Some(to)) => Self::new(from, to),
            _ => Self::yesterday(today),
        }
    }

    /// Whether both bounds are the same day string
    pub fn is_single_day(&self) -> bool {
        self.posted_from == self.posted_to
    }

    /// Parses the start bound, `None` if it is not a valid `MM/DD/YYYY` date
    pub fn from_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.posted_from.trim(), API_DATE_FORMAT).ok()
    }

    /// Parses the end bound, `None` if it is not a valid `MM/DD/YYYY` date
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.posted_to.trim(), API_DATE_FORMAT).ok()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.posted_from, self.posted_to)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
