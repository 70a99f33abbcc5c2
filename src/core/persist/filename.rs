//! Artifact filename generation

use crate::domain::DateRange;
use chrono::NaiveDateTime;

/// Derives the artifact filename for a posted-date range
///
/// - single day: `contracts_YYYYMMDD.json`
/// - range: `contracts_YYYYMMDD_to_YYYYMMDD.json`
/// - either bound unparseable: `contracts_YYYYMMDD_HHMMSS.json` from `now`
///
/// The result depends only on `range` unless the fallback is used.
///
/// # Examples
///
/// ```
/// use contract_fetcher::core::persist::contract_filename;
/// use contract_fetcher::domain::DateRange;
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2026, 1, 28)
///     .unwrap()
///     .and_hms_opt(6, 0, 0)
///     .unwrap();
///
/// let range = DateRange::new("01/27/2026", "01/27/2026");
/// assert_eq!(contract_filename(&range, now), "contracts_20260127.json");
///
/// let range = DateRange::new("01/20/2026", "01/27/2026");
/// assert_eq!(contract_filename(&range, now), "contracts_20260120_to_20260127.json");
/// ```
pub fn contract_filename(range: &DateRange, now: NaiveDateTime) -> String {
    match (range.from_date(), range.to_date()) {
        (Some(from), Some(to)) if from == to => {
            format!("contracts_{}.json", from.format("%Y%m%d"))
        }
        (Some(from), Some(to)) => format!(
            "contracts_{}_to_{}.json",
            from.format("%Y%m%d"),
            to.format("%Y%m%d")
        ),
        _ => format!("contracts_{}.json", now.format("%Y%m%d_%H%M%S")),
    }
}

/// Joins the logical prefix and filename into an object key
pub fn object_key(prefix: &str, filename: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}
