//! Contract opportunity records
//!
//! [`RawOpportunity`] is the untyped document returned by the search API and
//! never leaves the fetch/normalize boundary. [`NormalizedContract`] is the
//! flat, fully-populated record that every sink and the notifier consume.

use super::date_range::DateRange;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the unique notice identifier in a raw opportunity
pub const NOTICE_ID_KEY: &str = "noticeId";

/// As-received opportunity from the search API
///
/// No shape is guaranteed: any key may be missing, null, or of an
/// unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOpportunity(Value);

impl RawOpportunity {
    /// Wraps an arbitrary JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the notice identifier if it is a non-empty string
    pub fn notice_id(&self) -> Option<&str> {
        self.0
            .get(NOTICE_ID_KEY)
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
    }

    /// Returns a top-level field, treating JSON `null` as absent
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Borrows the underlying document
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawOpportunity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Flat contract record persisted to storage and shown in notifications
///
/// Every field is always present (possibly empty). Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContract {
    pub notice_id: String,
    pub title: String,
    pub solicitation_number: String,
    pub posted_date: String,
    pub response_deadline: String,
    #[serde(rename = "type")]
    pub notice_type: String,
    pub naics_code: String,
    pub active: String,
    pub organization: String,
    pub office_city: String,
    pub office_state: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub ui_link: String,
    pub set_aside: String,
}

impl NormalizedContract {
    /// Column names in persisted order
    pub const COLUMNS: [&'static str; 15] = [
        "notice_id",
        "title",
        "solicitation_number",
        "posted_date",
        "response_deadline",
        "type",
        "naics_code",
        "active",
        "organization",
        "office_city",
        "office_state",
        "contact_email",
        "contact_phone",
        "ui_link",
        "set_aside",
    ];
}

/// Working set of one run: normalized contracts plus the range they were fetched for
#[derive(Debug, Clone, PartialEq)]
pub struct FetchBatch {
    pub contracts: Vec<NormalizedContract>,
    pub range: DateRange,
}

impl FetchBatch {
    pub fn new(contracts: Vec<NormalizedContract>, range: DateRange) -> Self {
        Self { contracts, range }
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notice_id_present() {
        let raw = RawOpportunity::new(json!({"noticeId": "N1"}));
        assert_eq!(raw.notice_id(), Some("N1"));
    }

    #[test]
    fn test_notice_id_missing_or_blank() {
        assert_eq!(RawOpportunity::new(json!({})).notice_id(), None);
        assert_eq!(RawOpportunity::new(json!({"noticeId": ""})).notice_id(), None);
        assert_eq!(RawOpportunity::new(json!({"noticeId": null})).notice_id(), None);
        assert_eq!(RawOpportunity::new(json!({"noticeId": 42})).notice_id(), None);
        assert_eq!(RawOpportunity::new(json!("not an object")).notice_id(), None);
    }

    #[test]
    fn test_field_treats_null_as_absent() {
        let raw = RawOpportunity::new(json!({"officeAddress": null, "title": "T"}));
        assert!(raw.field("officeAddress").is_none());
        assert_eq!(raw.field("title"), Some(&json!("T")));
    }

    #[test]
    fn test_serialized_keys_match_columns() {
        let value = serde_json::to_value(NormalizedContract::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), NormalizedContract::COLUMNS.len());
        for column in NormalizedContract::COLUMNS {
            assert_eq!(object[column], json!(""), "missing column {column}");
        }
    }
}
