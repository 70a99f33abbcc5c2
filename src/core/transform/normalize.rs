//! Raw opportunity normalization
//!
//! [`normalize`] is total: any JSON value, including non-objects, produces a
//! fully populated [`NormalizedContract`].

use crate::domain::{NormalizedContract, RawOpportunity};
use serde_json::{Map, Value};

/// Length of a `YYYY-MM-DD` date prefix
const DATE_PREFIX_LEN: usize = 10;

/// Converts one raw opportunity into a flat contract record
///
/// - Missing, null or non-scalar fields become `""`.
/// - Numbers and booleans are rendered as their JSON text.
/// - `postedDate` and `responseDeadLine` keep their leading 10 characters.
/// - `officeAddress` that is not an object reads as an empty address.
/// - Only the first `pointOfContact` entry is used.
///
/// # Examples
///
/// ```
/// use contract_fetcher::core::transform::normalize;
/// use contract_fetcher::domain::RawOpportunity;
/// use serde_json::json;
///
/// let raw = RawOpportunity::new(json!({
///     "noticeId": "N1",
///     "postedDate": "2026-01-27T00:00:00Z",
///     "officeAddress": null,
///     "pointOfContact": [],
/// }));
///
/// let contract = normalize(&raw);
/// assert_eq!(contract.posted_date, "2026-01-27");
/// assert_eq!(contract.office_city, "");
/// assert_eq!(contract.contact_email, "");
/// ```
pub fn normalize(raw: &RawOpportunity) -> NormalizedContract {
    let top = |key: &str| text(raw.field(key));

    let empty = Map::new();
    let address = raw
        .field("officeAddress")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let contact = first_contact(raw).unwrap_or(&empty);

    NormalizedContract {
        notice_id: top("noticeId"),
        title: top("title"),
        solicitation_number: top("solicitationNumber"),
        posted_date: date_prefix(&top("postedDate")),
        response_deadline: date_prefix(&top("responseDeadLine")),
        notice_type: top("type"),
        naics_code: top("naicsCode"),
        active: top("active"),
        organization: top("fullParentPathName"),
        office_city: text(address.get("city")),
        office_state: text(address.get("state")),
        contact_email: text(contact.get("email")),
        contact_phone: text(contact.get("phone")),
        ui_link: top("uiLink"),
        set_aside: top("typeOfSetAsideDescription"),
    }
}

/// Normalizes every record, preserving order
pub fn normalize_all(raw: &[RawOpportunity]) -> Vec<NormalizedContract> {
    raw.iter().map(normalize).collect()
}

fn first_contact(raw: &RawOpportunity) -> Option<&Map<String, Value>> {
    raw.field("pointOfContact")
        .and_then(Value::as_array)
        .and_then(|contacts| contacts.first())
        .and_then(Value::as_object)
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn date_prefix(value: &str) -> String {
    value.chars().take(DATE_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn raw(value: Value) -> RawOpportunity {
        RawOpportunity::new(value)
    }

    #[test]
    fn test_full_record() {
        let contract = normalize(&raw(json!({
            "noticeId": "abc123",
            "title": "Cloud Services",
            "solicitationNumber": "70RTAC26R00000001",
            "postedDate": "2026-01-27T09:15:00-05:00",
            "responseDeadLine": "2026-02-15T17:00:00-05:00",
            "type": "Solicitation",
            "naicsCode": "541512",
            "active": "Yes",
            "fullParentPathName": "HOMELAND SECURITY, DEPARTMENT OF.TSA",
            "officeAddress": {"city": "Springfield", "state": "VA", "zipcode": "22150"},
            "pointOfContact": [
                {"email": "first@dhs.gov", "phone": "555-0100"},
                {"email": "second@dhs.gov", "phone": "555-0199"}
            ],
            "uiLink": "https://sam.gov/opp/abc123/view",
            "typeOfSetAsideDescription": "Total Small Business Set-Aside"
        })));

        assert_eq!(contract.notice_id, "abc123");
        assert_eq!(contract.solicitation_number, "70RTAC26R00000001");
        assert_eq!(contract.posted_date, "2026-01-27");
        assert_eq!(contract.response_deadline, "2026-02-15");
        assert_eq!(contract.notice_type, "Solicitation");
        assert_eq!(contract.organization, "HOMELAND SECURITY, DEPARTMENT OF.TSA");
        assert_eq!(contract.office_city, "Springfield");
        assert_eq!(contract.office_state, "VA");
        assert_eq!(contract.contact_email, "first@dhs.gov");
        assert_eq!(contract.contact_phone, "555-0100");
        assert_eq!(contract.set_aside, "Total Small Business Set-Aside");
    }

    #[test_case(json!({}) ; "empty object")]
    #[test_case(json!(null) ; "null")]
    #[test_case(json!([1, 2, 3]) ; "array")]
    #[test_case(json!("noticeId") ; "string")]
    #[test_case(json!({"officeAddress": "Main St", "pointOfContact": {"email": "x"}}) ; "wrong nested types")]
    #[test_case(json!({"pointOfContact": ["not-an-object"]}) ; "scalar contact")]
    fn test_malformed_input_yields_empty_record(value: Value) {
        assert_eq!(normalize(&raw(value)), NormalizedContract::default());
    }

    #[test_case("2026-01-27T00:00:00Z", "2026-01-27" ; "utc timestamp")]
    #[test_case("2026-01-27", "2026-01-27" ; "plain date")]
    #[test_case("2026-01", "2026-01" ; "short value kept")]
    #[test_case("", "" ; "empty")]
    #[test_case("ÅÅÅÅÅÅÅÅÅÅÅÅ", "ÅÅÅÅÅÅÅÅÅÅ" ; "multibyte")]
    fn test_date_prefix(input: &str, expected: &str) {
        assert_eq!(date_prefix(input), expected);
    }

    #[test]
    fn test_null_and_empty_nested() {
        let contract = normalize(&raw(json!({
            "noticeId": "N1",
            "officeAddress": null,
            "pointOfContact": [],
            "postedDate": "2026-01-27T00:00:00Z"
        })));

        assert_eq!(contract.notice_id, "N1");
        assert_eq!(contract.office_city, "");
        assert_eq!(contract.office_state, "");
        assert_eq!(contract.contact_email, "");
        assert_eq!(contract.posted_date, "2026-01-27");
    }

    #[test]
    fn test_scalars_become_text() {
        let contract = normalize(&raw(json!({
            "naicsCode": 541512,
            "active": true,
            "title": {"nested": "object"}
        })));
        assert_eq!(contract.naics_code, "541512");
        assert_eq!(contract.active, "true");
        assert_eq!(contract.title, "");
    }

    #[test]
    fn test_idempotent() {
        let input = raw(json!({"noticeId": "N1", "postedDate": "2026-01-27T00:00:00Z"}));
        assert_eq!(normalize(&input), normalize(&input));
    }

    #[test]
    fn test_normalize_all_keeps_order() {
        let records = vec![raw(json!({"noticeId": "B"})), raw(json!({"noticeId": "A"}))];
        let ids: Vec<_> = normalize_all(&records)
            .into_iter()
            .map(|c| c.notice_id)
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
    }
}
