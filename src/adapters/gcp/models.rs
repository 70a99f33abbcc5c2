//! Google Cloud API request and response models

use crate::domain::NormalizedContract;
use serde::{Deserialize, Serialize};

/// Token returned by the instance metadata server
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// Object resource returned by a successful media upload
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResource {
    pub bucket: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<String>,
}

/// One warehouse row, mapped field by field onto the table schema
///
/// Date columns are `Option` because the warehouse rejects `""` for DATE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseRow {
    pub notice_id: String,
    pub title: String,
    pub solicitation_number: String,
    pub posted_date: Option<String>,
    pub response_deadline: Option<String>,
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

impl From<&NormalizedContract> for WarehouseRow {
    fn from(contract: &NormalizedContract) -> Self {
        Self {
            notice_id: contract.notice_id.clone(),
            title: contract.title.clone(),
            solicitation_number: contract.solicitation_number.clone(),
            posted_date: date_or_null(&contract.posted_date),
            response_deadline: date_or_null(&contract.response_deadline),
            notice_type: contract.notice_type.clone(),
            naics_code: contract.naics_code.clone(),
            active: contract.active.clone(),
            organization: contract.organization.clone(),
            office_city: contract.office_city.clone(),
            office_state: contract.office_state.clone(),
            contact_email: contract.contact_email.clone(),
            contact_phone: contract.contact_phone.clone(),
            ui_link: contract.ui_link.clone(),
            set_aside: contract.set_aside.clone(),
        }
    }
}

fn date_or_null(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// `tabledata.insertAll` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllRequest {
    pub kind: &'static str,
    pub skip_invalid_rows: bool,
    pub ignore_unknown_values: bool,
    pub rows: Vec<InsertAllRow>,
}

impl InsertAllRequest {
    pub fn new(rows: Vec<InsertAllRow>) -> Self {
        Self {
            kind: "bigquery#tableDataInsertAllRequest",
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            rows,
        }
    }
}

/// A row wrapper; no `insertId`, so the warehouse never deduplicates
#[derive(Debug, Serialize)]
pub struct InsertAllRow {
    pub json: WarehouseRow,
}

/// `tabledata.insertAll` response body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllResponse {
    #[serde(default)]
    pub insert_errors: Vec<RowInsertErrors>,
}

/// Errors for one rejected row
#[derive(Debug, Clone, Deserialize)]
pub struct RowInsertErrors {
    pub index: usize,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

/// Error detail as reported by Google APIs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub message: String,
}
