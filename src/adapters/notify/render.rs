//! Summary email rendering

use super::traits::NotificationReport;
use crate::domain::NormalizedContract;
use maud::{html, Markup, DOCTYPE};

const NO_CONTRACTS: &str = "No contracts found for this date range.";

/// `Government Contract Report - N contracts found (FROM)`
pub fn subject(report: &NotificationReport<'_>) -> String {
    format!(
        "Government Contract Report - {} contracts found ({})",
        report.contracts.len(),
        report.range.posted_from
    )
}

/// HTML body with one table row per contract
pub fn html_body(report: &NotificationReport<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html {
            body {
                h2 { "Government Contract Fetcher Daily Report" }
                p { strong { "Date Range:" } " " (report.range) }
                p { strong { "Total Contracts Found:" } " " (report.contracts.len()) }
                p { strong { "Data Location:" } " " (report.data_location) }

                h3 { "Contract Summary:" }
                (contracts_table(report.contracts))

                hr;
                p { small { "This is an automated report from the contract fetcher job." } }
            }
        }
    }
}

fn contracts_table(contracts: &[NormalizedContract]) -> Markup {
    if contracts.is_empty() {
        return html! { p { (NO_CONTRACTS) } };
    }

    html! {
        table border="1" cellpadding="5" cellspacing="0"
            style="border-collapse: collapse; width: 100%;"
        {
            tr style="background-color: #f2f2f2;" {
                th { "Title" }
                th { "Organization" }
                th { "Solicitation #" }
                th { "Posted Date" }
                th { "Deadline" }
                th { "Type" }
                th { "Office Location" }
                th { "Set Aside" }
            }
            @for contract in contracts {
                tr {
                    td {
                        a href=(or_default(&contract.ui_link, "#")) target="_blank" {
                            (or_na(&contract.title))
                        }
                    }
                    td { (or_na(&contract.organization)) }
                    td { (or_na(&contract.solicitation_number)) }
                    td { (or_na(&contract.posted_date)) }
                    td { (or_na(&contract.response_deadline)) }
                    td { (or_na(&contract.notice_type)) }
                    td { (office_location(contract)) }
                    td { (or_na(&contract.set_aside)) }
                }
            }
        }
    }
}

/// Plain-text alternative body
pub fn text_body(report: &NotificationReport<'_>) -> String {
    let mut lines = vec![
        "Government Contract Fetcher Daily Report".to_string(),
        String::new(),
        format!("Date Range: {}", report.range),
        format!("Total Contracts Found: {}", report.contracts.len()),
        format!("Data Location: {}", report.data_location),
        String::new(),
    ];

    if report.contracts.is_empty() {
        lines.push(NO_CONTRACTS.to_string());
    } else {
        lines.push("Contract Details:".to_string());
        for (i, contract) in report.contracts.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {}", i + 1, or_na(&contract.title)));
            lines.push(format!("   Organization: {}", or_na(&contract.organization)));
            lines.push(format!("   Solicitation: {}", or_na(&contract.solicitation_number)));
            lines.push(format!("   Posted: {}", or_na(&contract.posted_date)));
            lines.push(format!("   Deadline: {}", or_na(&contract.response_deadline)));
            lines.push(format!("   Link: {}", or_na(&contract.ui_link)));
        }
    }

    let mut body = lines.join("\n");
    body.push('\n');
    body
}

fn office_location(contract: &NormalizedContract) -> String {
    match (contract.office_city.is_empty(), contract.office_state.is_empty()) {
        (true, true) => "N/A".to_string(),
        (false, true) => contract.office_city.clone(),
        (true, false) => contract.office_state.clone(),
        (false, false) => format!("{}, {}", contract.office_city, contract.office_state),
    }
}

fn or_na(value: &str) -> &str {
    or_default(value, "N/A")
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
