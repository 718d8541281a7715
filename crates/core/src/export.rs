//! CSV export of the leads listing.

use chrono::NaiveDate;

use crate::content::leads::ContactSubmission;

pub const LEADS_CSV_HEADER: [&str; 12] = [
    "id",
    "name",
    "email",
    "phone",
    "company",
    "message",
    "status",
    "submissionStatus",
    "sentToHubSpot",
    "hubspotContactId",
    "countryCode",
    "createdAt",
];

/// Quote a field when it holds a comma, quote or line break (RFC 4180).
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let row: Vec<String> = fields.into_iter().map(csv_field).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

pub fn leads_csv<'a>(leads: impl IntoIterator<Item = &'a ContactSubmission>) -> String {
    let mut out = String::new();
    push_row(&mut out, LEADS_CSV_HEADER);
    for lead in leads {
        let id = lead.id.to_string();
        let created = lead.created_at.to_rfc3339();
        push_row(
            &mut out,
            [
                id.as_str(),
                lead.name.as_str(),
                lead.email.as_str(),
                lead.phone.as_deref().unwrap_or(""),
                lead.company.as_deref().unwrap_or(""),
                lead.message.as_str(),
                lead.status.as_str(),
                lead.submission_status.as_str(),
                if lead.sent_to_hubspot { "true" } else { "false" },
                lead.hubspot_contact_id.as_deref().unwrap_or(""),
                lead.country_code.as_deref().unwrap_or(""),
                created.as_str(),
            ],
        );
    }
    out
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("leads_export_{}.csv", date.format("%Y-%m-%d"))
}
