use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitedesk_query::{FieldValue, FilterField, FilterKind, FilterSchema, Record, SortFields, SortOrder};
use uuid::Uuid;

use crate::document::validate::is_valid_email;
use crate::document::ValidationError;

/// Sales pipeline status of a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::invalid("status", format!("unknown lead status {s:?}")))
    }
}

/// Outcome of forwarding the submission to the CRM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Failed => "failed",
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "completed" => Ok(SubmissionStatus::Completed),
            "failed" => Ok(SubmissionStatus::Failed),
            other => Err(ValidationError::invalid(
                "submissionStatus",
                format!("unknown submission status {other:?}"),
            )),
        }
    }
}

/// A contact-form submission tracked as a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub submission_status: SubmissionStatus,
    pub status: LeadStatus,
    #[serde(rename = "sentToHubSpot")]
    pub sent_to_hubspot: bool,
    pub hubspot_contact_id: Option<String>,
    pub country_code: Option<String>,
    pub source_page: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the public contact form posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub source_page: Option<String>,
}

pub const MAX_MESSAGE_LEN: usize = 5000;

impl NewContactSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::missing("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::missing("email"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::invalid("email", "not a valid e-mail address"));
        }
        if self.message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ValidationError::invalid(
                "message",
                format!("longer than {MAX_MESSAGE_LEN} characters"),
            ));
        }
        if let Some(code) = &self.country_code {
            if !code.is_empty() && !(code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())) {
                return Err(ValidationError::invalid("countryCode", "expected a two-letter code"));
            }
        }
        Ok(())
    }

    /// Turn a validated form post into a stored submission.
    pub fn into_submission(self, now: DateTime<Utc>) -> ContactSubmission {
        ContactSubmission {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: blank_to_none(self.phone),
            company: blank_to_none(self.company),
            message: self.message,
            submission_status: SubmissionStatus::Pending,
            status: LeadStatus::New,
            sent_to_hubspot: false,
            hubspot_contact_id: None,
            country_code: blank_to_none(self.country_code).map(|c| c.to_ascii_uppercase()),
            source_page: blank_to_none(self.source_page),
            created_at: now,
            updated_at: now,
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Partial update sent from the leads dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<SubmissionStatus>,
    #[serde(default, rename = "sentToHubSpot", skip_serializing_if = "Option::is_none")]
    pub sent_to_hubspot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hubspot_contact_id: Option<String>,
}

impl LeadPatch {
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.submission_status.is_none()
            && self.sent_to_hubspot.is_none()
            && self.hubspot_contact_id.is_none()
    }
}

impl ContactSubmission {
    pub fn apply(&mut self, patch: LeadPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(status) = patch.submission_status {
            self.submission_status = status;
        }
        if let Some(sent) = patch.sent_to_hubspot {
            self.sent_to_hubspot = sent;
        }
        if let Some(id) = patch.hubspot_contact_id {
            self.hubspot_contact_id = (!id.is_empty()).then_some(id);
        }
        self.updated_at = now;
    }
}

impl Record for ContactSubmission {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_deref().into(),
            "company" => self.company.as_deref().into(),
            "message" => self.message.as_str().into(),
            "status" => self.status.as_str().into(),
            "submissionStatus" => self.submission_status.as_str().into(),
            "sentToHubSpot" => self.sent_to_hubspot.into(),
            "countryCode" => self.country_code.as_deref().into(),
            "sourcePage" => self.source_page.as_deref().into(),
            "createdAt" => self.created_at.into(),
            _ => FieldValue::Missing,
        }
    }
}

const LEAD_FILTERS: &[FilterField] = &[
    FilterField::new("search", FilterKind::Search(&["name", "email", "company", "message"])),
    FilterField::new("status", FilterKind::Exact("status")),
    FilterField::new("submissionStatus", FilterKind::Exact("submissionStatus")),
    FilterField::new("hubspot", FilterKind::Flag("sentToHubSpot")),
    FilterField::new("country", FilterKind::Exact("countryCode")),
];

pub fn lead_filter_schema() -> FilterSchema {
    FilterSchema {
        fields: LEAD_FILTERS,
        sort_fields: SortFields::new("createdAt", "name", "sentToHubSpot"),
        default_sort: Some(SortOrder::Newest),
        default_per_page: 25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;

    fn form(name: &str, email: &str) -> NewContactSubmission {
        NewContactSubmission {
            name: name.into(),
            email: email.into(),
            message: "We need an ERP assessment".into(),
            ..NewContactSubmission::default()
        }
    }

    #[test]
    fn form_validation() {
        assert!(form("Ada", "ada@example.com").validate().is_ok());
        assert_eq!(form(" ", "ada@example.com").validate(), Err(ValidationError::missing("name")));
        assert!(form("Ada", "ada@").validate().is_err());
        let mut f = form("Ada", "ada@example.com");
        f.country_code = Some("ITA".into());
        assert!(f.validate().is_err());
    }

    #[test]
    fn submission_normalises_fields() {
        let mut f = form(" Ada ", " Ada@Example.com ");
        f.phone = Some("  ".into());
        f.country_code = Some("it".into());
        let s = f.into_submission(Utc::now());
        assert_eq!(s.name, "Ada");
        assert_eq!(s.email, "ada@example.com");
        assert_eq!(s.phone, None);
        assert_eq!(s.country_code.as_deref(), Some("IT"));
        assert_eq!(s.status, LeadStatus::New);
        assert_eq!(s.submission_status, SubmissionStatus::Pending);
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let now = Utc::now();
        let mut s = form("Ada", "ada@example.com").into_submission(now);
        s.apply(
            LeadPatch {
                sent_to_hubspot: Some(true),
                hubspot_contact_id: Some("hs-42".into()),
                ..LeadPatch::default()
            },
            now + Duration::minutes(1),
        );
        assert!(s.sent_to_hubspot);
        assert_eq!(s.hubspot_contact_id.as_deref(), Some("hs-42"));
        assert_eq!(s.status, LeadStatus::New);
        assert!(s.updated_at > s.created_at);
    }

    #[test]
    fn wire_names_match_dashboard() {
        let s = form("Ada", "ada@example.com").into_submission(Utc::now());
        let wire = serde_json::to_value(&s).unwrap();
        assert_eq!(wire["sentToHubSpot"], false);
        assert_eq!(wire["submissionStatus"], "pending");
        assert_eq!(wire["status"], "new");
        let patch: LeadPatch = serde_json::from_value(serde_json::json!({"status": "qualified"})).unwrap();
        assert_eq!(patch, LeadPatch::status(LeadStatus::Qualified));
    }

    #[test]
    fn schema_filters_leads() {
        let now = Utc::now();
        let mut a = form("Ada", "ada@example.com").into_submission(now);
        a.country_code = Some("IT".into());
        let mut b = form("Grace", "grace@navy.mil").into_submission(now + Duration::seconds(5));
        b.status = LeadStatus::Contacted;
        b.sent_to_hubspot = true;
        let leads = vec![a, b];

        let schema = lead_filter_schema();
        let params: HashMap<String, String> = [("hubspot", "true"), ("status", "contacted")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let listing = schema.query_from_params(&params).unwrap().run(&leads, &schema.sort_fields);
        assert_eq!(listing.total, 1);
        assert_eq!(listing.items[0].name, "Grace");

        let all = schema.query_from_params(&HashMap::new()).unwrap().run(&leads, &schema.sort_fields);
        assert_eq!(all.items[0].name, "Grace", "newest first by default");

        let italy: HashMap<String, String> = HashMap::from([("country".to_string(), "it".to_string())]);
        let listing = schema.query_from_params(&italy).unwrap().run(&leads, &schema.sort_fields);
        assert_eq!(listing.total, 1);
    }

    #[test]
    fn status_round_trip_from_str() {
        assert_eq!("converted".parse::<LeadStatus>().unwrap(), LeadStatus::Converted);
        assert!("won".parse::<LeadStatus>().is_err());
    }
}
