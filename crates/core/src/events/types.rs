use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::leads::LeadStatus;
use crate::document::ContentKind;

/// Events emitted after successful writes, consumed by the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SiteEvent {
    ContentSaved(ContentSavedEvent),
    LeadReceived(LeadEvent),
    LeadUpdated(LeadEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSavedEvent {
    pub document_id: Uuid,
    pub kind: ContentKind,
    pub operation: String,
    pub previous_rev: Option<String>,
    pub result_rev: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEvent {
    pub lead_id: Uuid,
    pub status: LeadStatus,
    pub timestamp: DateTime<Utc>,
}
