use serde::{Deserialize, Serialize};

use super::ContentBody;
use crate::document::validate::{is_valid_email, is_valid_url};
use crate::document::{ContentKind, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub site_name: String,
    pub site_description: String,
    pub site_url: String,
    pub default_language: String,
    pub maintenance_mode: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            site_name: String::new(),
            site_description: String::new(),
            site_url: String::new(),
            default_language: "en".to_string(),
            maintenance_mode: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSettings {
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialSettings {
    pub linkedin: String,
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
    pub youtube: String,
}

impl SocialSettings {
    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("social.linkedin", self.linkedin.as_str()),
            ("social.twitter", self.twitter.as_str()),
            ("social.facebook", self.facebook.as_str()),
            ("social.instagram", self.instagram.as_str()),
            ("social.youtube", self.youtube.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessSettings {
    pub company_name: String,
    pub vat_number: String,
    pub business_hours: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_on_new_lead: bool,
    pub notification_email: String,
    pub weekly_report: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub session_timeout_minutes: u32,
    pub max_login_attempts: u32,
    pub require_two_factor: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 60,
            max_login_attempts: 5,
            require_two_factor: false,
        }
    }
}

/// Site-wide settings edited from the dashboard settings page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub general: GeneralSettings,
    pub contact: ContactSettings,
    pub social: SocialSettings,
    pub business: BusinessSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
}

/// One validation finding, keyed by the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsIssue {
    pub field: &'static str,
    pub message: String,
}

impl SettingsIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl SiteSettings {
    /// Every problem that blocks a save, in field order.
    pub fn issues(&self) -> Vec<SettingsIssue> {
        let mut issues = Vec::new();
        if self.general.site_name.trim().is_empty() {
            issues.push(SettingsIssue::new("general.siteName", "Site name is required"));
        }
        if !self.general.site_url.is_empty() && !is_valid_url(&self.general.site_url) {
            issues.push(SettingsIssue::new("general.siteUrl", "Site URL must start with http:// or https://"));
        }
        if !self.contact.email.is_empty() && !is_valid_email(&self.contact.email) {
            issues.push(SettingsIssue::new("contact.email", "Contact e-mail is not valid"));
        }
        for (field, url) in self.social.entries() {
            if !url.is_empty() && !is_valid_url(url) {
                issues.push(SettingsIssue::new(field, "Social link must be a full URL"));
            }
        }
        if self.notifications.email_on_new_lead {
            if self.notifications.notification_email.is_empty() {
                issues.push(SettingsIssue::new(
                    "notifications.notificationEmail",
                    "A notification e-mail is required when lead alerts are on",
                ));
            } else if !is_valid_email(&self.notifications.notification_email) {
                issues.push(SettingsIssue::new(
                    "notifications.notificationEmail",
                    "Notification e-mail is not valid",
                ));
            }
        }
        if !(5..=1440).contains(&self.security.session_timeout_minutes) {
            issues.push(SettingsIssue::new(
                "security.sessionTimeoutMinutes",
                "Session timeout must be between 5 and 1440 minutes",
            ));
        }
        if !(1..=20).contains(&self.security.max_login_attempts) {
            issues.push(SettingsIssue::new(
                "security.maxLoginAttempts",
                "Max login attempts must be between 1 and 20",
            ));
        }
        issues
    }
}

impl ContentBody for SiteSettings {
    fn kind() -> ContentKind {
        ContentKind::Settings
    }

    fn title() -> &'static str {
        "Site Settings"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.issues().into_iter().next() {
            Some(issue) => Err(ValidationError::invalid(issue.field, issue.message)),
            None => Ok(()),
        }
    }
}

/// Typed setters for [`SiteSettings`]; each variant writes exactly one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SettingsUpdate {
    SiteName(String),
    SiteDescription(String),
    SiteUrl(String),
    DefaultLanguage(String),
    MaintenanceMode(bool),
    ContactEmail(String),
    ContactPhone(String),
    ContactAddress(String),
    Linkedin(String),
    Twitter(String),
    Facebook(String),
    Instagram(String),
    Youtube(String),
    CompanyName(String),
    VatNumber(String),
    BusinessHours(String),
    Timezone(String),
    EmailOnNewLead(bool),
    NotificationEmail(String),
    WeeklyReport(bool),
    SessionTimeoutMinutes(u32),
    MaxLoginAttempts(u32),
    RequireTwoFactor(bool),
}

impl SettingsUpdate {
    pub fn apply(self, s: &mut SiteSettings) {
        match self {
            SettingsUpdate::SiteName(v) => s.general.site_name = v,
            SettingsUpdate::SiteDescription(v) => s.general.site_description = v,
            SettingsUpdate::SiteUrl(v) => s.general.site_url = v,
            SettingsUpdate::DefaultLanguage(v) => s.general.default_language = v,
            SettingsUpdate::MaintenanceMode(v) => s.general.maintenance_mode = v,
            SettingsUpdate::ContactEmail(v) => s.contact.email = v,
            SettingsUpdate::ContactPhone(v) => s.contact.phone = v,
            SettingsUpdate::ContactAddress(v) => s.contact.address = v,
            SettingsUpdate::Linkedin(v) => s.social.linkedin = v,
            SettingsUpdate::Twitter(v) => s.social.twitter = v,
            SettingsUpdate::Facebook(v) => s.social.facebook = v,
            SettingsUpdate::Instagram(v) => s.social.instagram = v,
            SettingsUpdate::Youtube(v) => s.social.youtube = v,
            SettingsUpdate::CompanyName(v) => s.business.company_name = v,
            SettingsUpdate::VatNumber(v) => s.business.vat_number = v,
            SettingsUpdate::BusinessHours(v) => s.business.business_hours = v,
            SettingsUpdate::Timezone(v) => s.business.timezone = v,
            SettingsUpdate::EmailOnNewLead(v) => s.notifications.email_on_new_lead = v,
            SettingsUpdate::NotificationEmail(v) => s.notifications.notification_email = v,
            SettingsUpdate::WeeklyReport(v) => s.notifications.weekly_report = v,
            SettingsUpdate::SessionTimeoutMinutes(v) => s.security.session_timeout_minutes = v,
            SettingsUpdate::MaxLoginAttempts(v) => s.security.max_login_attempts = v,
            SettingsUpdate::RequireTwoFactor(v) => s.security.require_two_factor = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> SiteSettings {
        let mut s = SiteSettings::default();
        s.general.site_name = "Northwind Digital".into();
        s
    }

    #[test]
    fn defaults_are_sane() {
        let s = SiteSettings::default();
        assert_eq!(s.general.default_language, "en");
        assert!(!s.general.maintenance_mode);
        assert_eq!(s.security.session_timeout_minutes, 60);
        assert_eq!(s.issues().len(), 1, "only the site name is missing");
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn deserializes_partial_groups() {
        let s: SiteSettings = serde_json::from_value(json!({
            "general": {"siteName": "Northwind", "maintenanceMode": true},
            "security": {"requireTwoFactor": true}
        }))
        .unwrap();
        assert!(s.general.maintenance_mode);
        assert_eq!(s.general.default_language, "en");
        assert_eq!(s.security.max_login_attempts, 5);
        assert!(s.security.require_two_factor);
    }

    #[test]
    fn reports_each_issue() {
        let mut s = valid();
        s.contact.email = "not-an-email".into();
        s.social.linkedin = "linkedin.com/company/x".into();
        s.notifications.email_on_new_lead = true;
        s.security.session_timeout_minutes = 2;
        let fields: Vec<&str> = s.issues().iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            [
                "contact.email",
                "social.linkedin",
                "notifications.notificationEmail",
                "security.sessionTimeoutMinutes"
            ]
        );
        assert!(matches!(
            s.validate(),
            Err(ValidationError::InvalidField { field, .. }) if field == "contact.email"
        ));
    }

    #[test]
    fn typed_updates_write_one_field() {
        let mut s = valid();
        SettingsUpdate::ContactPhone("+39 02 5555".into()).apply(&mut s);
        SettingsUpdate::MaintenanceMode(true).apply(&mut s);
        assert_eq!(s.contact.phone, "+39 02 5555");
        assert!(s.general.maintenance_mode);
        assert_eq!(s.general.site_name, "Northwind Digital");
    }

    #[test]
    fn update_wire_format() {
        let update: SettingsUpdate =
            serde_json::from_value(json!({"field": "maxLoginAttempts", "value": 3})).unwrap();
        assert_eq!(update, SettingsUpdate::MaxLoginAttempts(3));
    }
}
