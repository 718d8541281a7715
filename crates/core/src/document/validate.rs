use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("document type is required")]
    EmptyType,
    #[error("invalid document type: {0}")]
    InvalidType(String),
    #[error("document title cannot be empty")]
    EmptyTitle,
    #[error("document content must be a JSON object")]
    ContentNotObject,
    #[error("{field} is required")]
    MissingField { field: String },
    #[error("{field} is invalid: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("duplicate {field}: {value}")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate the fields every content document needs before it is stored.
pub fn validate_document_fields(title: &str, content: &serde_json::Value) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if !content.is_object() {
        return Err(ValidationError::ContentNotObject);
    }
    Ok(())
}

/// Loose e-mail shape check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("https://") || url.starts_with("http://"))
        && url.split("://").nth(1).is_some_and(|rest| !rest.is_empty() && !rest.contains(' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_fields() {
        assert!(validate_document_fields("Footer", &json!({})).is_ok());
        assert_eq!(
            validate_document_fields("  ", &json!({})),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_document_fields("Footer", &json!([1])),
            Err(ValidationError::ContentNotObject)
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("hello@example.com"));
        assert!(is_valid_email(" ops@sub.example.co "));
        assert!(!is_valid_email("hello@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("hello@localhost"));
        assert!(!is_valid_email("hel lo@example.com"));
    }

    #[test]
    fn url_shapes() {
        assert!(is_valid_url("https://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("https://"));
    }
}
