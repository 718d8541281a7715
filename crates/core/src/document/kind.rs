use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::validate::ValidationError;

/// The `type` tag that partitions content documents.
///
/// Known tags get their own variant; anything else that is a valid tag
/// (lowercase ASCII, digits and dashes) is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Footer,
    Settings,
    ClientsPage,
    BlogPage,
    ModulesPage,
    Snippets,
    ContactForm,
    ThankYouPage,
    Other(String),
}

impl ContentKind {
    pub fn parse(tag: &str) -> Result<Self, ValidationError> {
        let kind = match tag {
            "footer" => ContentKind::Footer,
            "settings" => ContentKind::Settings,
            "clients-page" => ContentKind::ClientsPage,
            "blog-page" => ContentKind::BlogPage,
            "modules-page" => ContentKind::ModulesPage,
            "snippets" => ContentKind::Snippets,
            "contact-form" => ContentKind::ContactForm,
            "thank-you-page" => ContentKind::ThankYouPage,
            "" => return Err(ValidationError::EmptyType),
            other => {
                let valid = other
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                    && !other.starts_with('-')
                    && !other.ends_with('-');
                if !valid {
                    return Err(ValidationError::InvalidType(other.to_string()));
                }
                ContentKind::Other(other.to_string())
            }
        };
        Ok(kind)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::Footer => "footer",
            ContentKind::Settings => "settings",
            ContentKind::ClientsPage => "clients-page",
            ContentKind::BlogPage => "blog-page",
            ContentKind::ModulesPage => "modules-page",
            ContentKind::Snippets => "snippets",
            ContentKind::ContactForm => "contact-form",
            ContentKind::ThankYouPage => "thank-you-page",
            ContentKind::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ContentKind::Other(_))
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::parse(s)
    }
}

impl Serialize for ContentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        ContentKind::parse(&tag).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        let kind = ContentKind::parse("clients-page").unwrap();
        assert_eq!(kind, ContentKind::ClientsPage);
        assert_eq!(kind.as_str(), "clients-page");
        assert!(kind.is_known());
    }

    #[test]
    fn parse_other_kind() {
        let kind = ContentKind::parse("careers-page").unwrap();
        assert_eq!(kind, ContentKind::Other("careers-page".to_string()));
        assert_eq!(kind.to_string(), "careers-page");
        assert!(!kind.is_known());
    }

    #[test]
    fn reject_malformed_kinds() {
        assert!(matches!(ContentKind::parse(""), Err(ValidationError::EmptyType)));
        assert!(ContentKind::parse("Blog Page").is_err());
        assert!(ContentKind::parse("-footer").is_err());
    }

    #[test]
    fn serde_as_plain_string() {
        let json = serde_json::to_string(&ContentKind::Snippets).unwrap();
        assert_eq!(json, "\"snippets\"");
        let back: ContentKind = serde_json::from_str("\"footer\"").unwrap();
        assert_eq!(back, ContentKind::Footer);
    }
}
