use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{method} {url} failed: {source}")]
    Request {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{message} ({status})")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Request { source, .. } if source.is_timeout())
    }

    /// Error from a non-2xx response body. Falls back to the raw text when
    /// the body is not the API's `{"error": {...}}` shape.
    pub(crate) fn from_response(status: u16, raw: &str) -> Self {
        let parsed: Option<(String, String)> = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|value| {
                let error = value.get("error")?;
                let message = error.get("message")?.as_str()?.to_owned();
                let kind = error
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("unknown")
                    .to_owned();
                Some((kind, message))
            });
        let (error_type, message) = parsed.unwrap_or_else(|| {
            let text = raw.trim();
            let message = if text.is_empty() {
                format!("request failed with status {status}")
            } else {
                text.to_owned()
            };
            ("unknown".to_owned(), message)
        });
        ClientError::Api {
            status,
            error_type,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_error_body() {
        let err = ClientError::from_response(
            409,
            r#"{"error":{"type":"conflict","message":"revision mismatch","statusCode":409}}"#,
        );
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "revision mismatch (409)");
        assert!(matches!(err, ClientError::Api { error_type, .. } if error_type == "conflict"));
    }

    #[test]
    fn falls_back_to_raw_text() {
        let err = ClientError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "Bad Gateway (502)");
        let err = ClientError::from_response(404, "");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "request failed with status 404 (404)");
    }
}
