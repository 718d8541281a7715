use async_trait::async_trait;
use sitedesk_core::document::{ContentDocument, ContentKind, NewContentDocument, ValidationError};
use sitedesk_core::store::{ContentStore, StoreError};
use uuid::Uuid;

use crate::client::SiteClient;
use crate::error::ClientError;

/// [`ContentStore`] backed by a remote sitedesk API, so typed
/// repositories and admin editors work the same against a live site.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: SiteClient,
}

impl HttpContentStore {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }
}

fn to_store_error(err: ClientError, expected: Option<&str>) -> StoreError {
    match &err {
        ClientError::Api { status: 404, message, .. } => StoreError::NotFound(message.clone()),
        ClientError::Api { status: 409, message, .. } => StoreError::Conflict {
            expected: expected.unwrap_or("-").to_string(),
            actual: message.clone(),
        },
        ClientError::Api {
            status: 400 | 422,
            message,
            ..
        } => StoreError::Validation(ValidationError::invalid("document", message.clone())),
        _ => StoreError::Backend(err.to_string()),
    }
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        to_store_error(err, None)
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn list_by_kind(&self, kind: &ContentKind) -> Result<Vec<ContentDocument>, StoreError> {
        Ok(self.client.list_content(Some(kind)).await?)
    }

    async fn list_all(&self) -> Result<Vec<ContentDocument>, StoreError> {
        Ok(self.client.list_content(None).await?)
    }

    async fn get(&self, id: Uuid) -> Result<ContentDocument, StoreError> {
        Ok(self.client.get_document(id).await?)
    }

    async fn create(&self, new: NewContentDocument) -> Result<ContentDocument, StoreError> {
        Ok(self.client.create_document(&new).await?)
    }

    async fn replace(
        &self,
        id: Uuid,
        new: NewContentDocument,
        if_revision: Option<&str>,
    ) -> Result<ContentDocument, StoreError> {
        self.client
            .replace_document(id, &new, if_revision)
            .await
            .map_err(|e| to_store_error(e, if_revision))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client.health().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> ClientError {
        ClientError::Api {
            status,
            error_type: "x".into(),
            message: "boom".into(),
        }
    }

    #[test]
    fn maps_statuses_to_store_errors() {
        assert!(matches!(StoreError::from(api(404)), StoreError::NotFound(m) if m == "boom"));
        assert!(matches!(
            to_store_error(api(409), Some("abc")),
            StoreError::Conflict { expected, .. } if expected == "abc"
        ));
        assert!(matches!(StoreError::from(api(422)), StoreError::Validation(_)));
        assert!(matches!(StoreError::from(api(500)), StoreError::Backend(_)));
    }
}
