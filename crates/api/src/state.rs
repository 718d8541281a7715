use std::sync::Arc;

use sitedesk_core::content::ContentBody;
use sitedesk_core::events::EventBus;
use sitedesk_core::store::{AnalyticsStore, ContentRepository, ContentStore, LeadStore, MemoryStore, PgStore};
use sqlx::PgPool;

use crate::config::AppConfig;

/// The three persistence seams, backed by one store.
#[derive(Clone)]
pub struct Stores {
    pub content: Arc<dyn ContentStore>,
    pub leads: Arc<dyn LeadStore>,
    pub analytics: Arc<dyn AnalyticsStore>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            content: store.clone(),
            leads: store.clone(),
            analytics: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            content: store.clone(),
            leads: store.clone(),
            analytics: store,
        }
    }
}

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    stores: Stores,
    config: AppConfig,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(stores: Stores, config: AppConfig, event_bus: EventBus) -> Self {
        Self {
            inner: Arc::new(InnerState {
                stores,
                config,
                event_bus,
            }),
        }
    }

    pub fn content(&self) -> &dyn ContentStore {
        self.inner.stores.content.as_ref()
    }

    pub fn leads(&self) -> &dyn LeadStore {
        self.inner.stores.leads.as_ref()
    }

    pub fn analytics(&self) -> &dyn AnalyticsStore {
        self.inner.stores.analytics.as_ref()
    }

    /// Typed view of one content kind, read fresh for this request.
    pub fn repository<T: ContentBody>(&self) -> ContentRepository<T> {
        ContentRepository::new(self.inner.stores.content.clone())
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
