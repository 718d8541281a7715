use sitedesk_core::events::{EventBus, SiteEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Log every write published on the bus until the bus is dropped.
pub fn spawn_audit_logger(bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "audit logger lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &SiteEvent) {
    match event {
        SiteEvent::ContentSaved(e) => tracing::info!(
            target: "audit",
            id = %e.document_id,
            kind = %e.kind,
            operation = %e.operation,
            previous_rev = e.previous_rev.as_deref().unwrap_or("-"),
            result_rev = %e.result_rev,
            "content saved"
        ),
        SiteEvent::LeadReceived(e) => tracing::info!(target: "audit", id = %e.lead_id, "lead received"),
        SiteEvent::LeadUpdated(e) => {
            tracing::info!(target: "audit", id = %e.lead_id, status = %e.status, "lead updated")
        }
    }
}
