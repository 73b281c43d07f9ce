//! Scanner listener lifecycle and message dispatch.
//!
//! The scanner can be injected into the same tab more than once (repeated
//! autofill triggers without a page reload). Each injection registers its
//! listener in a process-scoped registry with replace-atomically
//! semantics, so a triggering message is only ever handled by the latest
//! listener, never twice.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use formpilot_protocols::bus::{mailbox, Delivery, Endpoint, TabId};
use formpilot_protocols::error::ScannerError;
use formpilot_protocols::message::{AutofillMessage, AutofillOutcome};

use crate::discovery::scan_form_fields;
use crate::fill::fill_fields;
use crate::page::PageDriver;

static REGISTRY: Lazy<ScannerRegistry> = Lazy::new(|| ScannerRegistry {
    slots: Mutex::new(HashMap::new()),
});

/// Process-scoped rendezvous between the coordinator and scanner
/// listeners, keyed by tab.
pub struct ScannerRegistry {
    slots: Mutex<HashMap<TabId, Endpoint>>,
}

impl ScannerRegistry {
    pub fn global() -> &'static ScannerRegistry {
        &REGISTRY
    }

    /// Endpoint of the listener currently registered for `tab`, if any.
    /// Looked up fresh on every delivery attempt; a just-injected
    /// listener registers asynchronously.
    pub fn endpoint(&self, tab: &str) -> Option<Endpoint> {
        self.slots.lock().get(tab).cloned()
    }

    /// Register-if-absent-else-replace-atomically. Dropping the previous
    /// endpoint closes the old listener's mailbox, which makes it exit.
    pub fn register(&self, tab: TabId, endpoint: Endpoint) {
        let previous = self.slots.lock().insert(tab.clone(), endpoint);
        if previous.is_some() {
            debug!(%tab, "replaced previously registered scanner listener");
        }
    }

    /// Drop the listener registered for `tab`.
    pub fn reset(&self, tab: &str) {
        self.slots.lock().remove(tab);
    }
}

/// Inject the scanner into a tab.
///
/// Spawns the listener task; the listener publishes its endpoint as its
/// first action, so there is a window right after injection where
/// delivery fails and must be retried by the coordinator.
pub fn inject(tab: TabId, driver: Arc<dyn PageDriver>, coordinator: Endpoint) {
    tokio::spawn(run_listener(tab, driver, coordinator));
}

async fn run_listener(tab: TabId, driver: Arc<dyn PageDriver>, coordinator: Endpoint) {
    let (endpoint, mut inbox) = mailbox();
    ScannerRegistry::global().register(tab.clone(), endpoint);
    debug!(%tab, "scanner listener registered");

    while let Some(delivery) = inbox.next().await {
        handle_delivery(&tab, &driver, &coordinator, delivery).await;
    }

    debug!(%tab, "scanner listener stopped");
}

async fn handle_delivery(
    tab: &str,
    driver: &Arc<dyn PageDriver>,
    coordinator: &Endpoint,
    delivery: Delivery,
) {
    let message = match delivery.message() {
        Ok(message) => message,
        Err(e) => {
            error!(%tab, %e, "scanner received a malformed message");
            let _ = delivery.respond(&AutofillMessage::result(AutofillOutcome::failed(
                format!("malformed message: {e}"),
            )));
            return;
        }
    };

    let outcome = match message {
        AutofillMessage::ScanAndFill => scan_and_fill(driver.as_ref(), coordinator)
            .await
            .unwrap_or_else(|e| AutofillOutcome::failed(format!("scanner error: {e}"))),
        other => {
            // Closed protocol: any other tag reaching the scanner is a
            // version mismatch.
            error!(%tab, tag = other.tag(), "unexpected message in scanner context");
            AutofillOutcome::failed(format!(
                "unexpected message in scanner context: {}",
                other.tag()
            ))
        }
    };

    if delivery.respond(&AutofillMessage::result(outcome)).is_err() {
        debug!(%tab, "caller went away before the scan result was sent");
    }
}

/// One scan-and-fill pass: discover fields, fetch the mapping from the
/// coordinator, apply it.
async fn scan_and_fill(
    driver: &dyn PageDriver,
    coordinator: &Endpoint,
) -> Result<AutofillOutcome, ScannerError> {
    let document = driver.snapshot().await?;
    let fields = scan_form_fields(&document);

    if fields.is_empty() {
        // Terminal negative result, not a retry.
        return Ok(AutofillOutcome::failed("no form fields found on this page"));
    }
    info!(count = fields.len(), "discovered form fields");

    for field in fields.iter().filter(|f| f.needs_id) {
        driver.assign_id(field.node, &field.descriptor.id).await?;
    }

    let descriptors: Vec<_> = fields.into_iter().map(|f| f.descriptor).collect();
    let reply = coordinator
        .request(&AutofillMessage::AutofillRequest {
            fields: descriptors,
        })
        .await?;

    let mapping = match reply {
        AutofillMessage::AutofillResponse { mapping } => mapping,
        other => {
            return Ok(AutofillOutcome::failed(format!(
                "unexpected reply to autofill request: {}",
                other.tag()
            )));
        }
    };

    let filled = fill_fields(driver, &mapping).await?;
    info!(filled, "applied field mapping");
    Ok(AutofillOutcome::filled(filled))
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
