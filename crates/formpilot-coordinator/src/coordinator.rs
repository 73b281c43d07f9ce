//! The coordinator task: owns an autofill run from trigger to outcome.

use std::sync::Arc;

use tracing::{error, info, warn};

use formpilot_protocols::bus::{self, Delivery, Endpoint, TabId};
use formpilot_protocols::error::{BusError, CoordinatorError};
use formpilot_protocols::message::{AutofillMessage, AutofillOutcome};
use formpilot_protocols::store::KeyValueStore;

use formpilot_scanner::ScannerRegistry;

use crate::browser::TabHost;
use crate::config::Settings;
use crate::delivery::{retry, RetryPolicy};
use crate::mapper::Mapper;

/// The privileged coordination task.
///
/// Every failure path resolves to a well-formed result message; nothing
/// here is fatal to the host process.
pub struct Coordinator {
    host: Arc<dyn TabHost>,
    mapper: Mapper,
    delivery: RetryPolicy,
    endpoint: Endpoint,
}

impl Coordinator {
    /// Spawn the coordinator task. The returned endpoint is the address
    /// the panel talks to, and the reply address handed to injected
    /// scanners.
    pub fn spawn(
        host: Arc<dyn TabHost>,
        store: Arc<dyn KeyValueStore>,
        settings: Settings,
    ) -> Endpoint {
        let (endpoint, mut inbox) = bus::mailbox();
        let coordinator = Arc::new(Self {
            host,
            mapper: Mapper::new(store, settings.inference),
            delivery: settings.delivery.policy(),
            endpoint: endpoint.clone(),
        });

        tokio::spawn(async move {
            while let Some(delivery) = inbox.next().await {
                // Handlers interleave: the scanner's AUTOFILL_REQUEST
                // arrives while its START_AUTOFILL is still being served.
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.handle_delivery(delivery).await });
            }
        });

        endpoint
    }

    async fn handle_delivery(&self, delivery: Delivery) {
        let message = match delivery.message() {
            Ok(message) => message,
            Err(e) => {
                error!(%e, "coordinator received a malformed message");
                let _ = delivery.respond(&AutofillMessage::result(AutofillOutcome::failed(
                    format!("malformed message: {e}"),
                )));
                return;
            }
        };

        let reply = match message {
            AutofillMessage::StartAutofill => {
                AutofillMessage::result(self.handle_start_autofill().await)
            }
            AutofillMessage::AutofillRequest { fields } => AutofillMessage::AutofillResponse {
                mapping: self.mapper.map_fields(&fields).await,
            },
            other => {
                // Closed protocol: anything else reaching the coordinator
                // is a version mismatch.
                error!(tag = other.tag(), "unexpected message in coordinator context");
                AutofillMessage::result(AutofillOutcome::failed(format!(
                    "unexpected message in coordinator context: {}",
                    other.tag()
                )))
            }
        };

        if delivery.respond(&reply).is_err() {
            warn!("caller went away before the reply was sent");
        }
    }

    /// Run one autofill, folding every error into a failed outcome with a
    /// human-readable message.
    async fn handle_start_autofill(&self) -> AutofillOutcome {
        match self.run_autofill().await {
            Ok(outcome) => outcome,
            Err(e) => AutofillOutcome::failed(e.to_string()),
        }
    }

    async fn run_autofill(&self) -> Result<AutofillOutcome, CoordinatorError> {
        let tab = self
            .host
            .active_tab()
            .await?
            .ok_or(CoordinatorError::NoActiveTab)?;
        info!(%tab, "starting autofill run");

        self.host
            .inject_scanner(&tab, self.endpoint.clone())
            .await?;

        let reply = self.deliver_scan_and_fill(&tab).await?;
        match reply {
            AutofillMessage::AutofillResult {
                success,
                filled_count,
                error,
            } => {
                info!(%tab, success, filled_count, "autofill run finished");
                Ok(AutofillOutcome {
                    success,
                    filled_count,
                    error,
                })
            }
            other => Ok(AutofillOutcome::failed(format!(
                "unexpected reply from scanner: {}",
                other.tag()
            ))),
        }
    }

    /// Deliver SCAN_AND_FILL with bounded retry. The endpoint is looked
    /// up fresh on every attempt because the just-injected scanner
    /// registers its listener asynchronously.
    async fn deliver_scan_and_fill(
        &self,
        tab: &TabId,
    ) -> Result<AutofillMessage, CoordinatorError> {
        let tab_id = tab.clone();
        retry(
            &self.delivery,
            move || {
                let tab = tab_id.clone();
                async move {
                    let endpoint = ScannerRegistry::global()
                        .endpoint(&tab)
                        .ok_or(BusError::NotListening)?;
                    endpoint.request(&AutofillMessage::ScanAndFill).await
                }
            },
            |e| matches!(e, BusError::NotListening),
        )
        .await
        .map_err(|e| match e {
            BusError::NotListening => CoordinatorError::ScannerUnresponsive {
                attempts: self.delivery.max_attempts,
            },
            other => CoordinatorError::Bus(other),
        })
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
