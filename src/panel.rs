//! Panel controller: the user-facing trigger for an autofill run.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use formpilot_protocols::bus::Endpoint;
use formpilot_protocols::message::{AutofillMessage, AutofillOutcome};

/// Issues at most one outstanding START_AUTOFILL at a time and surfaces
/// the resulting count or error verbatim.
pub struct PanelController {
    coordinator: Endpoint,
    in_flight: AtomicBool,
}

impl PanelController {
    pub fn new(coordinator: Endpoint) -> Self {
        Self {
            coordinator,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Trigger a run; refused while another one is outstanding.
    pub async fn trigger_autofill(&self) -> AutofillOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return AutofillOutcome::failed("an autofill run is already in progress");
        }

        debug!("panel triggering autofill");
        let outcome = match self
            .coordinator
            .request(&AutofillMessage::StartAutofill)
            .await
        {
            Ok(reply) => reply.into_outcome().unwrap_or_else(|| {
                AutofillOutcome::failed("unexpected reply from coordinator")
            }),
            Err(e) => AutofillOutcome::failed(format!("failed to reach coordinator: {e}")),
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}
