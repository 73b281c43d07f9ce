//! Serialized request-reply bus between isolated execution contexts.
//!
//! The panel, coordinator and scanner never share memory: every
//! interaction crosses an [`Endpoint`] as a JSON payload and is answered
//! through a one-shot reply channel, mirroring how browser runtimes
//! deliver messages between extension contexts. Each call site keeps at
//! most one request in flight.

use tokio::sync::{mpsc, oneshot};

use crate::error::BusError;
use crate::message::AutofillMessage;

/// Identifier of a browser tab (a DevTools target id).
pub type TabId = String;

/// Mailbox depth. With one request in flight per call site this never
/// fills in practice.
const MAILBOX_CAPACITY: usize = 16;

/// A serialized message plus the channel its answer travels back on.
pub struct Delivery {
    payload: String,
    reply: oneshot::Sender<String>,
}

impl Delivery {
    /// Decode the payload into a protocol message.
    pub fn message(&self) -> Result<AutofillMessage, BusError> {
        serde_json::from_str(&self.payload).map_err(|e| BusError::Codec(e.to_string()))
    }

    /// Answer the sender. The reply is serialized before it crosses back.
    pub fn respond(self, message: &AutofillMessage) -> Result<(), BusError> {
        let payload =
            serde_json::to_string(message).map_err(|e| BusError::Codec(e.to_string()))?;
        self.reply
            .send(payload)
            .map_err(|_| BusError::ReplyDropped)
    }
}

/// Sending half of a context's mailbox. Cloneable; clones address the same
/// receiving context.
#[derive(Clone)]
pub struct Endpoint {
    tx: mpsc::Sender<Delivery>,
}

impl Endpoint {
    /// Send one message and await its reply.
    ///
    /// Fails with [`BusError::NotListening`] when the receiving context is
    /// gone or never answered, the retryable delivery failure the
    /// coordinator compensates for right after injection.
    pub async fn request(&self, message: &AutofillMessage) -> Result<AutofillMessage, BusError> {
        let payload =
            serde_json::to_string(message).map_err(|e| BusError::Codec(e.to_string()))?;
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(Delivery {
                payload,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BusError::NotListening)?;

        let raw = reply_rx.await.map_err(|_| BusError::NotListening)?;
        serde_json::from_str(&raw).map_err(|e| BusError::Codec(e.to_string()))
    }
}

/// Receiving half of a context's mailbox.
pub struct Mailbox {
    rx: mpsc::Receiver<Delivery>,
}

impl Mailbox {
    /// Await the next delivery; `None` once every endpoint is gone.
    pub async fn next(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }
}

/// Create a connected endpoint/mailbox pair.
pub fn mailbox() -> (Endpoint, Mailbox) {
    let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
    (Endpoint { tx }, Mailbox { rx })
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
