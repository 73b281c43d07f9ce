//! # Formpilot Protocols
//!
//! Shared protocol definitions for the Formpilot autofill pipeline.
//! Contains the message union exchanged between the three execution
//! contexts (panel, coordinator, page scanner), the serialized
//! request-reply bus they talk over, the persistence trait and the
//! per-domain error types. No component logic lives here.

pub mod bus;
pub mod error;
pub mod message;
pub mod store;

pub use bus::{mailbox, Delivery, Endpoint, Mailbox, TabId};
pub use error::{BusError, CoordinatorError, ProviderError, ScannerError, StoreError};
pub use message::{AutofillMessage, AutofillOutcome, FieldMapping, FormFieldDescriptor};
pub use store::KeyValueStore;
