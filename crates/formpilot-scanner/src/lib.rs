//! # Formpilot Scanner
//!
//! The page-embedded side of the autofill pipeline. The scanner owns DOM
//! access for one tab: it discovers fillable form fields, serializes them
//! for the coordinator, and applies the returned field-to-value mapping to
//! the live page in a way that reactive front-ends observe (native value
//! setter plus synthetic input/change/blur events).
//!
//! The scanner knows nothing about the inference service or persistence.

pub mod cdp;
pub mod discovery;
pub mod dom;
pub mod fake;
pub mod fill;
pub mod listener;
pub mod page;

pub use cdp::CdpPage;
pub use discovery::{scan_form_fields, DiscoveredField};
pub use dom::{DomNode, NodeIndex, PageDocument};
pub use fill::fill_fields;
pub use listener::{inject, ScannerRegistry};
pub use page::{ControlKind, PageDriver, SelectOption};
