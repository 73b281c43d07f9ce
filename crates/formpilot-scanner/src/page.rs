//! The DOM access seam between the scanner and a live page.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use formpilot_protocols::error::ScannerError;

use crate::dom::{NodeIndex, PageDocument};

/// What kind of control an element id resolves to when filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// input/textarea, filled through the native value setter.
    Text,
    /// select, filled by matching an option.
    Select,
}

/// One selectable option of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Underlying submit value. Falls back to the option text when the
    /// element has no value attribute, per DOM semantics.
    pub value: String,
    /// Visible text.
    pub text: String,
}

/// Live-page access used by the scanner.
///
/// The production implementation drives a real tab over CDP
/// ([`crate::cdp::CdpPage`]); tests use the in-memory
/// [`crate::fake::FakePage`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Capture a snapshot of the page's element tree.
    async fn snapshot(&self) -> Result<PageDocument, ScannerError>;

    /// Write an id onto the element stamped with `node` during the walk.
    async fn assign_id(&self, node: NodeIndex, id: &str) -> Result<(), ScannerError>;

    /// Resolve an element id to a fillable control, `None` when the
    /// element is missing or not fillable.
    async fn lookup(&self, id: &str) -> Result<Option<ControlKind>, ScannerError>;

    /// Options of a select control, in document order.
    async fn select_options(&self, id: &str) -> Result<Vec<SelectOption>, ScannerError>;

    /// Set a select control's value and emit a change notification.
    async fn set_select_value(&self, id: &str, value: &str) -> Result<(), ScannerError>;

    /// Assign a text-like control through the element's native property
    /// setter, then dispatch input, change and blur in that order.
    ///
    /// Reactive front-ends intercept naive value assignment and either
    /// miss or revert it; only the platform setter plus the synthetic
    /// events they listen for makes the write stick.
    async fn set_text_value(&self, id: &str, value: &str) -> Result<(), ScannerError>;
}
