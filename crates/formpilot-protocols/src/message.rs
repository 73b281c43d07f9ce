//! Message types exchanged between the panel, coordinator and scanner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field id -> replacement value. An absent key means "do not touch this
/// field."
pub type FieldMapping = BTreeMap<String, String>;

/// A serializable snapshot of one discovered form field.
///
/// Absence of an attribute is signaled by an empty string, never by
/// omitting the field; `id` is unique within one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldDescriptor {
    /// Unique within the page; synthetic when the element had no id.
    pub id: String,

    /// Lowercase element tag (`input`, `textarea`, `select`).
    pub tag_name: String,

    /// The input's type attribute, or the tag name for non-input elements.
    #[serde(rename = "type")]
    pub field_type: String,

    pub name: String,

    /// Best-effort human-readable label, empty string when none resolves.
    pub label: String,

    pub placeholder: String,

    pub autocomplete: String,

    /// Ordered visible option texts; empty unless a selection control.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Terminal outcome of one autofill run, the only value surfaced to the
/// user-facing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillOutcome {
    pub success: bool,

    pub filled_count: u32,

    /// Present iff `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AutofillOutcome {
    /// Successful run that wrote `count` fields.
    pub fn filled(count: u32) -> Self {
        Self {
            success: true,
            filled_count: count,
            error: None,
        }
    }

    /// Failed run with a human-readable message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            filled_count: 0,
            error: Some(error.into()),
        }
    }
}

/// The closed message union routed between the three contexts.
///
/// Routing is by tag alone; messages are immutable once constructed and
/// carry no back-reference to their sender. The enum is closed: an
/// unrecognized tag is a protocol version mismatch and fails
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AutofillMessage {
    /// Panel -> Coordinator: trigger one autofill run.
    #[serde(rename = "START_AUTOFILL")]
    StartAutofill,

    /// Coordinator -> Scanner: scan the page and fill it.
    #[serde(rename = "SCAN_AND_FILL")]
    ScanAndFill,

    /// Scanner -> Coordinator: discovered fields needing a mapping.
    #[serde(rename = "AUTOFILL_REQUEST")]
    AutofillRequest { fields: Vec<FormFieldDescriptor> },

    /// Coordinator -> Scanner: the field-to-value mapping to apply.
    #[serde(rename = "AUTOFILL_RESPONSE")]
    AutofillResponse { mapping: FieldMapping },

    /// Scanner -> Coordinator -> Panel: terminal outcome of the run.
    #[serde(rename = "AUTOFILL_RESULT", rename_all = "camelCase")]
    AutofillResult {
        success: bool,
        filled_count: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl AutofillMessage {
    /// Wrap an outcome as its wire message.
    pub fn result(outcome: AutofillOutcome) -> Self {
        Self::AutofillResult {
            success: outcome.success,
            filled_count: outcome.filled_count,
            error: outcome.error,
        }
    }

    /// The wire tag of this message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::StartAutofill => "START_AUTOFILL",
            Self::ScanAndFill => "SCAN_AND_FILL",
            Self::AutofillRequest { .. } => "AUTOFILL_REQUEST",
            Self::AutofillResponse { .. } => "AUTOFILL_RESPONSE",
            Self::AutofillResult { .. } => "AUTOFILL_RESULT",
        }
    }

    /// Unwrap a result message into its outcome.
    pub fn into_outcome(self) -> Option<AutofillOutcome> {
        match self {
            Self::AutofillResult {
                success,
                filled_count,
                error,
            } => Some(AutofillOutcome {
                success,
                filled_count,
                error,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
