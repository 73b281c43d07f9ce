//! In-memory page driver for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use formpilot_protocols::error::ScannerError;

use crate::discovery::option_pairs;
use crate::dom::{NodeIndex, PageDocument};
use crate::page::{ControlKind, PageDriver, SelectOption};

/// A page driver backed by a [`PageDocument`] instead of a live tab.
///
/// Records every write so tests can assert values, event ordering and id
/// assignment.
pub struct FakePage {
    inner: Mutex<State>,
}

struct State {
    document: PageDocument,
    assigned: HashMap<NodeIndex, String>,
    values: HashMap<String, String>,
    events: Vec<(String, String)>,
    snapshot_calls: u32,
}

impl FakePage {
    pub fn new(document: PageDocument) -> Self {
        Self {
            inner: Mutex::new(State {
                document,
                assigned: HashMap::new(),
                values: HashMap::new(),
                events: Vec::new(),
                snapshot_calls: 0,
            }),
        }
    }

    /// The last value written to `id`, if any.
    pub fn value_of(&self, id: &str) -> Option<String> {
        self.inner.lock().values.get(id).cloned()
    }

    /// Events dispatched on `id`, in dispatch order.
    pub fn events_for(&self, id: &str) -> Vec<String> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|(target, _)| target == id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// All dispatched events as (element id, event name), in order.
    pub fn events(&self) -> Vec<(String, String)> {
        self.inner.lock().events.clone()
    }

    /// Ids written back onto elements that lacked one.
    pub fn assigned_ids(&self) -> Vec<String> {
        let state = self.inner.lock();
        let mut ids: Vec<_> = state.assigned.values().cloned().collect();
        ids.sort();
        ids
    }

    /// How many times the page was snapshot.
    pub fn snapshot_calls(&self) -> u32 {
        self.inner.lock().snapshot_calls
    }

    fn resolve(state: &State, id: &str) -> Option<NodeIndex> {
        state.document.element_by_id(id).or_else(|| {
            state
                .assigned
                .iter()
                .find(|(_, assigned)| assigned.as_str() == id)
                .map(|(&node, _)| node)
        })
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn snapshot(&self) -> Result<PageDocument, ScannerError> {
        let mut state = self.inner.lock();
        state.snapshot_calls += 1;
        Ok(state.document.clone())
    }

    async fn assign_id(&self, node: NodeIndex, id: &str) -> Result<(), ScannerError> {
        self.inner.lock().assigned.insert(node, id.to_string());
        Ok(())
    }

    async fn lookup(&self, id: &str) -> Result<Option<ControlKind>, ScannerError> {
        let state = self.inner.lock();
        let Some(node) = Self::resolve(&state, id) else {
            return Ok(None);
        };
        Ok(match state.document.node(node).tag.as_str() {
            "select" => Some(ControlKind::Select),
            "input" | "textarea" => Some(ControlKind::Text),
            _ => None,
        })
    }

    async fn select_options(&self, id: &str) -> Result<Vec<SelectOption>, ScannerError> {
        let state = self.inner.lock();
        let node = Self::resolve(&state, id)
            .ok_or_else(|| ScannerError::Page(format!("no element with id {id}")))?;
        Ok(option_pairs(&state.document, node))
    }

    async fn set_select_value(&self, id: &str, value: &str) -> Result<(), ScannerError> {
        let mut state = self.inner.lock();
        state.values.insert(id.to_string(), value.to_string());
        state.events.push((id.to_string(), "change".to_string()));
        Ok(())
    }

    async fn set_text_value(&self, id: &str, value: &str) -> Result<(), ScannerError> {
        let mut state = self.inner.lock();
        state.values.insert(id.to_string(), value.to_string());
        for event in ["input", "change", "blur"] {
            state.events.push((id.to_string(), event.to_string()));
        }
        Ok(())
    }
}
