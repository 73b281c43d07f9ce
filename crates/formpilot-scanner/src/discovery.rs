//! Form field discovery over a page snapshot.

use formpilot_protocols::message::FormFieldDescriptor;

use crate::dom::{NodeIndex, PageDocument};
use crate::page::SelectOption;

/// Input types with no free-text semantics.
const SKIP_TYPES: &[&str] = &[
    "hidden", "submit", "button", "file", "checkbox", "radio", "image", "reset",
];

const SYNTHETIC_ID_PREFIX: &str = "__autofill_field_";

/// A discovered field plus how to address its element in the live page.
#[derive(Debug, Clone)]
pub struct DiscoveredField {
    pub descriptor: FormFieldDescriptor,

    /// Snapshot node of the element.
    pub node: NodeIndex,

    /// True when the id is synthetic and must be written back to the page
    /// before filling.
    pub needs_id: bool,
}

/// Enumerate fillable fields in document order.
///
/// Synthetic ids use a counter scoped to this scan, so they never collide
/// within it; they are stable only for the lifetime of the page.
pub fn scan_form_fields(doc: &PageDocument) -> Vec<DiscoveredField> {
    let mut fields = Vec::new();
    let mut counter = 0u32;

    for index in doc.iter() {
        let node = doc.node(index);
        let tag = node.tag.as_str();
        if !matches!(tag, "input" | "textarea" | "select") {
            continue;
        }

        let field_type = if tag == "input" {
            node.attr("type").unwrap_or("text").to_ascii_lowercase()
        } else {
            tag.to_string()
        };
        if tag == "input" && SKIP_TYPES.contains(&field_type.as_str()) {
            continue;
        }

        if !node.rendered || doc.in_hidden_subtree(index) {
            continue;
        }

        let (id, needs_id) = match node.attr("id") {
            Some(id) if !id.is_empty() => (id.to_string(), false),
            _ => {
                let id = format!("{SYNTHETIC_ID_PREFIX}{counter}");
                counter += 1;
                (id, true)
            }
        };

        let descriptor = FormFieldDescriptor {
            id,
            tag_name: tag.to_string(),
            field_type,
            name: node.attr("name").unwrap_or_default().to_string(),
            label: resolve_label(doc, index),
            placeholder: node.attr("placeholder").unwrap_or_default().to_string(),
            autocomplete: node.attr("autocomplete").unwrap_or_default().to_string(),
            options: if tag == "select" {
                option_pairs(doc, index)
                    .into_iter()
                    .map(|o| if o.text.is_empty() { o.value } else { o.text })
                    .collect()
            } else {
                Vec::new()
            },
        };

        fields.push(DiscoveredField {
            descriptor,
            node: index,
            needs_id,
        });
    }

    fields
}

/// Label resolution in strict priority order; first non-empty match wins.
fn resolve_label(doc: &PageDocument, index: NodeIndex) -> String {
    let node = doc.node(index);

    // 1. Explicit <label for="id">.
    if let Some(id) = node.attr("id").filter(|v| !v.is_empty()) {
        if let Some(label) = doc.find_by_attr("label", "for", id) {
            let text = doc.text_content(label);
            if !text.is_empty() {
                return text;
            }
        }
    }

    // 2. Ancestor <label> wrapping the field.
    for ancestor in doc.ancestors(index) {
        if doc.node(ancestor).tag == "label" {
            let text = doc.text_content(ancestor);
            if !text.is_empty() {
                return text;
            }
        }
    }

    // 3. Element referenced by aria-labelledby.
    if let Some(target) = node.attr("aria-labelledby").filter(|v| !v.is_empty()) {
        if let Some(referent) = doc.element_by_id(target) {
            let text = doc.text_content(referent);
            if !text.is_empty() {
                return text;
            }
        }
    }

    // 4. aria-label attribute.
    if let Some(label) = node.attr("aria-label") {
        let label = label.trim();
        if !label.is_empty() {
            return label.to_string();
        }
    }

    // 5. Immediately preceding sibling element.
    if let Some(prev) = doc.preceding_sibling(index) {
        let text = doc.text_content(prev);
        if !text.is_empty() {
            return text;
        }
    }

    String::new()
}

/// Options of a select node with their effective values, in document
/// order. Options with an empty effective value (placeholder entries) are
/// excluded; optgroups are traversed.
pub(crate) fn option_pairs(doc: &PageDocument, select: NodeIndex) -> Vec<SelectOption> {
    let mut options = Vec::new();
    collect_options(doc, select, &mut options);
    options
}

fn collect_options(doc: &PageDocument, index: NodeIndex, out: &mut Vec<SelectOption>) {
    for &child in &doc.node(index).children {
        let node = doc.node(child);
        if node.tag == "option" {
            let text = doc.text_content(child);
            let value = node
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| text.clone());
            if !value.is_empty() {
                out.push(SelectOption { value, text });
            }
        } else {
            collect_options(doc, child, out);
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
