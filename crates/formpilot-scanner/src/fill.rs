//! Applying a field mapping to the live page.

use tracing::debug;

use formpilot_protocols::error::ScannerError;
use formpilot_protocols::message::FieldMapping;

use crate::page::{ControlKind, PageDriver};

/// Write mapped values into the page, returning the count of fields
/// actually written.
///
/// Per-field failures never abort the whole fill: empty values, ids with
/// no matching element and select values that match no option are skipped
/// and do not count.
pub async fn fill_fields(
    driver: &dyn PageDriver,
    mapping: &FieldMapping,
) -> Result<u32, ScannerError> {
    let mut filled = 0u32;

    for (field_id, value) in mapping {
        if value.is_empty() {
            continue;
        }

        let Some(kind) = driver.lookup(field_id).await? else {
            debug!(field = %field_id, "mapping references a missing element, skipping");
            continue;
        };

        match kind {
            ControlKind::Select => {
                let options = driver.select_options(field_id).await?;
                // Exact match on visible text or underlying value only.
                match options.iter().find(|o| o.text == *value || o.value == *value) {
                    Some(option) => {
                        driver.set_select_value(field_id, &option.value).await?;
                        filled += 1;
                    }
                    None => {
                        debug!(field = %field_id, "no option matches the mapped value, skipping");
                    }
                }
            }
            ControlKind::Text => {
                driver.set_text_value(field_id, value).await?;
                filled += 1;
            }
        }
    }

    Ok(filled)
}

#[cfg(test)]
#[path = "fill_tests.rs"]
mod tests;
