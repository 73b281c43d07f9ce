//! Resume text extraction.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

/// Extract plain text from a resume file. PDF documents go through the
/// PDF text extractor; anything else is read as UTF-8 text.
pub fn extract_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let text = match extension.as_deref() {
        Some("pdf") => pdf_extract::extract_text(path)
            .map_err(|e| anyhow!("failed to decode PDF {}: {e}", path.display()))?,
        _ => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    };

    if text.trim().is_empty() {
        bail!("no extractable text in {}", path.display());
    }
    Ok(text)
}
