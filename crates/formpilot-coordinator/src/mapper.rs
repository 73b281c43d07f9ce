//! Field-to-value mapping through the inference service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use formpilot_protocols::message::{FieldMapping, FormFieldDescriptor};
use formpilot_protocols::store::{keys, KeyValueStore};

use crate::client::GeminiClient;
use crate::config::InferenceSettings;
use crate::prompt::build_autofill_prompt;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

/// Model used when no override is stored.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Turns scanned fields into a field-to-value mapping.
pub struct Mapper {
    store: Arc<dyn KeyValueStore>,
    settings: InferenceSettings,
}

impl Mapper {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: InferenceSettings) -> Self {
        Self { store, settings }
    }

    /// Produce a mapping for the scanned fields.
    ///
    /// Every inference failure degrades to an empty mapping: a missing
    /// credential, an unavailable endpoint or an unparsable reply all mean
    /// "fill nothing", never a failed run.
    pub async fn map_fields(&self, fields: &[FormFieldDescriptor]) -> FieldMapping {
        let resume = self.read(keys::RESUME_TEXT).await;
        let api_key = self.read(keys::API_KEY).await;
        let (Some(resume), Some(api_key)) = (resume, api_key) else {
            info!("resume or API key not configured, nothing to fill");
            return FieldMapping::new();
        };

        let model = self
            .read(keys::MODEL)
            .await
            .unwrap_or_else(|| self.settings.default_model.clone());

        let prompt = build_autofill_prompt(&resume, fields);
        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                temperature: Some(self.settings.temperature),
                max_output_tokens: None,
            }),
        };

        let client = match GeminiClient::new(api_key, self.settings.timeout()) {
            Ok(client) => client.with_base_url(&self.settings.base_url),
            Err(e) => {
                warn!(error = %e, "could not build inference client");
                return FieldMapping::new();
            }
        };

        debug!(model, fields = fields.len(), "requesting field mapping");
        let response = match client.generate_content(&model, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "inference request failed, returning empty mapping");
                return FieldMapping::new();
            }
        };

        let Some(text) = response.first_text() else {
            warn!("model returned an empty response, returning empty mapping");
            return FieldMapping::new();
        };

        match serde_json::from_str::<FieldMapping>(text) {
            Ok(mapping) => {
                debug!(entries = mapping.len(), "parsed field mapping");
                mapping
            }
            Err(e) => {
                warn!(error = %e, "model returned an unparsable mapping, returning empty mapping");
                FieldMapping::new()
            }
        }
    }

    /// Read a key, treating store failures and empty values as absent.
    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "store read failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod tests;
