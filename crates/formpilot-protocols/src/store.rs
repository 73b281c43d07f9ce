//! Key-value persistence protocol.

use async_trait::async_trait;

use crate::error::StoreError;

/// Keys the autofill pipeline reads. Written only by the panel layer.
pub mod keys {
    /// Plain text extracted from the user's resume.
    pub const RESUME_TEXT: &str = "resume_content";

    /// Original filename of the stored resume.
    pub const RESUME_FILENAME: &str = "resume_filename";

    /// Gemini API credential.
    pub const API_KEY: &str = "gemini_api_key";

    /// Selected model identifier override.
    pub const MODEL: &str = "gemini_model";
}

/// Core trait for key-value stores.
///
/// Scoped per installation; values survive restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never set.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key; removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
