//! # Formpilot Coordinator
//!
//! The privileged side of the autofill pipeline. The coordinator has no
//! DOM access of its own: it owns tab discovery over the Chrome DevTools
//! endpoint, injects the scanner into the active tab, retries delivery
//! until the scanner's listener is up, and turns scanned fields into a
//! field-to-value mapping by prompting the inference service.

pub mod browser;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod delivery;
pub mod mapper;
pub mod prompt;
pub mod store;
pub mod types;

pub use browser::{ChromeTabHost, PageInfo, TabHost};
pub use client::GeminiClient;
pub use config::Settings;
pub use coordinator::Coordinator;
pub use delivery::{retry, Backoff, RetryPolicy};
pub use mapper::{Mapper, DEFAULT_MODEL};
pub use store::{FileStore, MemoryStore};
