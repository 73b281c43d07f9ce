//! Chrome DevTools endpoint discovery and tab access.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use formpilot_protocols::bus::{Endpoint, TabId};
use formpilot_protocols::error::CoordinatorError;

use formpilot_scanner::cdp::CdpPage;

/// One debuggable target reported by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,

    #[serde(rename = "type")]
    pub target_type: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(rename = "webSocketDebuggerUrl", default)]
    pub ws_url: String,
}

/// Privileged tab access owned by the coordinator.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The single active, focused tab, if any.
    async fn active_tab(&self) -> Result<Option<TabId>, CoordinatorError>;

    /// Inject the scanner into `tab`, wiring its requests back to
    /// `coordinator`. Idempotent: repeated injection replaces the
    /// previously registered listener.
    async fn inject_scanner(
        &self,
        tab: &TabId,
        coordinator: Endpoint,
    ) -> Result<(), CoordinatorError>;
}

/// Tab host over a local Chrome debugging endpoint.
pub struct ChromeTabHost {
    http_endpoint: String,
    client: reqwest::Client,
}

impl ChromeTabHost {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// All debuggable pages. Chrome orders them by focus recency, most
    /// recently focused first.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CoordinatorError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let pages = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoordinatorError::Browser(format!("{url}: {e}")))?
            .json::<Vec<PageInfo>>()
            .await
            .map_err(|e| CoordinatorError::Browser(format!("{url}: {e}")))?;
        Ok(pages)
    }
}

#[async_trait]
impl TabHost for ChromeTabHost {
    async fn active_tab(&self) -> Result<Option<TabId>, CoordinatorError> {
        let pages = self.list_pages().await?;
        Ok(pages
            .into_iter()
            .find(|p| p.target_type == "page")
            .map(|p| p.id))
    }

    async fn inject_scanner(
        &self,
        tab: &TabId,
        coordinator: Endpoint,
    ) -> Result<(), CoordinatorError> {
        let pages = self.list_pages().await?;
        let page = pages
            .into_iter()
            .find(|p| p.id == *tab)
            .ok_or_else(|| CoordinatorError::Injection(format!("tab {tab} is gone")))?;

        if page.ws_url.is_empty() {
            return Err(CoordinatorError::Injection(format!(
                "tab {tab} exposes no debugger endpoint"
            )));
        }

        let driver = CdpPage::connect(&page.ws_url)
            .await
            .map_err(|e| CoordinatorError::Injection(e.to_string()))?;

        debug!(%tab, url = %page.url, "injecting scanner");
        formpilot_scanner::inject(tab.clone(), Arc::new(driver), coordinator);
        Ok(())
    }
}
