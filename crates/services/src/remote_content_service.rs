use std::env;

use reqwest::Client;
use serde::Deserialize;

use crate::error::RemoteContentError;

/// Catalog descriptor a future content backend would serve.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteCatalog {
    pub content_version: u32,
    pub subjects: Vec<String>,
}

/// Placeholder for remote content updates.
///
/// There is no backend yet: without `READER_REMOTE_URL` the service is
/// disabled and every fetch resolves to `None`. The core never consults
/// this service.
#[derive(Clone)]
pub struct RemoteContentService {
    client: Client,
    base_url: Option<String>,
}

impl RemoteContentService {
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("READER_REMOTE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        Self::new(base_url)
    }

    #[must_use]
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.base_url.is_some()
    }

    /// Fetch the remote catalog. Disabled, absent, or empty responses all
    /// resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteContentError` for transport failures or unexpected
    /// HTTP statuses.
    pub async fn fetch_catalog(&self) -> Result<Option<RemoteCatalog>, RemoteContentError> {
        let Some(base_url) = &self.base_url else {
            return Ok(None);
        };

        let url = format!("{}/catalog", base_url.trim_end_matches('/'));
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RemoteContentError::HttpStatus(status));
        }

        Ok(response.json().await.ok())
    }
}
