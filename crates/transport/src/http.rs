//! HTTP access to the remote mod store
//!
//! Resource layout on the server:
//! - `GET {base}/manifest.json` — flat JSON object, filename to hex digest
//! - `GET {base}/mods/{filename}` — raw file bytes
//! - `GET {base}` — availability probe target

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use modsync_core::{Manifest, Result, SyncError};

use crate::RemoteStore;

/// Well-known manifest resource path
pub const MANIFEST_PATH: &str = "manifest.json";

/// Remote subpath that serves file bytes
pub const FILES_PATH: &str = "mods";

/// Availability probe timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a reachability probe; failures collapse into `online: false`
/// with a human-readable cause, this never errors.
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    /// Whether the server answered with a success status within the timeout
    pub online: bool,
    /// The probed address
    pub url: String,
    /// Cause when offline (timeout, refused connection, HTTP status)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// HTTP client for one configured remote endpoint
///
/// Owns the base address for the process lifetime; individual sync
/// operations borrow it.
pub struct HttpStore {
    client: reqwest::Client,
    base: String,
}

impl HttpStore {
    /// Create a store for the given base address
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// The configured base address
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// One bounded request against the base address; any success status
    /// within the timeout counts as online.
    pub async fn probe(&self) -> Availability {
        debug!(url = %self.base, "probing server availability");
        let response = self
            .client
            .get(&self.base)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => Availability {
                online: true,
                url: self.base.clone(),
                error: None,
            },
            Ok(resp) => Availability {
                online: false,
                url: self.base.clone(),
                error: Some(format!("HTTP {}", resp.status())),
            },
            Err(e) => Availability {
                online: false,
                url: self.base.clone(),
                error: Some(e.to_string()),
            },
        }
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        let url = self.url(MANIFEST_PATH);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Unreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| SyncError::Unreachable {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        // Reachable but malformed is a distinct, stronger signal.
        let manifest =
            Manifest::from_json(&body).map_err(|e| SyncError::InvalidManifest {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        debug!(url = %url, files = manifest.len(), "fetched remote manifest");
        Ok(manifest)
    }

    async fn fetch_file(&self, name: &str) -> Result<Bytes> {
        let url = format!("{}/{}/{}", self.base, FILES_PATH, name);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Unreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.bytes().await.map_err(|e| SyncError::Unreachable {
            url,
            reason: e.to_string(),
        })
    }
}
