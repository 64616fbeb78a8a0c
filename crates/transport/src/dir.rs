//! Directory-backed store for tests
//!
//! Serves the same contract as `HttpStore` from a plain local directory,
//! letting executor and ops tests run without a network.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use modsync_core::{build_local, Manifest, Result, SyncError};

use crate::RemoteStore;

/// In-process store that treats a directory as the remote file server
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store serving files from `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl RemoteStore for DirStore {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        build_local(&self.root).await
    }

    async fn fetch_file(&self, name: &str) -> Result<Bytes> {
        let path = self.root.join(name);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            // Mirror the HTTP store's 404 for a file the manifest no longer has
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SyncError::Status {
                url: path.display().to_string(),
                status: 404,
            }),
            Err(source) => Err(SyncError::File { path, source }),
        }
    }
}
