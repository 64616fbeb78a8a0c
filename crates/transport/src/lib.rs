//! modsync-transport: remote store access and sync execution
//!
//! Fetches the authoritative manifest and file bytes from the mod server and
//! applies sync plans to the local filesystem.

pub mod dir;
pub mod http;
pub mod ops;
pub mod sync;

pub use dir::DirStore;
pub use http::{Availability, HttpStore};
pub use ops::{ExportOutcome, Session};
pub use sync::{execute, SyncReport};

use async_trait::async_trait;
use bytes::Bytes;

use modsync_core::{Manifest, Result};

/// Read-only access to the authoritative file store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the authoritative filename-to-digest manifest.
    async fn fetch_manifest(&self) -> Result<Manifest>;

    /// Fetch the raw bytes of a single file.
    async fn fetch_file(&self, name: &str) -> Result<Bytes>;
}
