//! Operation surface consumed by the CLI
//!
//! One method per user-facing operation. Every failure is a structured
//! `SyncError`; nothing unwinds past this boundary and nothing is retried.

use std::path::{Path, PathBuf};

use tracing::info;

use modsync_core::{build_local, diff, Config, Result, SyncError, SyncPlan};

use crate::http::{Availability, HttpStore};
use crate::sync::{execute, SyncReport};
use crate::RemoteStore;

/// Outcome of a manifest export
#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Manifest written to the chosen destination
    Written(PathBuf),
    /// Destination choice declined; a terminal non-error outcome
    Cancelled,
}

/// Process-wide session: the configuration plus the remote endpoint
///
/// Built once at startup from the loaded config; the HTTP client lives for
/// the whole process while each operation call borrows it.
pub struct Session {
    config: Config,
    store: Option<HttpStore>,
}

impl Session {
    /// Create a session from the startup configuration
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = config.server_url.as_deref().map(HttpStore::new);
        Self { config, store }
    }

    fn store(&self) -> Result<&HttpStore> {
        self.store.as_ref().ok_or(SyncError::NotConfigured)
    }

    /// The configured sync directory, if one was ever selected
    #[must_use]
    pub fn game_dir(&self) -> Option<&Path> {
        self.config.game_dir.as_deref()
    }

    /// Probe the server; fails fast only when no URL is configured.
    ///
    /// # Errors
    /// Returns `NotConfigured` if no server URL is set.
    pub async fn check_availability(&self) -> Result<Availability> {
        Ok(self.store()?.probe().await)
    }

    /// Compute the sync plan for `dir` without mutating anything.
    ///
    /// The local hash pass and the remote fetch run concurrently; the former
    /// touches only the filesystem, the latter only the network.
    ///
    /// # Errors
    /// Returns an error if the local build or the manifest fetch fails.
    pub async fn compare(&self, dir: &Path) -> Result<SyncPlan> {
        let store = self.store()?;
        let (local, remote) = tokio::join!(build_local(dir), store.fetch_manifest());
        Ok(diff(&local?, &remote?))
    }

    /// Build the manifest for `dir` and write it to `dest`.
    ///
    /// A `None` destination means the caller declined to choose one; the
    /// manifest is still built but nothing is written.
    ///
    /// # Errors
    /// Returns an error if the build or the write fails.
    pub async fn export_manifest(
        &self,
        dir: &Path,
        dest: Option<PathBuf>,
    ) -> Result<ExportOutcome> {
        let manifest = build_local(dir).await?;
        match dest {
            Some(path) => {
                manifest.export(&path)?;
                info!(dest = %path.display(), files = manifest.len(), "exported manifest");
                Ok(ExportOutcome::Written(path))
            }
            None => Ok(ExportOutcome::Cancelled),
        }
    }

    /// Compare and then apply the plan to `dir`.
    ///
    /// # Errors
    /// Returns the first failure; partially applied work is not rolled back.
    pub async fn execute_sync(&self, dir: &Path) -> Result<SyncReport> {
        let store = self.store()?;
        let (local, remote) = tokio::join!(build_local(dir), store.fetch_manifest());
        let plan = diff(&local?, &remote?);
        info!(
            downloads = plan.to_download.len(),
            deletions = plan.to_delete.len(),
            "sync plan ready"
        );
        execute(store, dir, &plan).await
    }
}
