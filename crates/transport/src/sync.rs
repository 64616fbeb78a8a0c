//! Applies a sync plan against the local directory
//!
//! Downloads and deletions all run concurrently. The plan's two sets are
//! disjoint, so the tasks touch disjoint paths and need no locking. The join
//! is all-or-nothing: every started task runs to completion, then the first
//! failure (downloads before deletions) decides the overall result. Work that
//! finished before a failing sibling is NOT rolled back; the directory may be
//! left partially updated. Writes are plain overwrites, not temp-then-rename.

use std::path::Path;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use modsync_core::{manifest, Result, SyncError, SyncPlan};

use crate::RemoteStore;

/// Result of a fully successful sync execution
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Files fetched from the remote store, sorted by name
    pub downloaded: Vec<String>,
    /// Obsolete local files removed, sorted by name
    pub deleted: Vec<String>,
}

/// Execute `plan` in `dir`, fetching file bytes from `store`.
///
/// # Errors
/// Returns the first download or deletion failure after all in-flight
/// operations have completed. On error, sibling operations that already
/// succeeded are left in place.
pub async fn execute<S>(store: &S, dir: &Path, plan: &SyncPlan) -> Result<SyncReport>
where
    S: RemoteStore + ?Sized,
{
    // Plan names come from validated manifests, but the join below writes to
    // dir/{name}, so re-check the plain-filename invariant at the boundary.
    for name in plan.to_download.iter().chain(&plan.to_delete) {
        if !manifest::is_clean_name(name) {
            return Err(SyncError::InvalidFileName { name: name.clone() });
        }
    }

    let downloads = plan.to_download.iter().map(|name| {
        let path = dir.join(name);
        async move {
            let data = store.fetch_file(name).await?;
            let len = data.len();
            if let Err(source) = tokio::fs::write(&path, &data).await {
                return Err(SyncError::File { path, source });
            }
            debug!(file = %name, bytes = len, "downloaded");
            Ok(())
        }
    });

    let deletions = plan.to_delete.iter().map(|name| {
        let path = dir.join(name);
        async move {
            if let Err(source) = tokio::fs::remove_file(&path).await {
                return Err(SyncError::File { path, source });
            }
            debug!(file = %name, "deleted");
            Ok(())
        }
    });

    let (download_results, deletion_results) =
        tokio::join!(join_all(downloads), join_all(deletions));

    for result in download_results.into_iter().chain(deletion_results) {
        result?;
    }

    info!(
        downloaded = plan.to_download.len(),
        deleted = plan.to_delete.len(),
        "sync complete"
    );

    Ok(SyncReport {
        downloaded: plan.to_download.clone(),
        deleted: plan.to_delete.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DirStore;
    use modsync_core::{build_local, diff};
    use tempfile::TempDir;

    async fn plan_between(local: &TempDir, remote: &TempDir) -> SyncPlan {
        let local_manifest = build_local(local.path()).await.unwrap();
        let remote_manifest = build_local(remote.path()).await.unwrap();
        diff(&local_manifest, &remote_manifest)
    }

    #[tokio::test]
    async fn test_execute_downloads_and_deletes() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        std::fs::write(local.path().join("a.txt"), "same").unwrap();
        std::fs::write(local.path().join("b.txt"), "obsolete").unwrap();
        std::fs::write(remote.path().join("a.txt"), "same").unwrap();
        std::fs::write(remote.path().join("c.txt"), "fresh").unwrap();

        let plan = plan_between(&local, &remote).await;
        let store = DirStore::new(remote.path());
        let report = execute(&store, local.path(), &plan).await.unwrap();

        assert_eq!(report.downloaded, vec!["c.txt"]);
        assert_eq!(report.deleted, vec!["b.txt"]);

        // Directory ends up exactly {a.txt, c.txt}
        assert!(local.path().join("a.txt").exists());
        assert!(local.path().join("c.txt").exists());
        assert!(!local.path().join("b.txt").exists());
        assert_eq!(
            std::fs::read_to_string(local.path().join("c.txt")).unwrap(),
            "fresh"
        );
    }

    #[tokio::test]
    async fn test_execute_overwrites_stale_content() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        std::fs::write(local.path().join("mod.pak"), "old").unwrap();
        std::fs::write(remote.path().join("mod.pak"), "new").unwrap();

        let plan = plan_between(&local, &remote).await;
        assert_eq!(plan.to_download, vec!["mod.pak"]);

        let store = DirStore::new(remote.path());
        execute(&store, local.path(), &plan).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(local.path().join("mod.pak")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn test_empty_remote_wipes_local() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        std::fs::write(local.path().join("a.txt"), "a").unwrap();
        std::fs::write(local.path().join("b.txt"), "b").unwrap();

        let plan = plan_between(&local, &remote).await;
        let store = DirStore::new(remote.path());
        let report = execute(&store, local.path(), &plan).await.unwrap();

        assert_eq!(report.deleted, vec!["a.txt", "b.txt"]);
        assert_eq!(std::fs::read_dir(local.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_plan_is_a_noop() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        std::fs::write(local.path().join("a.txt"), "a").unwrap();
        std::fs::write(remote.path().join("a.txt"), "a").unwrap();

        let plan = plan_between(&local, &remote).await;
        assert!(plan.is_empty());

        let store = DirStore::new(remote.path());
        let report = execute(&store, local.path(), &plan).await.unwrap();
        assert!(report.downloaded.is_empty());
        assert!(report.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_fails_fast_without_rollback() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        std::fs::write(remote.path().join("x.txt"), "x").unwrap();
        std::fs::write(remote.path().join("z.txt"), "z").unwrap();

        // Plan asks for a file the store can no longer serve.
        let plan = SyncPlan {
            to_download: vec!["x.txt".into(), "y.txt".into(), "z.txt".into()],
            to_delete: vec![],
        };

        let store = DirStore::new(remote.path());
        let err = execute(&store, local.path(), &plan).await.unwrap_err();
        assert!(
            matches!(err, SyncError::Status { status: 404, .. }),
            "{err}"
        );

        // Successful siblings stay on disk; nothing is rolled back.
        assert!(local.path().join("x.txt").exists());
        assert!(local.path().join("z.txt").exists());
        assert!(!local.path().join("y.txt").exists());
    }

    #[tokio::test]
    async fn test_dirty_plan_names_are_rejected_before_io() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();

        let plan = SyncPlan {
            to_download: vec!["../escape.txt".into()],
            to_delete: vec![],
        };

        let store = DirStore::new(remote.path());
        let err = execute(&store, local.path(), &plan).await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidFileName { .. }), "{err}");
    }
}
