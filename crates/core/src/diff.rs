//! Pure manifest comparison producing a sync plan
//!
//! The remote manifest is authoritative: anything it lists that differs
//! locally gets downloaded, anything local it does not list gets deleted.

use serde::Serialize;

use crate::manifest::Manifest;

/// The minimal set of changes to bring a directory in line with the remote
///
/// The two sets are disjoint by construction and sorted by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    /// Files to fetch from the remote store (new or stale locally)
    pub to_download: Vec<String>,
    /// Local files absent from the remote manifest
    pub to_delete: Vec<String>,
}

impl SyncPlan {
    /// Whether the directory is already in sync
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_download.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of planned operations
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_download.len() + self.to_delete.len()
    }
}

/// Compare a local snapshot against the authoritative remote manifest.
///
/// A file present in both with matching digests is untouched. An empty remote
/// manifest plans a full wipe of the local directory; that is intended.
#[must_use]
pub fn diff(local: &Manifest, remote: &Manifest) -> SyncPlan {
    let mut to_download = Vec::new();
    for (name, remote_digest) in remote.iter() {
        match local.get(name) {
            Some(local_digest) if local_digest == remote_digest => {}
            _ => to_download.push(name.clone()),
        }
    }

    let mut to_delete = Vec::new();
    for name in local.file_names() {
        if !remote.contains(name) {
            to_delete.push(name.clone());
        }
    }

    // BTreeMap iteration keeps both lists sorted by filename.
    SyncPlan {
        to_download,
        to_delete,
    }
}
