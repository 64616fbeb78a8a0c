//! Directory manifests: filename to content digest
//!
//! A manifest is a point-in-time snapshot of the regular files directly
//! inside one directory. The JSON shape is a flat object mapping filename to
//! lowercase hex digest, identical on the wire and in export files.

use std::collections::BTreeMap;
use std::path::Path;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::hash::Digest;

/// A snapshot of a directory, keyed by plain filename
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    files: BTreeMap<String, Digest>,
}

/// Whether a manifest entry is a plain filename (no separators, no dot-dirs)
#[must_use]
pub fn is_clean_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

impl Manifest {
    /// Create an empty manifest
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous digest for the same name
    pub fn insert(&mut self, name: impl Into<String>, digest: Digest) {
        self.files.insert(name.into(), digest);
    }

    /// Look up a file's digest
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Digest> {
        self.files.get(name)
    }

    /// Whether the file exists in this snapshot
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate entries in filename order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Digest)> {
        self.files.iter()
    }

    /// Iterate filenames in order
    pub fn file_names(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    /// Parse a manifest from its JSON wire/file shape.
    ///
    /// # Errors
    /// Returns an error if the body is not a string-to-digest object, or if
    /// any key is not a plain filename.
    pub fn from_json(body: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(body)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check the plain-filename invariant for every entry.
    ///
    /// # Errors
    /// Returns the first offending name.
    pub fn validate(&self) -> Result<()> {
        for name in self.files.keys() {
            if !is_clean_name(name) {
                return Err(SyncError::InvalidFileName { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Write the manifest to `dest` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn export(&self, dest: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dest, json).map_err(|source| SyncError::File {
            path: dest.to_path_buf(),
            source,
        })
    }
}

impl FromIterator<(String, Digest)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, Digest)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Build the manifest for the files directly inside `dir`.
///
/// Non-recursive: subdirectories and symlinks are skipped. Reads and hashes
/// run concurrently and join all-or-nothing; any unreadable file fails the
/// whole build and no partial manifest is returned.
///
/// # Errors
/// Returns an error if the directory cannot be enumerated, a file cannot be
/// read, or a filename is not valid UTF-8.
pub async fn build_local(dir: &Path) -> Result<Manifest> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|source| SyncError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut jobs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| SyncError::Directory {
            path: dir.to_path_buf(),
            source,
        })?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|source| SyncError::File {
                path: entry.path(),
                source,
            })?;

        // Regular files only; is_file() on a dir entry does not follow
        // symlinks, so symlinked dirs and files are both skipped.
        if !file_type.is_file() {
            continue;
        }

        let name = entry
            .file_name()
            .into_string()
            .map_err(|os| SyncError::InvalidFileName {
                name: os.to_string_lossy().into_owned(),
            })?;
        let path = entry.path();

        jobs.push(async move {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|source| SyncError::File { path, source })?;
            Ok::<(String, Digest), SyncError>((name, Digest::from_bytes(&data)))
        });
    }

    // Fan-out/join: every read completes before the first error is surfaced.
    let mut files = BTreeMap::new();
    for result in join_all(jobs).await {
        let (name, digest) = result?;
        files.insert(name, digest);
    }

    debug!(dir = %dir.display(), files = files.len(), "built local manifest");
    Ok(Manifest { files })
}
