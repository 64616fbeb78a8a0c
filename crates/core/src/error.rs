//! Error taxonomy for sync operations
//!
//! Every failure reaching a caller is one of these variants; operations never
//! panic past their boundary and nothing is retried automatically.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building manifests, talking to the remote
/// store, or applying a sync plan.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No server URL configured; network operations refuse to start.
    #[error("server URL is not configured")]
    NotConfigured,

    /// Configuration file exists but cannot be parsed or written.
    #[error("invalid config {path}: {reason}")]
    Config {
        /// Config file path
        path: PathBuf,
        /// Parse or encode failure
        reason: String,
    },

    /// Directory enumeration failed.
    #[error("cannot read directory {path}: {source}")]
    Directory {
        /// The directory being scanned
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single file could not be read, written, or deleted.
    #[error("cannot access {path}: {source}")]
    File {
        /// The offending path
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A manifest entry names something that is not a plain filename.
    #[error("invalid file name {name:?} in manifest")]
    InvalidFileName {
        /// The rejected name
        name: String,
    },

    /// A digest string is not 64 hex characters.
    #[error("invalid digest {value:?}")]
    InvalidDigest {
        /// The rejected string
        value: String,
    },

    /// Manifest could not be encoded or decoded as JSON.
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server could not be reached at all.
    #[error("server unreachable at {url}: {reason}")]
    Unreachable {
        /// The URL that was attempted
        url: String,
        /// Transport-level cause
        reason: String,
    },

    /// The server responded with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Status {
        /// The URL that was attempted
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The server was reachable but the manifest body is not the expected
    /// filename-to-digest mapping. A stronger signal than `Unreachable`.
    #[error("invalid manifest from {url}: {reason}")]
    InvalidManifest {
        /// The manifest resource URL
        url: String,
        /// What was wrong with the body
        reason: String,
    },

    /// A concurrent task panicked or was aborted.
    #[error("sync task failed: {0}")]
    Task(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_configured() {
        assert!(SyncError::NotConfigured.to_string().contains("not configured"));
    }

    #[test]
    fn error_display_file_keeps_path_context() {
        let err = SyncError::File {
            path: PathBuf::from("/mods/a.pak"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/mods/a.pak"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn error_display_distinguishes_unreachable_from_invalid() {
        let unreachable = SyncError::Unreachable {
            url: "http://host/manifest.json".into(),
            reason: "connection refused".into(),
        };
        let invalid = SyncError::InvalidManifest {
            url: "http://host/manifest.json".into(),
            reason: "expected object".into(),
        };
        assert!(unreachable.to_string().contains("unreachable"));
        assert!(invalid.to_string().contains("invalid manifest"));
    }
}
