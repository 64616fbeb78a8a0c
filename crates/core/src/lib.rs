//! modsync-core: Core sync engine
//!
//! Provides content hashing, local manifest building, and the manifest-diff
//! algorithm that decides which files to download and which to delete.

pub mod config;
pub mod diff;
pub mod error;
pub mod hash;
pub mod manifest;

pub use config::Config;
pub use diff::{diff, SyncPlan};
pub use error::{Result, SyncError};
pub use hash::Digest;
pub use manifest::{build_local, Manifest};
