//! Cargo-style status output for modsync
//!
//! ```text
//!      Syncing ./mods against http://host:21010...
//!       Synced 3 downloads, 1 deletion in 1.2s
//! ```

use std::io::Write as _;
use std::time::Instant;

/// Status verbs (right-aligned to 12 chars)
struct Status;

impl Status {
    const SYNCING: &'static str = "Syncing";
    const SYNCED: &'static str = "Synced";
    const EXPORTED: &'static str = "Exported";
    const UNCHANGED: &'static str = "Unchanged";
}

/// Print a cargo-style status line
fn print_status(status: &str, message: &str) {
    let mut term = console::Term::stderr();
    let style = console::Style::new().green().bold();
    let _ = writeln!(term, "{:>12} {}", style.apply_to(status), message);
}

/// Progress reporter for one invocation
pub struct SyncProgress {
    start: Instant,
}

impl SyncProgress {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn syncing(&self, dir: &str) {
        print_status(Status::SYNCING, &format!("{dir} against the server..."));
    }

    pub fn synced(&self, downloads: usize, deletions: usize) {
        let elapsed = self.start.elapsed().as_secs_f64();
        print_status(
            Status::SYNCED,
            &format!("{downloads} downloads, {deletions} deletions in {elapsed:.1}s"),
        );
    }

    pub fn unchanged(&self) {
        print_status(Status::UNCHANGED, "directory already matches the server");
    }

    pub fn exported(&self, dest: &str) {
        print_status(Status::EXPORTED, &format!("local manifest to {dest}"));
    }
}
