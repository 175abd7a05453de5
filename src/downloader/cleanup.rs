// File removal owned by the orchestrator: stale files before a run,
// temp files after a successful mux

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::errors::RunError;
use super::paths::RunContext;

/// Delete leftovers from a previous run at any path this run will write.
///
/// Returns the paths that were actually removed. A path that cannot be
/// removed (permissions, a lock held by a player) aborts the run.
pub fn remove_stale_files(ctx: &RunContext) -> Result<Vec<PathBuf>, RunError> {
    let mut removed = Vec::new();

    for path in ctx.all_paths() {
        if remove_if_exists(path)? {
            debug!(path = %path.display(), "removed stale file");
            removed.push(path.to_path_buf());
        }
    }

    Ok(removed)
}

/// Delete both temp files once the output is written. Failures only warn:
/// the output is complete and the next run clears whatever is left.
pub fn remove_temp_files(ctx: &RunContext) {
    for path in ctx.temp_paths() {
        if let Err(e) = remove_if_exists(path) {
            warn!(error = %e, "failed to remove temp file");
        }
    }
}

fn remove_if_exists(path: &Path) -> Result<bool, RunError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(RunError::filesystem(path, e)),
    }
}
