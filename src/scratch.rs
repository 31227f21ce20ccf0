//! Scratch directories under the runner-provided temp root.
use crate::error::{ActionError, ActionResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a fresh, uniquely named directory under `root`.
///
/// The directory is detached from automatic cleanup: the runner wipes its
/// temp area at the end of the job.
pub fn create_scratch_dir(root: Option<&Path>) -> ActionResult<PathBuf> {
    let root = root.ok_or(ActionError::MissingRunnerTemp)?;
    fs::create_dir_all(root).map_err(ActionError::Scratch)?;
    let dir = tempfile::Builder::new()
        .prefix("slither-")
        .tempdir_in(root)
        .map_err(ActionError::Scratch)?;
    Ok(dir.keep())
}
