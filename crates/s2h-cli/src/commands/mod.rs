//! Subcommand implementations.

pub(crate) mod assess;
pub(crate) mod info;
pub(crate) mod predict;
pub(crate) mod train;

use std::path::Path;

use crate::error::{CliError, Result};

/// Fails with `FileNotFound` unless `path` exists.
pub(crate) fn require_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::FileNotFound(path.to_path_buf()))
    }
}
