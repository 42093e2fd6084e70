use std::path::Path;
use tempfile::TempDir;

use crate::{MediaError, Result};

const SCRATCH_PREFIX: &str = ".clapsync-";

/// Directory for intermediate files of one sync run.
///
/// The directory and everything in it is deleted when this value is dropped,
/// including on early returns and panics.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a scratch directory under the system temp directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| MediaError::io("creating scratch directory", e))?;
        tracing::debug!(path = %dir.path().display(), "scratch_created");
        Ok(Self { dir })
    }

    #[cfg(test)]
    fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| MediaError::io("creating scratch directory", e))?;
        tracing::debug!(path = %dir.path().display(), "scratch_created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the directory now, reporting any error instead of ignoring it.
    pub fn close(self) -> Result<()> {
        self.dir
            .close()
            .map_err(|e| MediaError::io("removing scratch directory", e))
    }
}
