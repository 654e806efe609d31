use std::io;
use std::path::{Path, PathBuf};

use mediarelay_core::constants::TEMP_PREFIX;
use tempfile::TempDir;

/// Request-scoped temporary directory.
///
/// Every artifact a request writes lives under this directory. `release`
/// removes it and logs failures; if the owner unwinds instead, `TempDir`'s
/// drop removes it.
#[derive(Debug)]
pub struct RequestWorkspace {
    dir: TempDir,
}

impl RequestWorkspace {
    /// Create a fresh `relay-*` directory under `root`, creating `root` if needed.
    pub fn acquire(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", TEMP_PREFIX))
            .tempdir_in(root)?;

        tracing::debug!(path = %dir.path().display(), "Acquired request workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn release(self) {
        let path: PathBuf = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Released request workspace"),
            Err(e) => tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to remove request workspace"
            ),
        }
    }
}
