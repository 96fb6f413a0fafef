//! Data directory resolution and the session staging directory resource.

use std::path::{Path, PathBuf};

/// Resolve the Leadflow data directory.
///
/// Priority: `LEADFLOW_DATA_DIR` env var, then `~/.leadflow`, then a
/// relative `.leadflow` as a last resort.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LEADFLOW_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".leadflow");
    }

    PathBuf::from(".leadflow")
}

/// Scoped staging directory for session artifacts.
///
/// The automation layer exchanges session payloads with the store only
/// through files in this directory; the directory itself is removed with
/// everything in it when the resource is dropped.
pub struct StagingDir {
    path: PathBuf,
    remove_on_drop: bool,
}

impl StagingDir {
    /// Use (and create) `{data_dir}/staging` as the staging area. The
    /// directory persists across runs; only its content turns over.
    pub fn at(data_dir: &Path) -> std::io::Result<Self> {
        let path = data_dir.join("staging");
        std::fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            remove_on_drop: false,
        })
    }

    /// A throwaway staging area under the system temp dir, removed on drop.
    pub fn ephemeral() -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("leadflow-staging-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            remove_on_drop: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.remove_on_drop {
            if let Err(error) = std::fs::remove_dir_all(&self.path) {
                tracing::warn!(%error, path = %self.path.display(), "failed to remove staging directory");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("LEADFLOW_DATA_DIR", "/tmp/test-leadflow");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-leadflow"));
        unsafe {
            std::env::remove_var("LEADFLOW_DATA_DIR");
        }
    }

    #[test]
    fn test_staging_dir_at_creates_and_keeps() {
        let tmp = tempfile::tempdir().unwrap();
        let path = {
            let staging = StagingDir::at(tmp.path()).unwrap();
            assert!(staging.path().is_dir());
            staging.path().to_path_buf()
        };
        // A data-dir staging area survives the resource.
        assert!(path.is_dir());
    }

    #[test]
    fn test_ephemeral_staging_dir_removed_on_drop() {
        let path = {
            let staging = StagingDir::ephemeral().unwrap();
            std::fs::write(staging.path().join("x.session"), b"bytes").unwrap();
            staging.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
