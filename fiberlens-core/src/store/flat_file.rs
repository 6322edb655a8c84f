use crate::error::{FiberError, Result};
use crate::keys::MIN_INTERNAL_KEY_LEN;
use std::path::PathBuf;
use tokio::fs;

/// Read-only view of the flat-file store: whole blocks stored as single
/// files under a three-level prefix hierarchy derived from the internal key,
/// which keeps per-directory entry counts bounded regardless of corpus size.
pub struct FlatFileStore {
    root: PathBuf,
}

impl FlatFileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Path of the block for `internal_key`:
    /// `<root>/<key[0..3]>/<key[3..6]>/<key[6..]>`.
    pub fn block_path(&self, internal_key: &str) -> Result<PathBuf> {
        if !internal_key.is_ascii() || internal_key.len() < MIN_INTERNAL_KEY_LEN {
            return Err(FiberError::InvalidKey(internal_key.to_string()));
        }

        Ok(self
            .root
            .join(&internal_key[0..3])
            .join(&internal_key[3..6])
            .join(&internal_key[6..]))
    }

    /// Open the block file for sequential streaming. A missing file is a
    /// `BlockNotFound`, never a silent empty result.
    pub async fn open(&self, internal_key: &str) -> Result<(PathBuf, fs::File)> {
        let path = self.block_path(internal_key)?;

        match fs::File::open(&path).await {
            Ok(file) => Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FiberError::BlockNotFound(internal_key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
