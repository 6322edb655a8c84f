use crate::error::{FiberError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed layout under the storage root. These names are part of the on-disk
/// contract shared with the writer side.
pub const REGISTRY_DB_NAME: &str = "contracts.db";
pub const FLAT_STORE_DIR: &str = "flat";
pub const CHUNKED_STORE_DIR: &str = "chunked";
pub const STORE_PROFILE_NAME: &str = "store.toml";

pub const DEFAULT_SIZE_THRESHOLD: u64 = 102_400;
pub const DEFAULT_PARTITION_COUNT: usize = 2;

const STORE_PROFILE_VERSION: u32 = 1;
const DIGEST_ALGORITHM: &str = "sha-256";

fn default_size_threshold() -> u64 {
    DEFAULT_SIZE_THRESHOLD
}

fn default_partition_count() -> usize {
    DEFAULT_PARTITION_COUNT
}

fn default_profile_version() -> u32 {
    STORE_PROFILE_VERSION
}

fn default_digest_algorithm() -> String {
    DIGEST_ALGORITHM.to_string()
}

/// Writer-side settings persisted next to the data (`<root>/store.toml`).
///
/// Threshold, partition count and digest algorithm decide where bytes land
/// and how they are checked, but historically lived only in the writer's
/// flags. Persisting them versioned alongside the registry lets the read
/// path pick them up instead of trusting the operator to pass matching
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProfile {
    #[serde(default = "default_profile_version")]
    pub version: u32,
    #[serde(default = "default_size_threshold")]
    pub size_threshold: u64,
    #[serde(default = "default_partition_count")]
    pub partition_count: usize,
    #[serde(default = "default_digest_algorithm")]
    pub digest_algorithm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub root: PathBuf,
    #[serde(default = "default_size_threshold")]
    pub size_threshold: u64,
    #[serde(default = "default_partition_count")]
    pub partition_count: usize,
}

impl StoreConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            partition_count: DEFAULT_PARTITION_COUNT,
        }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("FIBERLENS"))
            .build()
            .map_err(|e| FiberError::Config(e.to_string()))?;

        let cfg: StoreConfig = settings
            .try_deserialize()
            .map_err(|e| FiberError::Config(e.to_string()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Build a config for a storage root, honoring the store profile written
    /// next to the data when one exists. Stores that predate the profile fall
    /// back to the defaults; callers may still override afterwards.
    pub fn for_root(root: PathBuf) -> Result<Self> {
        let mut cfg = Self::new(root);

        let profile_path = cfg.root.join(STORE_PROFILE_NAME);
        if profile_path.exists() {
            let profile = load_profile(&profile_path)?;
            cfg.size_threshold = profile.size_threshold;
            cfg.partition_count = profile.partition_count;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(FiberError::Config(
                "partition_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn registry_db_path(&self) -> PathBuf {
        self.root.join(REGISTRY_DB_NAME)
    }

    pub fn flat_store_root(&self) -> PathBuf {
        self.root.join(FLAT_STORE_DIR)
    }

    pub fn chunked_store_root(&self) -> PathBuf {
        self.root.join(CHUNKED_STORE_DIR)
    }

    pub fn partition_db_path(&self, index: usize) -> PathBuf {
        self.chunked_store_root().join(index.to_string())
    }
}

fn load_profile(path: &Path) -> Result<StoreProfile> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .map_err(|e| FiberError::Config(e.to_string()))?;

    let profile: StoreProfile = settings
        .try_deserialize()
        .map_err(|e| FiberError::Config(e.to_string()))?;

    if profile.version != STORE_PROFILE_VERSION {
        return Err(FiberError::Config(format!(
            "unsupported store profile version {}",
            profile.version
        )));
    }

    if profile.digest_algorithm != DIGEST_ALGORITHM {
        return Err(FiberError::Config(format!(
            "unsupported digest algorithm '{}' (this build verifies {})",
            profile.digest_algorithm, DIGEST_ALGORITHM
        )));
    }

    Ok(profile)
}
