//! Fiberlens Core - read-path locator and integrity verifier for two-tier
//! fiber block stores.
//!
//! A contract registry maps a logical content key to block metadata; from
//! there the block's bytes are found either as one file in a prefix-sharded
//! flat store or as an ordered chunk sequence in one of N SQLite partitions,
//! then streamed through SHA-256 to confirm integrity. Read-only throughout:
//! - SHA-1 internal keys drive both path sharding and partition selection
//! - chunk enumeration ends at the first missing index by design
//! - no retries, no partial results

pub mod config;
pub mod digest;
pub mod error;
pub mod keys;
pub mod operations;
pub mod registry;
pub mod store;

pub use config::{
    StoreConfig, StoreProfile, DEFAULT_PARTITION_COUNT, DEFAULT_SIZE_THRESHOLD,
};
pub use digest::{compute_hash, digest_reader, BlockDigest, StreamingDigest};
pub use error::{FiberError, Result};
pub use keys::{chunk_key, internal_key, partition_index};
pub use operations::{BlockLocation, BlockReport, InspectBlockOperation, InspectBlockResult};
pub use registry::{Contract, ContractRegistry, STATUS_MINER_USED};
pub use store::{route, ChunkCursor, ChunkedStore, FlatFileStore, Partition, StoreKind};
