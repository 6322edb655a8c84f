use crate::config::StoreConfig;
use crate::digest::{self, StreamingDigest};
use crate::error::Result;
use crate::keys;
use crate::registry::{Contract, ContractRegistry};
use crate::store::{self, ChunkedStore, FlatFileStore, StoreKind};
use std::path::PathBuf;

/// End-to-end read path for one logical key: contract lookup, status gate,
/// store routing, then stream-and-hash through whichever backend holds the
/// block. One invocation drives exactly one store read and one digest; every
/// handle it opens is its own and is dropped on every exit path.
pub struct InspectBlockOperation {
    config: StoreConfig,
    registry: ContractRegistry,
    flat_store: FlatFileStore,
    chunked_store: ChunkedStore,
}

/// Where the bytes were physically found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLocation {
    File(PathBuf),
    Partition(usize),
}

#[derive(Debug, Clone)]
pub struct BlockReport {
    pub store: StoreKind,
    pub internal_key: String,
    pub location: BlockLocation,
    /// Chunked store only; `Some(0)` is a legitimate empty/absent block.
    pub chunk_count: Option<u64>,
    pub digest: String,
    /// Bytes actually observed, as opposed to the contract's declared size.
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct InspectBlockResult {
    pub contract: Contract,
    pub block: BlockReport,
}

impl InspectBlockOperation {
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: ContractRegistry::new(config.registry_db_path()),
            flat_store: FlatFileStore::new(config.flat_store_root()),
            chunked_store: ChunkedStore::new(
                config.chunked_store_root(),
                config.partition_count,
            ),
            config,
        })
    }

    pub async fn run(&self, logical_key: &str) -> Result<InspectBlockResult> {
        let contract = self.registry.lookup(logical_key)?;
        contract.ensure_readable()?;

        let in_key = keys::internal_key(logical_key);
        let kind = store::route(contract.size, self.config.size_threshold);
        tracing::debug!(
            "routing key {} (internal {}) to {} store (size={} threshold={})",
            logical_key,
            in_key,
            kind,
            contract.size,
            self.config.size_threshold
        );

        let block = match kind {
            StoreKind::FlatFile => self.read_flat(&in_key).await?,
            StoreKind::Chunked => self.read_chunked(&in_key)?,
        };

        if block.size_bytes != contract.size {
            tracing::warn!(
                "block {} observed {} bytes but contract declares {}",
                in_key,
                block.size_bytes,
                contract.size
            );
        }

        Ok(InspectBlockResult { contract, block })
    }

    async fn read_flat(&self, in_key: &str) -> Result<BlockReport> {
        let (path, mut file) = self.flat_store.open(in_key).await?;
        let digest = digest::digest_reader(&mut file).await?;

        Ok(BlockReport {
            store: StoreKind::FlatFile,
            internal_key: in_key.to_string(),
            location: BlockLocation::File(path),
            chunk_count: None,
            digest: digest.hex,
            size_bytes: digest.size_bytes,
        })
    }

    fn read_chunked(&self, in_key: &str) -> Result<BlockReport> {
        let index = self.chunked_store.partition_for_key(in_key)?;
        let partition = self.chunked_store.open_partition(index)?;

        let mut cursor = partition.chunks(in_key);
        let mut digest = StreamingDigest::new();
        while let Some(chunk) = cursor.next_chunk()? {
            digest.update(&chunk);
        }
        let chunk_count = cursor.chunks_read();
        let digest = digest.finish();

        Ok(BlockReport {
            store: StoreKind::Chunked,
            internal_key: in_key.to_string(),
            location: BlockLocation::Partition(index),
            chunk_count: Some(chunk_count),
            digest: digest.hex,
            size_bytes: digest.size_bytes,
        })
    }
}
