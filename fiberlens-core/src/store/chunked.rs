use crate::error::{FiberError, Result};
use crate::keys;
use bytes::Bytes;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::PathBuf;

/// Read-only view of the chunked KV store: N independent SQLite partitions
/// under one root, each holding `chunks(key TEXT PRIMARY KEY, value BLOB)`.
/// A block's chunks all live in the partition selected by hashing its
/// internal key; the writer used the same partition count, or nothing lines
/// up.
pub struct ChunkedStore {
    root: PathBuf,
    partition_count: usize,
}

impl ChunkedStore {
    pub fn new(root: PathBuf, partition_count: usize) -> Self {
        Self {
            root,
            partition_count,
        }
    }

    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    pub fn partition_path(&self, index: usize) -> PathBuf {
        self.root.join(index.to_string())
    }

    pub fn partition_for_key(&self, internal_key: &str) -> Result<usize> {
        keys::partition_index(internal_key, self.partition_count)
    }

    /// Open one partition with its own connection. Invocations never share
    /// handles, so concurrent read-only opens are safe. A partition missing
    /// on disk aborts the whole read.
    pub fn open_partition(&self, index: usize) -> Result<Partition> {
        let path = self.partition_path(index);
        if !path.exists() {
            return Err(FiberError::PartitionUnavailable { index, path });
        }

        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Partition { index, conn })
    }
}

/// One open partition database.
pub struct Partition {
    index: usize,
    conn: Connection,
}

impl Partition {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Point lookup of one chunk. `Ok(None)` means the chunk does not exist,
    /// which for the lowest missing index is the designed end-of-block
    /// marker, not a failure.
    pub fn chunk(&self, internal_key: &str, index: u64) -> Result<Option<Bytes>> {
        let key = keys::chunk_key(internal_key, index);

        let value: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT value FROM chunks WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.map(Bytes::from))
    }

    /// Cursor over the contiguous chunk sequence of one block, starting at
    /// index 0.
    pub fn chunks<'a>(&'a self, internal_key: &'a str) -> ChunkCursor<'a> {
        ChunkCursor {
            partition: self,
            internal_key,
            next_index: 0,
        }
    }
}

/// Enumerates chunks `0, 1, 2, …` until the first miss. Chunks are written
/// contiguously and only ever appended, so the first absent index ends the
/// block; an immediate miss yields an empty block (indistinguishable here
/// from a fully absent one — that distinction lives in contract metadata).
pub struct ChunkCursor<'a> {
    partition: &'a Partition,
    internal_key: &'a str,
    next_index: u64,
}

impl ChunkCursor<'_> {
    pub fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        match self.partition.chunk(self.internal_key, self.next_index)? {
            Some(chunk) => {
                self.next_index += 1;
                Ok(Some(chunk))
            }
            None => Ok(None),
        }
    }

    /// Number of chunks returned so far; after the terminating miss this is
    /// the block's chunk count.
    pub fn chunks_read(&self) -> u64 {
        self.next_index
    }
}
