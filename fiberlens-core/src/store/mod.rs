pub mod chunked;
pub mod flat_file;

pub use chunked::{ChunkCursor, ChunkedStore, Partition};
pub use flat_file::FlatFileStore;

use std::fmt;

/// The two physical backends a block can live in. There is no stored
/// indicator of which one holds a given block; routing must reproduce the
/// writer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    FlatFile,
    Chunked,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::FlatFile => write!(f, "flat-file"),
            StoreKind::Chunked => write!(f, "chunked"),
        }
    }
}

/// Pure routing decision: blocks strictly larger than the threshold live in
/// the flat-file store, everything else (including `size == threshold`) in
/// the chunked store.
pub fn route(size: u64, size_threshold: u64) -> StoreKind {
    if size > size_threshold {
        StoreKind::FlatFile
    } else {
        StoreKind::Chunked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_is_pure_threshold_comparison() {
        assert_eq!(route(500_000, 102_400), StoreKind::FlatFile);
        assert_eq!(route(50, 102_400), StoreKind::Chunked);
        assert_eq!(route(0, 0), StoreKind::Chunked);
        assert_eq!(route(1, 0), StoreKind::FlatFile);
    }

    #[test]
    fn boundary_size_routes_to_chunked() {
        assert_eq!(route(102_400, 102_400), StoreKind::Chunked);
    }
}
