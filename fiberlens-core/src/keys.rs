use crate::error::{FiberError, Result};
use sha1::{Digest, Sha1};

/// Minimum internal key length for the flat store's `3/3/rest` path split.
pub const MIN_INTERNAL_KEY_LEN: usize = 7;

/// Derive the internal storage key for a logical key: lowercase hex SHA-1,
/// always 40 chars. The digest doubles as a directory-path basis and a
/// partition selector, so the algorithm is part of the on-disk format.
pub fn internal_key(logical_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(logical_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Key of chunk `index` of the block addressed by `internal_key`. The index
/// is zero-padded to six digits so lexical and numeric order agree when the
/// underlying store iterates keys.
pub fn chunk_key(internal_key: &str, index: u64) -> String {
    format!("{}-{:06}", internal_key, index)
}

/// Select a partition for an internal key: first decoded byte modulo the
/// partition count. Internal keys produced by [`internal_key`] always decode,
/// but keys arriving from elsewhere must be checked.
pub fn partition_index(internal_key: &str, partition_count: usize) -> Result<usize> {
    if partition_count == 0 {
        return Err(FiberError::Config(
            "partition_count must be at least 1".to_string(),
        ));
    }

    let decoded = hex::decode(internal_key)?;
    let first = decoded
        .first()
        .ok_or_else(|| FiberError::InvalidKey("empty internal key".to_string()))?;

    Ok(*first as usize % partition_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_key_is_deterministic_fixed_length_hex() {
        let a = internal_key("block-0001");
        let b = internal_key("block-0001");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        // Decoding and re-encoding round-trips to the same string.
        assert_eq!(hex::encode(hex::decode(&a).unwrap()), a);
    }

    #[test]
    fn internal_key_known_vector() {
        // SHA-1("abc")
        assert_eq!(
            internal_key("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn chunk_keys_zero_padded() {
        let key = internal_key("block-0001");
        assert_eq!(chunk_key(&key, 0), format!("{}-000000", key));
        assert_eq!(chunk_key(&key, 42), format!("{}-000042", key));
        assert_eq!(chunk_key(&key, 999_999), format!("{}-999999", key));
    }

    #[test]
    fn chunk_keys_sort_lexically_in_index_order() {
        let key = internal_key("block-0001");
        let mut keys: Vec<String> = (0..12).map(|i| chunk_key(&key, i)).collect();
        let sorted = keys.clone();
        keys.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn partition_index_stable_and_in_range() {
        for n in 1..=16usize {
            for seed in 0..32 {
                let key = internal_key(&format!("block-{}", seed));
                let first = partition_index(&key, n).unwrap();
                assert!(first < n);
                assert_eq!(partition_index(&key, n).unwrap(), first);
            }
        }
    }

    #[test]
    fn partition_index_uses_first_byte() {
        // 0xab = 171
        assert_eq!(partition_index("abcdef", 4).unwrap(), 171 % 4);
    }

    #[test]
    fn partition_index_rejects_bad_hex() {
        assert!(matches!(
            partition_index("not-hex!", 2),
            Err(FiberError::HexDecode(_))
        ));
        assert!(matches!(
            partition_index("", 2),
            Err(FiberError::InvalidKey(_))
        ));
    }
}
