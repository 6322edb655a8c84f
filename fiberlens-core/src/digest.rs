use crate::error::Result;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

const READ_BUF_SIZE: usize = 64 * 1024;

/// Final verification result: hex-encoded SHA-256 plus the byte count
/// observed on the way through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDigest {
    pub hex: String,
    pub size_bytes: u64,
}

/// Running SHA-256 state with a byte counter. The hash state is always
/// streaming; callers feed whatever unit their store hands out (file buffers
/// or whole chunks).
pub struct StreamingDigest {
    hasher: Sha256,
    size_bytes: u64,
}

impl StreamingDigest {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            size_bytes: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.size_bytes += data.len() as u64;
    }

    pub fn finish(self) -> BlockDigest {
        BlockDigest {
            hex: hex::encode(self.hasher.finalize()),
            size_bytes: self.size_bytes,
        }
    }
}

impl Default for StreamingDigest {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream a reader to completion through the digest in fixed-size buffers,
/// never holding the whole block in memory. Any mid-stream I/O failure
/// surfaces as-is and produces no digest.
pub async fn digest_reader<R: AsyncRead + Unpin>(reader: &mut R) -> Result<BlockDigest> {
    let mut digest = StreamingDigest::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }

    Ok(digest.finish())
}

/// Compute the SHA-256 hex digest of an in-memory buffer.
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
