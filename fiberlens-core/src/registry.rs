use crate::error::{FiberError, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The only lifecycle status that authorizes a read.
pub const STATUS_MINER_USED: &str = "MINER_USED";

/// Metadata record governing a block: declared size, lifecycle status, lease
/// window, plus opaque routing hints (`fiber`, `miner`, `miner_footprint`,
/// `hash`) that this crate reports but never interprets. Immutable here; the
/// read path never writes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub version: i64,
    #[serde(default)]
    pub fiber: String,
    #[serde(default)]
    pub miner: String,
    #[serde(default)]
    pub miner_footprint: String,
    #[serde(default)]
    pub hash: String,
    pub size: u64,
    #[serde(default)]
    pub lease_begin: String,
    #[serde(default)]
    pub lease_end: String,
    pub status: String,
}

impl Contract {
    /// Gate for the read path: anything other than `MINER_USED` aborts
    /// before any store is touched.
    pub fn ensure_readable(&self) -> Result<()> {
        if self.status != STATUS_MINER_USED {
            return Err(FiberError::InvalidStatus(self.status.clone()));
        }
        Ok(())
    }
}

/// Read-only view of the external contract registry: a SQLite database with
/// `contracts(key TEXT PRIMARY KEY, value BLOB)`, values being JSON-encoded
/// [`Contract`] records indexed by *logical* key.
pub struct ContractRegistry {
    db_path: PathBuf,
}

impl ContractRegistry {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn open(&self) -> Result<Connection> {
        if !self.db_path.exists() {
            return Err(FiberError::RegistryUnavailable(self.db_path.clone()));
        }
        let conn =
            Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(conn)
    }

    pub fn lookup(&self, logical_key: &str) -> Result<Contract> {
        let conn = self.open()?;

        let raw: Option<Vec<u8>> = conn
            .query_row(
                "SELECT value FROM contracts WHERE key = ?1",
                params![logical_key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Err(FiberError::ContractNotFound(logical_key.to_string()));
        };

        let contract: Contract = serde_json::from_slice(&raw)?;
        tracing::debug!(
            "resolved contract for key {}: size={} status={}",
            logical_key,
            contract.size,
            contract.status
        );
        Ok(contract)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::path::Path;

    pub fn seed_registry(db_path: &Path, entries: &[(&str, &Contract)]) {
        let conn = Connection::open(db_path).unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS contracts (key TEXT PRIMARY KEY, value BLOB)",
            [],
        )
        .unwrap();
        for (key, contract) in entries {
            let value = serde_json::to_vec(contract).unwrap();
            conn.execute(
                "INSERT OR REPLACE INTO contracts (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .unwrap();
        }
    }

    pub fn sample_contract(size: u64, status: &str) -> Contract {
        Contract {
            version: 1,
            fiber: "fiber-01".to_string(),
            miner: "miner-9f".to_string(),
            miner_footprint: "fp-9f".to_string(),
            hash: "deadbeef".to_string(),
            size,
            lease_begin: "2024-01-01T00:00:00Z".to_string(),
            lease_end: "2025-01-01T00:00:00Z".to_string(),
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{sample_contract, seed_registry};
    use super::*;

    #[test]
    fn lookup_returns_stored_contract() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("contracts.db");
        let contract = sample_contract(50, STATUS_MINER_USED);
        seed_registry(&db_path, &[("block-0001", &contract)]);

        let registry = ContractRegistry::new(db_path);
        let found = registry.lookup("block-0001").unwrap();
        assert_eq!(found.size, 50);
        assert_eq!(found.status, STATUS_MINER_USED);
        assert_eq!(found.miner, "miner-9f");
        assert!(found.ensure_readable().is_ok());
    }

    #[test]
    fn lookup_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("contracts.db");
        seed_registry(&db_path, &[]);

        let registry = ContractRegistry::new(db_path);
        assert!(matches!(
            registry.lookup("absent"),
            Err(FiberError::ContractNotFound(_))
        ));
    }

    #[test]
    fn lookup_malformed_record_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("contracts.db");
        seed_registry(&db_path, &[]);

        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "INSERT INTO contracts (key, value) VALUES (?1, ?2)",
            params!["broken", b"not json".to_vec()],
        )
        .unwrap();
        drop(conn);

        let registry = ContractRegistry::new(db_path);
        assert!(matches!(
            registry.lookup("broken"),
            Err(FiberError::Serialization(_))
        ));
    }

    #[test]
    fn lookup_without_registry_db_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ContractRegistry::new(dir.path().join("contracts.db"));
        assert!(matches!(
            registry.lookup("block-0001"),
            Err(FiberError::RegistryUnavailable(_))
        ));
    }

    #[test]
    fn contract_json_uses_writer_field_names() {
        let raw = r#"{
            "version": 3,
            "fiber": "f",
            "miner": "m",
            "minerFootprint": "fp",
            "hash": "00ff",
            "size": 1024,
            "leaseBegin": "2024-06-01T00:00:00Z",
            "leaseEnd": "2024-12-01T00:00:00Z",
            "status": "PENDING"
        }"#;
        let contract: Contract = serde_json::from_str(raw).unwrap();
        assert_eq!(contract.miner_footprint, "fp");
        assert_eq!(contract.lease_begin, "2024-06-01T00:00:00Z");
        assert!(matches!(
            contract.ensure_readable(),
            Err(FiberError::InvalidStatus(_))
        ));
    }
}
