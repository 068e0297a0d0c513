use crate::error::Result;
use crate::types::{Pair, SecretKey};
use crate::BUCKET_NAME;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

// name -> raw key bytes
const KEYS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new(BUCKET_NAME);

/// Durable name -> key associations in a single-file redb database.
///
/// Every [`persist`](PairStore::persist) is its own write transaction, so an
/// interrupted run never leaves a half-written pairing behind. Clones share
/// the same open database.
#[derive(Clone)]
pub struct PairStore {
    db: Arc<Database>,
    path: PathBuf,
}

impl PairStore {
    /// Open the store at `path`, creating the file if needed. Existing
    /// entries are kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;
        Ok(PairStore {
            db: Arc::new(db),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `name -> key` in one transaction, creating the bucket on first
    /// use. An existing entry for `name` is replaced.
    pub fn persist(&self, name: &str, key: &SecretKey) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KEYS_TABLE)?;
            table.insert(name, key.as_bytes())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<SecretKey>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(KEYS_TABLE) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match table.get(name)? {
            Some(value) => Ok(decode_key(name, value.value())),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> Result<u64> {
        let read_txn = self.db.begin_read()?;
        match read_txn.open_table(KEYS_TABLE) {
            Ok(table) => Ok(table.len()?),
            Err(TableError::TableDoesNotExist(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// All stored pairings in name order.
    pub fn pairs(&self) -> Result<Vec<Pair>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(KEYS_TABLE) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut pairs = Vec::new();
        for entry in table.iter()? {
            let (name, value) = entry?;
            let name = name.value();
            if let Some(key) = decode_key(name, value.value()) {
                pairs.push(Pair::new(name.to_owned(), key));
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
impl PairStore {
    // occupies the single writer slot until `hold` has passed
    pub(crate) fn hold_writer(&self, hold: std::time::Duration, acquired: std::sync::mpsc::Sender<()>) {
        let write_txn = self.db.begin_write().unwrap();
        acquired.send(()).unwrap();
        std::thread::sleep(hold);
        write_txn.abort().unwrap();
    }
}

// entries of the wrong length can only come from a foreign writer
fn decode_key(name: &str, bytes: &[u8]) -> Option<SecretKey> {
    let key = SecretKey::from_slice(bytes);
    if key.is_none() {
        warn!("skipping entry {} with {}-byte value", name, bytes.len());
    }
    key
}

impl std::fmt::Debug for PairStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairStore").field("path", &self.path).finish()
    }
}
