use crate::error::{NomenError, Result};
use crate::types::Pair;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory record of the pairings made during a run, kept for JSON export.
///
/// The runner appends while holding the write lock; exporting holds the read
/// lock for as long as it takes to encode the list.
#[derive(Clone, Debug, Default)]
pub struct PairLog {
    pairs: Arc<RwLock<Vec<Pair>>>,
}

impl PairLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, pair: Pair) {
        self.pairs.write().await.push(pair);
    }

    pub async fn len(&self) -> usize {
        self.pairs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn snapshot(&self) -> Vec<Pair> {
        self.pairs.read().await.clone()
    }

    /// Overwrite `path` with the pretty-printed pair list. Returns how many
    /// pairs were written.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let pairs = self.pairs.read().await;
        let mut encoded = serde_json::to_vec_pretty(&*pairs)?;
        encoded.push(b'\n');
        tokio::fs::write(path, encoded)
            .await
            .map_err(NomenError::ExportIo)?;
        info!("saved {} pairs to {}", pairs.len(), path.display());
        Ok(pairs.len())
    }
}

/// Read back a file written by [`PairLog::save_json`].
pub async fn load_json(path: impl AsRef<Path>) -> Result<Vec<Pair>> {
    let bytes = tokio::fs::read(path).await.map_err(NomenError::ExportIo)?;
    Ok(serde_json::from_slice(&bytes)?)
}
