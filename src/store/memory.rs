use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{check_pair, merge_by_natural_key, ReplaceSummary, StoreError, WindowStore};
use crate::predict::{ContactWindow, PairKey};

/// In-memory window store. The single write guard makes a replace atomic
/// for readers.
#[derive(Default)]
pub struct MemoryStore {
    pairs: RwLock<HashMap<PairKey, Vec<ContactWindow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowStore for MemoryStore {
    async fn list_pair(&self, pair: &PairKey) -> Result<Vec<ContactWindow>, StoreError> {
        // Stored sorted; see replace_pair.
        Ok(self.pairs.read().await.get(pair).cloned().unwrap_or_default())
    }

    async fn replace_pair(
        &self,
        pair: &PairKey,
        windows: &[ContactWindow],
    ) -> Result<ReplaceSummary, StoreError> {
        check_pair(pair, windows)?;

        let mut pairs = self.pairs.write().await;
        let existing = pairs.remove(pair).unwrap_or_default();
        let (merged, summary) = merge_by_natural_key(existing, windows);
        if !merged.is_empty() {
            pairs.insert(pair.clone(), merged);
        }
        Ok(summary)
    }

    async fn delete_pair(&self, pair: &PairKey) -> Result<usize, StoreError> {
        Ok(self
            .pairs
            .write()
            .await
            .remove(pair)
            .map(|windows| windows.len())
            .unwrap_or(0))
    }
}
