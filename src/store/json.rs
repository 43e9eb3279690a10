use std::io;
use std::path::{Path, PathBuf};

use super::{check_pair, merge_by_natural_key, ReplaceSummary, StoreError, WindowStore};
use crate::predict::{ContactWindow, PairKey};

/// File-backed window store: one JSON document per pair under a base folder.
/// Writes go through a temp file and rename so a reader never observes a
/// half-written set.
pub struct JsonStore {
    base: PathBuf,
}

impl JsonStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn pair_path(&self, pair: &PairKey) -> PathBuf {
        self.base.join(format!(
            "{}__{}.json",
            sanitize(&pair.satellite_id),
            sanitize(&pair.ground_station_id)
        ))
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

async fn read_windows(path: &Path) -> Result<Vec<ContactWindow>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mut windows: Vec<ContactWindow> = serde_json::from_slice(&bytes)?;
            windows.sort_by_key(|w| w.scheduled_aos);
            Ok(windows)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

impl WindowStore for JsonStore {
    async fn list_pair(&self, pair: &PairKey) -> Result<Vec<ContactWindow>, StoreError> {
        read_windows(&self.pair_path(pair)).await
    }

    async fn replace_pair(
        &self,
        pair: &PairKey,
        windows: &[ContactWindow],
    ) -> Result<ReplaceSummary, StoreError> {
        check_pair(pair, windows)?;

        let path = self.pair_path(pair);
        let existing = read_windows(&path).await?;
        let (merged, summary) = merge_by_natural_key(existing, windows);

        if merged.is_empty() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            tokio::fs::create_dir_all(&self.base).await?;
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, serde_json::to_vec_pretty(&merged)?).await?;
            tokio::fs::rename(&tmp, &path).await?;
        }

        Ok(summary)
    }

    async fn delete_pair(&self, pair: &PairKey) -> Result<usize, StoreError> {
        let path = self.pair_path(pair);
        let existing = read_windows(&path).await?;
        if !existing.is_empty() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(existing.len())
    }
}
