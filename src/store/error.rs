use thiserror::Error;

use crate::predict::PairKey;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("window for {found} handed to pair {expected}")]
    PairMismatch { expected: PairKey, found: PairKey },
}
