use thiserror::Error;

use crate::catalog::CatalogError;
use crate::predict::PairKey;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("reconciliation timed out for {pair}")]
    Timeout { pair: PairKey },
}
