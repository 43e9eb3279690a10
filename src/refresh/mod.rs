mod error;

pub use error::RefreshError;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, Semaphore};

use crate::catalog::{Catalog, GroundStation, Satellite};
use crate::config::{PredictionConfig, RefreshConfig};
use crate::predict::{elevation_sampler, scan, ContactWindow, PairKey, ScanConfig};
use crate::store::{ReplaceSummary, WindowStore};

/// Result of refreshing one pair.
#[derive(Debug)]
pub struct PairOutcome {
    pub pair: PairKey,
    pub windows: Vec<ContactWindow>,
    pub summary: ReplaceSummary,
}

#[derive(Debug, Serialize)]
pub struct PairFailure {
    pub pair: PairKey,
    pub reason: String,
}

/// Partial-failure summary for a full refresh: one bad pair never aborts
/// the rest.
#[derive(Debug, Default, Serialize)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub windows: usize,
    pub failures: Vec<PairFailure>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Hands out one mutex per pair so no two reconciliations for the same pair
/// ever run concurrently; different pairs stay independent.
#[derive(Default)]
struct PairLocks {
    locks: StdMutex<HashMap<PairKey, Arc<Mutex<()>>>>,
}

impl PairLocks {
    fn get(&self, pair: &PairKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(pair.clone()).or_default().clone()
    }

    /// Drop the registry entry once no caller holds it, so ad-hoc refreshes
    /// for churning pairs cannot grow the map without bound.
    fn release(&self, pair: &PairKey) {
        let mut locks = self.locks.lock().unwrap();
        if let Some(lock) = locks.get(pair) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(pair);
            }
        }
    }
}

/// Drives the prediction core over satellite/station pairs and reconciles
/// the results into the window store.
pub struct RefreshService<S> {
    store: Arc<S>,
    prediction: PredictionConfig,
    refresh: RefreshConfig,
    locks: Arc<PairLocks>,
}

impl<S> Clone for RefreshService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            prediction: self.prediction,
            refresh: self.refresh,
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<S: WindowStore + 'static> RefreshService<S> {
    pub fn new(store: Arc<S>, prediction: PredictionConfig, refresh: RefreshConfig) -> Self {
        Self {
            store,
            prediction,
            refresh,
            locks: Arc::new(PairLocks::default()),
        }
    }

    /// Recompute and reconcile one pair with the scan anchored at `start`.
    /// Deterministic for a fixed `start` and unchanged elements.
    pub async fn refresh_pair_at(
        &self,
        satellite: &Satellite,
        station: &GroundStation,
        start: DateTime<Utc>,
    ) -> Result<PairOutcome, RefreshError> {
        station.validate()?;
        let pair = PairKey::new(&satellite.id, &station.id);

        let scan_config = ScanConfig {
            start,
            step_seconds: self.prediction.step_seconds,
            horizon_minutes: self.prediction.horizon_minutes,
            min_elevation_deg: self.prediction.min_elevation_deg,
        };
        let sampler = elevation_sampler(
            &satellite.elements.elements,
            &satellite.elements.constants,
            station.geodetic(),
            self.prediction.earth_radius_km,
        );
        let windows = scan(&pair, &satellite.elements.id, &scan_config, sampler);

        let lock = self.locks.get(&pair);
        let summary = {
            let _guard = lock.lock().await;
            tokio::time::timeout(
                self.refresh.pair_timeout(),
                self.store.replace_pair(&pair, &windows),
            )
            .await
            .map_err(|_| RefreshError::Timeout { pair: pair.clone() })
        };
        drop(lock);
        self.locks.release(&pair);
        let summary = summary??;

        log::debug!(
            "refreshed {}: {} windows ({} inserted, {} updated, {} removed)",
            pair,
            windows.len(),
            summary.inserted,
            summary.updated,
            summary.removed
        );

        Ok(PairOutcome {
            pair,
            windows,
            summary,
        })
    }

    pub async fn refresh_pair(
        &self,
        satellite: &Satellite,
        station: &GroundStation,
    ) -> Result<PairOutcome, RefreshError> {
        self.refresh_pair_at(satellite, station, Utc::now()).await
    }

    /// Refresh the full satellite x station cross product, at most
    /// `max_concurrent_pairs` in flight. Failed pairs land in the report;
    /// the rest are processed regardless.
    pub async fn refresh_all_at(
        &self,
        catalog: &Arc<Catalog>,
        start: DateTime<Utc>,
    ) -> RefreshReport {
        let semaphore = Arc::new(Semaphore::new(self.refresh.max_concurrent_pairs.max(1)));
        let mut handles = Vec::new();

        for sat_index in 0..catalog.satellites().len() {
            for sta_index in 0..catalog.stations().len() {
                let satellite = &catalog.satellites()[sat_index];
                let station = &catalog.stations()[sta_index];
                let pair = PairKey::new(&satellite.id, &station.id);

                let service = self.clone();
                let catalog = Arc::clone(catalog);
                let semaphore = Arc::clone(&semaphore);
                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                    let satellite = &catalog.satellites()[sat_index];
                    let station = &catalog.stations()[sta_index];
                    service.refresh_pair_at(satellite, station, start).await
                });
                handles.push((pair, handle));
            }
        }

        let mut report = RefreshReport::default();
        for (pair, handle) in handles {
            match handle.await {
                Ok(Ok(outcome)) => {
                    report.refreshed += 1;
                    report.windows += outcome.windows.len();
                }
                Ok(Err(e)) => {
                    log::warn!("refresh failed for {}: {}", pair, e);
                    report.failures.push(PairFailure {
                        pair,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    log::error!("refresh task for {} aborted: {}", pair, e);
                    report.failures.push(PairFailure {
                        pair,
                        reason: format!("task aborted: {e}"),
                    });
                }
            }
        }

        log::info!(
            "refresh finished: {} pairs, {} windows, {} failures",
            report.refreshed,
            report.windows,
            report.failures.len()
        );
        report
    }

    pub async fn refresh_all(&self, catalog: &Arc<Catalog>) -> RefreshReport {
        self.refresh_all_at(catalog, Utc::now()).await
    }

    /// Persisted windows for a pair, sorted by AOS. A store failure is an
    /// explicit error; an empty vec means zero visible passes.
    pub async fn list_windows(&self, pair: &PairKey) -> Result<Vec<ContactWindow>, RefreshError> {
        Ok(self.store.list_pair(pair).await?)
    }
}
