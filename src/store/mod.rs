mod error;
mod json;
mod memory;

pub use error::StoreError;
pub use json::JsonStore;
pub use memory::MemoryStore;

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::{ContactWindow, PairKey};

/// What a reconciliation changed for one pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaceSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
}

/// Persisted contact windows, keyed by satellite/station pair. Each method
/// must be atomic per pair: a concurrent reader sees either the old set or
/// the new set, never a mix. Serializing writers per pair is the caller's
/// job (the refresh service holds a lock registry).
pub trait WindowStore: Send + Sync {
    /// Windows for the pair, sorted ascending by scheduled AOS. A pair with
    /// no windows yields an empty vec, which is a valid computed outcome,
    /// not an error.
    fn list_pair(
        &self,
        pair: &PairKey,
    ) -> impl Future<Output = Result<Vec<ContactWindow>, StoreError>> + Send;

    /// Supersede the pair's persisted set with `windows`, matching by the
    /// natural key so an unchanged window is an update in place rather than
    /// a delete-and-insert.
    fn replace_pair(
        &self,
        pair: &PairKey,
        windows: &[ContactWindow],
    ) -> impl Future<Output = Result<ReplaceSummary, StoreError>> + Send;

    /// Drop every window for the pair; returns how many were removed.
    fn delete_pair(&self, pair: &PairKey) -> impl Future<Output = Result<usize, StoreError>> + Send;
}

/// Reconcile a fresh window set against the persisted one. The natural key
/// is (satellite, station, scheduled AOS); within one pair the AOS alone
/// identifies a window. Returns the merged set sorted by AOS plus a change
/// summary.
pub fn merge_by_natural_key(
    existing: Vec<ContactWindow>,
    new: &[ContactWindow],
) -> (Vec<ContactWindow>, ReplaceSummary) {
    let mut summary = ReplaceSummary::default();
    let mut remaining: HashMap<DateTime<Utc>, ContactWindow> = existing
        .into_iter()
        .map(|w| (w.scheduled_aos, w))
        .collect();

    let mut merged = Vec::with_capacity(new.len());
    for window in new {
        match remaining.remove(&window.scheduled_aos) {
            Some(old) if old == *window => {
                summary.unchanged += 1;
                merged.push(old);
            }
            Some(_) => {
                summary.updated += 1;
                merged.push(window.clone());
            }
            None => {
                summary.inserted += 1;
                merged.push(window.clone());
            }
        }
    }
    summary.removed = remaining.len();

    merged.sort_by_key(|w| w.scheduled_aos);
    (merged, summary)
}

fn check_pair(pair: &PairKey, windows: &[ContactWindow]) -> Result<(), StoreError> {
    for window in windows {
        let found = window.pair_key();
        if found != *pair {
            return Err(StoreError::PairMismatch {
                expected: pair.clone(),
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::predict::{ContactWindow, PairKey, WindowStatus};

    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    pub fn window(pair: &PairKey, aos_offset_secs: i64, max_elevation: f64) -> ContactWindow {
        let aos = base_time() + Duration::seconds(aos_offset_secs);
        let los = aos + Duration::seconds(600);
        ContactWindow {
            satellite_id: pair.satellite_id.clone(),
            ground_station_id: pair.ground_station_id.clone(),
            scheduled_aos: aos,
            scheduled_los: los,
            elements_used_id: "elem-1".to_string(),
            max_elevation_deg: max_elevation,
            duration_seconds: 600,
            status: WindowStatus::Scheduled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::window;
    use super::*;

    fn pair() -> PairKey {
        PairKey::new("sat-1", "gs-1")
    }

    #[test]
    fn fresh_windows_are_all_inserts() {
        let p = pair();
        let new = vec![window(&p, 0, 45.0), window(&p, 7200, 30.0)];
        let (merged, summary) = merge_by_natural_key(Vec::new(), &new);

        assert_eq!(merged, new);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.updated + summary.unchanged + summary.removed, 0);
    }

    #[test]
    fn matching_aos_updates_in_place() {
        let p = pair();
        let old = vec![window(&p, 0, 45.0), window(&p, 7200, 30.0)];
        let mut changed = window(&p, 0, 45.0);
        changed.max_elevation_deg = 50.0;
        let new = vec![changed, window(&p, 7200, 30.0)];

        let (merged, summary) = merge_by_natural_key(old, &new);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.removed, 0);
        assert_eq!(merged[0].max_elevation_deg, 50.0);
    }

    #[test]
    fn stale_windows_are_removed() {
        let p = pair();
        let old = vec![window(&p, 0, 45.0), window(&p, 7200, 30.0)];
        let new = vec![window(&p, 7200, 30.0)];

        let (merged, summary) = merge_by_natural_key(old, &new);
        assert_eq!(merged.len(), 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.unchanged, 1);
    }

    #[test]
    fn merged_output_is_sorted_by_aos() {
        let p = pair();
        let new = vec![window(&p, 7200, 30.0), window(&p, 0, 45.0)];
        let (merged, _) = merge_by_natural_key(Vec::new(), &new);
        assert!(merged[0].scheduled_aos < merged[1].scheduled_aos);
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let p = pair();
        let other = PairKey::new("sat-2", "gs-1");
        let err = check_pair(&p, &[window(&other, 0, 45.0)]);
        assert!(matches!(err, Err(StoreError::PairMismatch { .. })));
    }
}
