use chrono::{DateTime, Duration, Utc};

use crate::predict::types::{ContactWindow, PairKey, WindowStatus};

/// Parameters for one visibility scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    pub start: DateTime<Utc>,
    pub step_seconds: u32,
    pub horizon_minutes: u32,
    pub min_elevation_deg: f64,
}

enum ScanState {
    OutOfContact,
    InContact {
        aos: DateTime<Utc>,
        max_elevation: f64,
    },
}

/// Step through the scan horizon and collect every pass whose peak elevation
/// reaches the configured threshold. `sample` returns the elevation in
/// degrees at an instant, or None when no position is available; a missing
/// sample counts as below the horizon. The contact opens on a strict
/// `elevation > 0` and closes on `elevation <= 0`, so an exact-zero sample
/// never double-opens or holds a pass open. A pass still open when the
/// horizon ends is dropped without emitting a partial window.
pub fn scan<F>(
    pair: &PairKey,
    elements_used_id: &str,
    config: &ScanConfig,
    mut sample: F,
) -> Vec<ContactWindow>
where
    F: FnMut(DateTime<Utc>) -> Option<f64>,
{
    let step = Duration::seconds(i64::from(config.step_seconds.max(1)));
    let end = config.start + Duration::minutes(i64::from(config.horizon_minutes));

    let mut windows = Vec::new();
    let mut state = ScanState::OutOfContact;
    let mut cursor = config.start;

    while cursor <= end {
        let elevation = sample(cursor);

        state = match state {
            ScanState::OutOfContact => match elevation {
                Some(el) if el > 0.0 => ScanState::InContact {
                    aos: cursor,
                    max_elevation: el,
                },
                _ => ScanState::OutOfContact,
            },
            ScanState::InContact { aos, max_elevation } => match elevation {
                Some(el) if el > 0.0 => ScanState::InContact {
                    aos,
                    max_elevation: max_elevation.max(el),
                },
                _ => {
                    if max_elevation >= config.min_elevation_deg {
                        windows.push(close_window(pair, elements_used_id, aos, cursor, max_elevation));
                    }
                    ScanState::OutOfContact
                }
            },
        };

        cursor += step;
    }

    if let ScanState::InContact { aos, .. } = state {
        log::debug!("dropping pass for {} still open at scan end (aos {})", pair, aos);
    }

    windows
}

fn close_window(
    pair: &PairKey,
    elements_used_id: &str,
    aos: DateTime<Utc>,
    los: DateTime<Utc>,
    max_elevation: f64,
) -> ContactWindow {
    ContactWindow {
        satellite_id: pair.satellite_id.clone(),
        ground_station_id: pair.ground_station_id.clone(),
        scheduled_aos: aos,
        scheduled_los: los,
        elements_used_id: elements_used_id.to_string(),
        max_elevation_deg: max_elevation,
        duration_seconds: (los - aos).num_seconds(),
        status: WindowStatus::Scheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pair() -> PairKey {
        PairKey::new("sat-1", "gs-1")
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn config(min_elevation_deg: f64) -> ScanConfig {
        ScanConfig {
            start: start(),
            step_seconds: 10,
            horizon_minutes: 60,
            min_elevation_deg,
        }
    }

    /// Parabolic elevation profile: rises above zero between `up` and `down`
    /// seconds after scan start, peaking at `peak` degrees in the middle.
    fn arc(up: f64, down: f64, peak: f64) -> impl FnMut(DateTime<Utc>) -> Option<f64> {
        let t0 = start();
        move |t: DateTime<Utc>| {
            let s = (t - t0).num_seconds() as f64;
            let mid = (up + down) / 2.0;
            let half = (down - up) / 2.0;
            let x = (s - mid) / half;
            Some(peak * (1.0 - x * x))
        }
    }

    #[test]
    fn overhead_pass_emits_exactly_one_window() {
        // Above the horizon from t=100s to t=500s, peaking ~90 at t=300s.
        let windows = scan(&pair(), "elem-1", &config(10.0), arc(100.0, 500.0, 90.0));

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        // First strictly-positive sample lands on the first step after 100 s.
        assert_eq!((w.scheduled_aos - start()).num_seconds(), 110);
        assert_eq!((w.scheduled_los - start()).num_seconds(), 500);
        assert!(w.max_elevation_deg > 89.0, "peak {}", w.max_elevation_deg);
        assert_eq!(w.duration_seconds, 390);
        assert_eq!(w.status, WindowStatus::Scheduled);
    }

    #[test]
    fn never_visible_profile_emits_nothing() {
        let windows = scan(&pair(), "elem-1", &config(10.0), |_| Some(-25.0));
        assert!(windows.is_empty());
    }

    #[test]
    fn sub_threshold_pass_is_discarded() {
        // Detected above the horizon, but peaking at 5 deg with a 10 deg
        // threshold: silently dropped.
        let windows = scan(&pair(), "elem-1", &config(10.0), arc(100.0, 500.0, 5.0));
        assert!(windows.is_empty());
    }

    #[test]
    fn pass_open_at_horizon_end_is_dropped() {
        let mut cfg = config(10.0);
        cfg.horizon_minutes = 5;
        // Rises at t=100s and stays up past the 300 s horizon.
        let windows = scan(&pair(), "elem-1", &cfg, arc(100.0, 10_000.0, 80.0));
        assert!(windows.is_empty());
    }

    #[test]
    fn propagation_gap_closes_the_window() {
        let t0 = start();
        let windows = scan(&pair(), "elem-1", &config(10.0), |t| {
            let s = (t - t0).num_seconds();
            if (200..=240).contains(&s) {
                None
            } else {
                arc(100.0, 500.0, 80.0)(t)
            }
        });

        // The gap splits the pass; only the tail that re-crosses the
        // threshold survives.
        assert_eq!(windows.len(), 2);
        assert_eq!((windows[0].scheduled_los - t0).num_seconds(), 200);
        assert!((windows[1].scheduled_aos - t0).num_seconds() > 240);
    }

    #[test]
    fn multiple_passes_come_out_ordered_and_disjoint() {
        let t0 = start();
        // Two arcs within the hour.
        let windows = scan(&pair(), "elem-1", &config(10.0), |t| {
            let s = (t - t0).num_seconds() as f64;
            if s < 1500.0 {
                arc(100.0, 500.0, 45.0)(t)
            } else {
                arc(2000.0, 2600.0, 60.0)(t)
            }
        });

        assert_eq!(windows.len(), 2);
        for w in &windows {
            assert!(w.scheduled_aos < w.scheduled_los);
            assert_eq!(
                w.duration_seconds,
                (w.scheduled_los - w.scheduled_aos).num_seconds()
            );
            assert!(w.max_elevation_deg >= 10.0);
        }
        assert!(windows[0].scheduled_los <= windows[1].scheduled_aos);
    }

    #[test]
    fn exact_zero_elevation_stays_out_of_contact() {
        let windows = scan(&pair(), "elem-1", &config(0.0), |_| Some(0.0));
        assert!(windows.is_empty());
    }
}
