mod detector;
mod geometry;
mod propagation;
mod types;

pub use detector::{scan, ScanConfig};
pub use geometry::{clamped_asin_deg, elevation_deg, geodetic_to_cartesian};
pub use propagation::{eci_to_geodetic, propagate};
pub use types::{ContactWindow, EciKm, Geodetic, PairKey, WindowStatus};

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

/// Elevation sampler over one satellite / station pair: propagation chained
/// into the spherical elevation geometry. This is what the detector consumes
/// in production; a step where propagation fails yields None.
pub fn elevation_sampler<'a>(
    elements: &'a Elements,
    constants: &'a Constants,
    station: Geodetic,
    earth_radius_km: f64,
) -> impl FnMut(DateTime<Utc>) -> Option<f64> + 'a {
    move |instant| {
        let eci = propagate(elements, constants, instant)?;
        let sat = eci_to_geodetic(&eci, instant, earth_radius_km);
        Some(elevation_deg(&sat, &station, earth_radius_km))
    }
}
