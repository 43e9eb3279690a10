use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::geometry::clamped_asin_deg;
use crate::predict::types::{EciKm, Geodetic};

/// Inertial position at `instant`, or None when the propagator cannot
/// produce a physical state (decayed orbit, instant outside the epoch
/// conversion range). A None here is a propagation gap, not an error.
pub fn propagate(elements: &Elements, constants: &Constants, instant: DateTime<Utc>) -> Option<EciKm> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&instant.naive_utc())
        .ok()?;
    let prediction = constants.propagate(minutes).ok()?;
    Some(prediction.position)
}

/// Rotate an inertial position to Earth-fixed geodetic coordinates using
/// Greenwich sidereal time at `instant`, on the same spherical Earth model
/// the geometry uses.
pub fn eci_to_geodetic(eci: &EciKm, instant: DateTime<Utc>, earth_radius_km: f64) -> Geodetic {
    let gmst =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()));

    let r = (eci[0] * eci[0] + eci[1] * eci[1] + eci[2] * eci[2]).sqrt();
    if r == 0.0 {
        return Geodetic {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            height_km: -earth_radius_km,
        };
    }

    let latitude_deg = clamped_asin_deg(eci[2] / r);
    let longitude_deg = normalize_longitude_deg((eci[1].atan2(eci[0]) - gmst).to_degrees());

    Geodetic {
        latitude_deg,
        longitude_deg,
        height_km: r - earth_radius_km,
    }
}

/// Wrap into (-180, 180].
fn normalize_longitude_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
