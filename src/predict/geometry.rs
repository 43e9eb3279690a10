use crate::predict::types::Geodetic;

/// Geocentric Cartesian coordinates on the spherical Earth model.
pub fn geodetic_to_cartesian(geo: &Geodetic, earth_radius_km: f64) -> [f64; 3] {
    let r = earth_radius_km + geo.height_km;
    let lat = geo.latitude_deg.to_radians();
    let lon = geo.longitude_deg.to_radians();
    [
        r * lat.cos() * lon.cos(),
        r * lat.cos() * lon.sin(),
        r * lat.sin(),
    ]
}

/// Elevation of the satellite above the station's local horizon, in degrees.
/// Positive means above the horizon. The local "up" direction is the
/// station's geocentric position vector, not the ellipsoidal normal, so this
/// is the spherical approximation and not true WGS-84 topocentric elevation.
pub fn elevation_deg(sat: &Geodetic, station: &Geodetic, earth_radius_km: f64) -> f64 {
    let sat_xyz = geodetic_to_cartesian(sat, earth_radius_km);
    let sta_xyz = geodetic_to_cartesian(station, earth_radius_km);

    let to_sat = [
        sat_xyz[0] - sta_xyz[0],
        sat_xyz[1] - sta_xyz[1],
        sat_xyz[2] - sta_xyz[2],
    ];
    let range = norm(to_sat);
    let up = norm(sta_xyz);

    if range == 0.0 || up == 0.0 {
        // Coincident points sit on the zenith axis.
        return 90.0;
    }

    let ratio = dot(to_sat, sta_xyz) / (range * up);
    clamped_asin_deg(ratio)
}

/// asin in degrees with the argument clamped to [-1, 1]. Floating error in
/// the dot-product ratio must never surface as NaN.
pub fn clamped_asin_deg(ratio: f64) -> f64 {
    ratio.clamp(-1.0, 1.0).asin().to_degrees()
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARTH_RADIUS_KM: f64 = 6371.0;

    fn geo(lat: f64, lon: f64, height_km: f64) -> Geodetic {
        Geodetic {
            latitude_deg: lat,
            longitude_deg: lon,
            height_km,
        }
    }

    #[test]
    fn satellite_at_zenith_is_ninety_degrees() {
        let station = geo(10.0, 20.0, 0.0);
        let sat = geo(10.0, 20.0, 400.0);
        let el = elevation_deg(&sat, &station, EARTH_RADIUS_KM);
        assert!((el - 90.0).abs() < 1e-6, "elevation was {el}");
    }

    #[test]
    fn antipodal_satellite_is_below_horizon() {
        let station = geo(0.0, 0.0, 0.0);
        let sat = geo(0.0, 180.0, 400.0);
        let el = elevation_deg(&sat, &station, EARTH_RADIUS_KM);
        assert!(el < -80.0, "elevation was {el}");
    }

    #[test]
    fn satellite_near_horizon_is_slightly_negative() {
        // 90 degrees of central angle away: geometrically below the horizon
        // plane for any finite altitude below one Earth radius of height.
        let station = geo(0.0, 0.0, 0.0);
        let sat = geo(0.0, 90.0, 400.0);
        let el = elevation_deg(&sat, &station, EARTH_RADIUS_KM);
        assert!(el < 0.0, "elevation was {el}");
        assert!(el > -90.0);
    }

    #[test]
    fn clamp_swallows_floating_point_overshoot() {
        let el = clamped_asin_deg(1.000_000_1);
        assert!(!el.is_nan());
        assert!((el - 90.0).abs() < 1e-9);

        let el = clamped_asin_deg(-1.000_000_1);
        assert!(!el.is_nan());
        assert!((el + 90.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_do_not_divide_by_zero() {
        let station = geo(45.0, 45.0, 0.0);
        let el = elevation_deg(&station, &station, EARTH_RADIUS_KM);
        assert!(!el.is_nan());
        assert_eq!(el, 90.0);
    }

    #[test]
    fn elevation_grows_as_satellite_approaches_zenith() {
        let station = geo(0.0, 0.0, 0.0);
        let far = elevation_deg(&geo(0.0, 20.0, 500.0), &station, EARTH_RADIUS_KM);
        let near = elevation_deg(&geo(0.0, 5.0, 500.0), &station, EARTH_RADIUS_KM);
        let overhead = elevation_deg(&geo(0.0, 0.0, 500.0), &station, EARTH_RADIUS_KM);
        assert!(far < near);
        assert!(near < overhead);
    }
}
