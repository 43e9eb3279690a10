use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Earth-centered inertial position in kilometers.
pub type EciKm = [f64; 3];

/// Latitude/longitude in degrees, height above the spherical Earth in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
}

/// Identifies one satellite / ground station combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub satellite_id: String,
    pub ground_station_id: String,
}

impl PairKey {
    pub fn new(satellite_id: impl Into<String>, ground_station_id: impl Into<String>) -> Self {
        Self {
            satellite_id: satellite_id.into(),
            ground_station_id: ground_station_id.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.satellite_id, self.ground_station_id)
    }
}

/// Set by observation collaborators after the fact, never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    Scheduled,
    Completed,
    Missed,
}

/// A predicted visibility interval for one satellite over one ground station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactWindow {
    pub satellite_id: String,
    pub ground_station_id: String,
    pub scheduled_aos: DateTime<Utc>,
    pub scheduled_los: DateTime<Utc>,
    pub elements_used_id: String,
    pub max_elevation_deg: f64,
    pub duration_seconds: i64,
    pub status: WindowStatus,
}

impl ContactWindow {
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.satellite_id, &self.ground_station_id)
    }
}
