use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sgp4::{Constants, Elements};
use uuid::Uuid;

use super::error::CatalogError;
use crate::predict::Geodetic;

/// Where an element set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Live,
    Simulated,
}

/// One two-line element set, parsed and ready to propagate. Immutable; a
/// refresh of a satellite's elements produces a new set with a new id.
pub struct ElementSet {
    pub id: String,
    pub name: Option<String>,
    pub norad_id: u64,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
    pub provenance: Provenance,
    pub elements: Elements,
    pub constants: Constants,
}

impl ElementSet {
    /// Malformed element lines are a fatal input error for the satellite that
    /// carries them.
    pub fn from_tle(
        name: Option<String>,
        line1: &str,
        line2: &str,
        provenance: Provenance,
    ) -> Result<Self, CatalogError> {
        let display_name = name.clone().unwrap_or_else(|| "unnamed".to_string());

        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes()).map_err(|e| {
            CatalogError::InvalidTle {
                name: display_name.clone(),
                message: e.to_string(),
            }
        })?;
        let constants = Constants::from_elements(&elements).map_err(|e| CatalogError::InvalidTle {
            name: display_name,
            message: e.to_string(),
        })?;

        let epoch = DateTime::from_naive_utc_and_offset(elements.datetime, Utc);

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: elements.object_name.clone(),
            norad_id: elements.norad_id,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch,
            provenance,
            elements,
            constants,
        })
    }
}

/// A tracked satellite with its current element set. Exactly one element set
/// is current at a time; refreshing elements swaps the whole set.
pub struct Satellite {
    pub id: String,
    pub name: String,
    pub classification: Provenance,
    pub elements: ElementSet,
}

impl Satellite {
    pub fn from_elements(elements: ElementSet) -> Self {
        let name = elements
            .name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        Self {
            id: elements.norad_id.to_string(),
            name,
            classification: elements.provenance,
            elements,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundStation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl GroundStation {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(CatalogError::InvalidStation {
                id: self.id.clone(),
                message: format!("latitude {} out of [-90, 90]", self.latitude_deg),
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(CatalogError::InvalidStation {
                id: self.id.clone(),
                message: format!("longitude {} out of [-180, 180]", self.longitude_deg),
            });
        }
        if !self.altitude_m.is_finite() {
            return Err(CatalogError::InvalidStation {
                id: self.id.clone(),
                message: "altitude is not finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn geodetic(&self) -> Geodetic {
        Geodetic {
            latitude_deg: self.latitude_deg,
            longitude_deg: self.longitude_deg,
            height_km: self.altitude_m / 1000.0,
        }
    }
}
