mod error;
mod tle;
mod types;

pub use error::CatalogError;
pub use types::{ElementSet, GroundStation, Provenance, Satellite};

use std::path::Path;

/// The satellites and ground stations a refresh operates over.
pub struct Catalog {
    satellites: Vec<Satellite>,
    stations: Vec<GroundStation>,
}

impl Catalog {
    /// Station validation happens here so nothing downstream ever sees an
    /// out-of-range geodetic position.
    pub fn new(
        satellites: Vec<Satellite>,
        stations: Vec<GroundStation>,
    ) -> Result<Self, CatalogError> {
        for station in &stations {
            station.validate()?;
        }
        Ok(Self {
            satellites,
            stations,
        })
    }

    /// Build a catalog from a TLE directory and the configured stations.
    pub fn load(tle_folder: &Path, stations: Vec<GroundStation>) -> Result<Self, CatalogError> {
        let satellites = tle::load_dir(tle_folder)?;
        log::info!(
            "catalog loaded: {} satellites, {} stations",
            satellites.len(),
            stations.len()
        );
        for satellite in &satellites {
            log::debug!(
                "satellite {} current elements {} (epoch {}):\n{}\n{}",
                satellite.id,
                satellite.elements.id,
                satellite.elements.epoch,
                satellite.elements.line1,
                satellite.elements.line2
            );
        }
        Self::new(satellites, stations)
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn stations(&self) -> &[GroundStation] {
        &self.stations
    }

    pub fn satellite(&self, id: &str) -> Result<&Satellite, CatalogError> {
        self.satellites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::SatelliteNotFound(id.to_string()))
    }

    pub fn station(&self, id: &str) -> Result<&GroundStation, CatalogError> {
        self.stations
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::StationNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64) -> GroundStation {
        GroundStation {
            id: id.to_string(),
            name: None,
            latitude_deg: lat,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }

    #[test]
    fn rejects_catalogs_with_invalid_stations() {
        let err = Catalog::new(Vec::new(), vec![station("gs-bad", 91.0)]);
        assert!(matches!(err, Err(CatalogError::InvalidStation { .. })));
    }

    #[test]
    fn lookups_report_missing_ids() {
        let catalog = Catalog::new(Vec::new(), vec![station("gs-1", 10.0)]).unwrap();
        assert!(catalog.station("gs-1").is_ok());
        assert!(matches!(
            catalog.station("gs-2"),
            Err(CatalogError::StationNotFound(_))
        ));
        assert!(matches!(
            catalog.satellite("25544"),
            Err(CatalogError::SatelliteNotFound(_))
        ));
    }
}
