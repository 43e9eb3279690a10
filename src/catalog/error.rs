use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid TLE for {name}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("invalid ground station {id}: {message}")]
    InvalidStation { id: String, message: String },
    #[error("satellite not found: {0}")]
    SatelliteNotFound(String),
    #[error("ground station not found: {0}")]
    StationNotFound(String),
}
