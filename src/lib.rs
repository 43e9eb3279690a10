//! Contact window prediction for satellite ground stations: SGP4
//! propagation, spherical-Earth elevation geometry, a threshold-crossing
//! visibility detector, and idempotent reconciliation against a persisted
//! window store.

pub mod catalog;
pub mod config;
pub mod predict;
pub mod refresh;
pub mod store;
