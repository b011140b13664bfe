//! Common types shared across the wfs-client crates.

pub mod crs;
pub mod error;
pub mod geojson;

pub use crs::{CrsId, CrsParseError};
pub use error::{RequestStage, WfsError, WfsResult};
pub use geojson::{CrsMember, Feature, FeatureCollection, Geometry, KnownGeometry, Position};
