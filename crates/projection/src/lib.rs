//! Coordinate reference system transformations.
//!
//! Implements map projections from scratch without external dependencies.

pub mod mercator;
pub mod registry;
pub mod transform;
pub mod transverse_mercator;

pub use mercator::WebMercator;
pub use registry::ProjectionRegistry;
pub use transform::Projection;
pub use transverse_mercator::{Ellipsoid, TransverseMercator};
