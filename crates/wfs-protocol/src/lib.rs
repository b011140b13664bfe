//! OGC WFS 2.0.0 client protocol implementation.
//!
//! Handles the parts where real deployments diverge from the spec:
//! - gateway routing parameters embedded in resource URLs
//! - capabilities documents with inconsistent XML namespace usage
//! - feature data served in regional projected CRSs instead of WGS84

pub mod capabilities;
pub mod client;
pub mod endpoint;
pub mod getfeature;
pub mod reproject;

pub use capabilities::{Capabilities, FeatureTypeDescriptor, TagLookup};
pub use client::{WfsClient, WfsClientConfig};
pub use endpoint::WfsEndpoint;
pub use getfeature::FeaturePage;
pub use reproject::reproject_to_wgs84;
