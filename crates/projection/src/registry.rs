//! Read-only table of known source CRS definitions.

use std::collections::HashMap;
use std::sync::Arc;

use wfs_common::CrsId;

use crate::mercator::WebMercator;
use crate::transform::Projection;
use crate::transverse_mercator::{Ellipsoid, TransverseMercator};

/// Maps EPSG codes to projection definitions.
///
/// Built once, read-only afterwards; `resolve` hands out shared transforms
/// safe for concurrent reprojection calls. Geographic CRSs (EPSG:4326,
/// CRS84, EPSG:4258) are not in the table — they need no transform and
/// callers short-circuit them before resolving.
pub struct ProjectionRegistry {
    definitions: HashMap<u32, Arc<dyn Projection>>,
}

impl ProjectionRegistry {
    /// Empty registry, for callers that supply their own definitions.
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Registry preloaded with the projected CRSs European WFS endpoints
    /// actually serve: ETRS89/UTM zones 28N-38N (EPSG:25828-25838),
    /// WGS84/UTM northern zones (EPSG:326xx), and Web Mercator (EPSG:3857).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for zone in 28..=38u8 {
            registry.register(
                25800 + u32::from(zone),
                Arc::new(TransverseMercator::utm_zone(zone, Ellipsoid::GRS80)),
            );
        }

        for zone in 1..=60u8 {
            registry.register(
                32600 + u32::from(zone),
                Arc::new(TransverseMercator::utm_zone(zone, Ellipsoid::WGS84)),
            );
        }

        registry.register(3857, Arc::new(WebMercator::new()));

        registry
    }

    /// Register a projection definition for an EPSG code. Intended for use
    /// during setup, before the registry is shared.
    pub fn register(&mut self, epsg_code: u32, projection: Arc<dyn Projection>) {
        self.definitions.insert(epsg_code, projection);
    }

    /// Resolve a CRS identifier to its projection definition.
    pub fn resolve(&self, crs: &CrsId) -> Option<Arc<dyn Projection>> {
        match crs {
            CrsId::Epsg(code) => self.definitions.get(code).cloned(),
            CrsId::Crs84 => None,
        }
    }

    /// Whether a definition exists for the given EPSG code.
    pub fn contains(&self, epsg_code: u32) -> bool {
        self.definitions.contains_key(&epsg_code)
    }
}

impl Default for ProjectionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
