//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::PI;

use crate::transform::Projection;

/// Web Mercator on the WGS84 sphere, as served by tile and vector services
/// that deliver "meters" coordinates.
#[derive(Debug, Clone)]
pub struct WebMercator {
    radius: f64,
}

impl WebMercator {
    pub fn new() -> Self {
        Self { radius: 6_378_137.0 }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for WebMercator {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let x = self.radius * lon_deg * to_rad;
        let y = self.radius * (PI / 4.0 + lat_deg * to_rad / 2.0).tan().ln();
        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;
        let lon = x / self.radius * to_deg;
        let lat = (2.0 * (y / self.radius).exp().atan() - PI / 2.0) * to_deg;
        (lon, lat)
    }
}
