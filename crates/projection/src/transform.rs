//! The projection transform seam.

/// A pure projected <-> geographic coordinate transform.
///
/// Implementors hold only precomputed constants, so a single instance is
/// safe to share across concurrent reprojection calls.
pub trait Projection: Send + Sync {
    /// Geographic (lon, lat in degrees) to projected (x, y in meters).
    fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64);

    /// Projected (x, y in meters) to geographic (lon, lat in degrees).
    fn unproject(&self, x: f64, y: f64) -> (f64, f64);
}
