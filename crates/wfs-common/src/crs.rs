//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized CRS identifier.
///
/// Real WFS endpoints spell the same CRS half a dozen ways (URN, plain code,
/// OGC URI). Everything is normalized to an EPSG code, with CRS84 kept as a
/// distinct marker since it is the one non-EPSG name that shows up in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsId {
    /// Numeric EPSG code, e.g. 25833.
    Epsg(u32),
    /// OGC CRS84 (geographic lon/lat, equivalent to EPSG:4326).
    Crs84,
}

impl CrsId {
    /// Parse a CRS name as it appears in capabilities documents or the
    /// legacy GeoJSON `crs` member.
    ///
    /// Accepts:
    /// - `urn:ogc:def:crs:EPSG::25833` (any authority version segment)
    /// - `EPSG:25833`
    /// - `http://www.opengis.net/def/crs/EPSG/0/25833`
    /// - anything containing `CRS84`
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        let trimmed = s.trim();
        let upper = trimmed.to_uppercase();

        if upper.contains("CRS84") {
            return Ok(CrsId::Crs84);
        }

        if let Some(rest) = upper.strip_prefix("URN:OGC:DEF:CRS:EPSG") {
            // The segment after the last colon is the code; the version
            // segment between the double colons varies by server.
            if let Some(code) = rest.rsplit(':').next().and_then(|c| c.parse().ok()) {
                return Ok(CrsId::Epsg(code));
            }
        }

        if let Some(rest) = upper.strip_prefix("EPSG:") {
            if let Ok(code) = rest.parse() {
                return Ok(CrsId::Epsg(code));
            }
        }

        if upper.contains("OPENGIS.NET/DEF/CRS/EPSG") {
            if let Some(code) = trimmed.rsplit('/').next().and_then(|c| c.parse().ok()) {
                return Ok(CrsId::Epsg(code));
            }
        }

        Err(CrsParseError::UnrecognizedName(trimmed.to_string()))
    }

    /// True for geographic lon/lat systems that already match GeoJSON's
    /// implicit WGS84 (EPSG:4258 is ETRS89 geographic, identical to WGS84
    /// at the precision web maps care about).
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsId::Crs84 | CrsId::Epsg(4326) | CrsId::Epsg(4258))
    }

    /// The EPSG code, if this identifier has one.
    pub fn epsg_code(&self) -> Option<u32> {
        match self {
            CrsId::Epsg(code) => Some(*code),
            CrsId::Crs84 => Some(4326),
        }
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsId::Epsg(code) => write!(f, "EPSG:{}", code),
            CrsId::Crs84 => write!(f, "CRS84"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unrecognized CRS name: {0}")]
    UnrecognizedName(String),
}
