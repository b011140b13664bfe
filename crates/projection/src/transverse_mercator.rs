//! Ellipsoidal Transverse Mercator projection.
//!
//! This is the projection behind every UTM-based CRS, including EPSG:25833
//! (ETRS89 / UTM zone 33N) used by Berlin's geodata infrastructure.
//!
//! Formulas follow Snyder, "Map Projections: A Working Manual" (USGS PP 1395),
//! equations 8-9 through 8-13 (forward) and 8-24 through 8-26 with the
//! footpoint-latitude series 3-26 (inverse). Accuracy is sub-millimeter
//! within a UTM zone, far below anything a web map can render.

use std::f64::consts::PI;

use crate::transform::Projection;

/// Reference ellipsoid parameters.
#[derive(Debug, Clone, Copy)]
pub struct Ellipsoid {
    /// Semi-major axis in meters.
    pub a: f64,
    /// Inverse flattening (1/f).
    pub inv_flattening: f64,
}

impl Ellipsoid {
    /// GRS 1980, the ellipsoid of ETRS89 (EPSG:25832, 25833, ...).
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        inv_flattening: 298.257_222_101,
    };

    /// WGS 1984, the ellipsoid of EPSG:326xx UTM zones.
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        inv_flattening: 298.257_223_563,
    };

    /// First eccentricity squared.
    fn e2(&self) -> f64 {
        let f = 1.0 / self.inv_flattening;
        f * (2.0 - f)
    }
}

/// Transverse Mercator projection with precomputed series constants.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in radians.
    lon0: f64,
    /// Scale factor at the central meridian.
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    /// Semi-major axis (meters).
    a: f64,
    /// First eccentricity squared.
    e2: f64,
    /// Second eccentricity squared, e2 / (1 - e2).
    ep2: f64,
    /// Meridian arc series coefficients (forward).
    m0: f64,
    m2: f64,
    m4: f64,
    m6: f64,
    /// Footpoint latitude series coefficients (inverse).
    j1: f64,
    j2: f64,
    j3: f64,
    j4: f64,
}

impl TransverseMercator {
    /// Create a projection from its defining parameters.
    pub fn new(
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let e2 = ellipsoid.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        // Meridian arc coefficients (Snyder 3-21)
        let m0 = 1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0;
        let m2 = 3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0;
        let m4 = 15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0;
        let m6 = 35.0 * e6 / 3072.0;

        // Footpoint series coefficients (Snyder 3-26)
        let sqrt_term = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_term) / (1.0 + sqrt_term);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;
        let j1 = 3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0;
        let j2 = 21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0;
        let j3 = 151.0 * e1_3 / 96.0;
        let j4 = 1097.0 * e1_4 / 512.0;

        Self {
            lon0: lon0_deg * PI / 180.0,
            k0,
            false_easting,
            false_northing,
            a: ellipsoid.a,
            e2,
            ep2: e2 / (1.0 - e2),
            m0,
            m2,
            m4,
            m6,
            j1,
            j2,
            j3,
            j4,
        }
    }

    /// Standard northern-hemisphere UTM zone: central meridian at
    /// `zone * 6 - 183` degrees, k0 = 0.9996, 500 km false easting.
    pub fn utm_zone(zone: u8, ellipsoid: Ellipsoid) -> Self {
        let lon0_deg = f64::from(zone) * 6.0 - 183.0;
        Self::new(lon0_deg, 0.9996, 500_000.0, 0.0, ellipsoid)
    }

    /// Meridian arc length from the equator to latitude `lat` (radians).
    fn meridian_arc(&self, lat: f64) -> f64 {
        self.a
            * (self.m0 * lat - self.m2 * (2.0 * lat).sin() + self.m4 * (4.0 * lat).sin()
                - self.m6 * (6.0 * lat).sin())
    }
}

impl Projection for TransverseMercator {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = self.a / (1.0 - self.e2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = self.ep2 * cos_lat * cos_lat;
        let big_a = dlon * cos_lat;

        let a2 = big_a * big_a;
        let a3 = a2 * big_a;
        let a4 = a3 * big_a;
        let a5 = a4 * big_a;
        let a6 = a5 * big_a;

        let m = self.meridian_arc(lat);

        let x = self.false_easting
            + self.k0
                * n
                * (big_a
                    + (1.0 - t + c) * a3 / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a5 / 120.0);

        let y = self.false_northing
            + self.k0
                * (m + n
                    * tan_lat
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a6
                            / 720.0));

        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        let m = (y - self.false_northing) / self.k0;
        let mu = m / (self.a * self.m0);

        // Footpoint latitude
        let phi1 = mu
            + self.j1 * (2.0 * mu).sin()
            + self.j2 * (4.0 * mu).sin()
            + self.j3 * (6.0 * mu).sin()
            + self.j4 * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = self.ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let denom = 1.0 - self.e2 * sin_phi1 * sin_phi1;
        let n1 = self.a / denom.sqrt();
        let r1 = self.a * (1.0 - self.e2) / (denom * denom.sqrt());
        let d = (x - self.false_easting) / (n1 * self.k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_phi1;

        (lon * to_deg, lat * to_deg)
    }
}
