//! GeoJSON types per RFC 7946, tolerant of real-world WFS output.
//!
//! WFS servers attach non-standard members (`numberMatched`, `totalFeatures`,
//! the legacy `crs` object) to their FeatureCollections. Those are preserved
//! through deserialize/serialize round trips via flattened maps so nothing a
//! server sent is lost downstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON position: [x, y] or [x, y, z].
///
/// Kept as a Vec rather than a fixed array because servers do emit elevation
/// as a third element and it must survive reprojection untouched.
pub type Position = Vec<f64>;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection" on valid input).
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<Feature>,

    /// Legacy `crs` member. May be present on input, never on output of
    /// the reprojector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsMember>,

    /// Any other members the server attached (numberMatched, timeStamp, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
            crs: None,
            extra: Map::new(),
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// True when the type member carries the mandatory value.
    pub fn is_valid(&self) -> bool {
        self.type_ == "FeatureCollection"
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Optional feature identifier; servers emit strings or numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// The geometry, which RFC 7946 allows to be null.
    pub geometry: Option<Geometry>,

    /// Property payload, passed through unmodified.
    #[serde(default)]
    pub properties: Value,

    /// Any other members the server attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    /// Create a feature with the given geometry and null properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: Some(geometry),
            properties: Value::Null,
            extra: Map::new(),
        }
    }

    /// Set the properties payload.
    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }
}

/// A geometry value as found in the wild.
///
/// Known kinds deserialize into the typed union; anything else (including
/// vendor extensions with unknown `type` values) is retained as raw JSON so
/// one odd geometry cannot fail an entire collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Known(KnownGeometry),
    Unrecognized(Value),
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Known(KnownGeometry::Point {
            coordinates: vec![x, y],
        })
    }

    /// Create a line string geometry.
    pub fn line_string(coordinates: Vec<Position>) -> Self {
        Geometry::Known(KnownGeometry::LineString { coordinates })
    }

    /// Create a polygon geometry.
    pub fn polygon(coordinates: Vec<Vec<Position>>) -> Self {
        Geometry::Known(KnownGeometry::Polygon { coordinates })
    }
}

/// The RFC 7946 geometry kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KnownGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        /// Linear rings; first is the exterior, the rest are holes.
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

/// The legacy GeoJSON `crs` member.
///
/// The standard form is `{"type": "name", "properties": {"name": ...}}`;
/// some servers emit a bare string instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrsMember {
    Named {
        #[serde(rename = "type")]
        type_: String,
        properties: CrsProperties,
    },
    Plain(String),
}

impl CrsMember {
    /// The CRS name string, whichever form carried it.
    pub fn name(&self) -> &str {
        match self {
            CrsMember::Named { properties, .. } => &properties.name,
            CrsMember::Plain(name) => name,
        }
    }
}

/// Properties of a named `crs` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "numberMatched": 42,
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::25833"}},
            "features": [
                {
                    "type": "Feature",
                    "id": "lamp.1",
                    "geometry": {"type": "Point", "coordinates": [390000.0, 5819000.0]},
                    "properties": {"street": "Unter den Linden"}
                }
            ]
        }"#;

        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        assert!(fc.is_valid());
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.crs.as_ref().unwrap().name(), "urn:ogc:def:crs:EPSG::25833");
        assert_eq!(fc.extra.get("numberMatched"), Some(&Value::from(42)));

        match &fc.features[0].geometry {
            Some(Geometry::Known(KnownGeometry::Point { coordinates })) => {
                assert_eq!(coordinates, &vec![390000.0, 5819000.0]);
            }
            other => panic!("Expected Point geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_geometry_type_is_retained() {
        let json = r#"{
            "type": "Feature",
            "geometry": {"type": "CircularString", "coordinates": [[0, 0], [1, 1], [2, 0]]},
            "properties": null
        }"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        match &feature.geometry {
            Some(Geometry::Unrecognized(value)) => {
                assert_eq!(value["type"], "CircularString");
            }
            other => panic!("Expected unrecognized geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_null_geometry() {
        let json = r#"{"type": "Feature", "geometry": null, "properties": {}}"#;
        let feature: Feature = serde_json::from_str(json).unwrap();
        assert!(feature.geometry.is_none());
    }

    #[test]
    fn test_crs_member_plain_string() {
        let json = r#"{"type": "FeatureCollection", "crs": "EPSG:25833", "features": []}"#;
        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(fc.crs.as_ref().unwrap().name(), "EPSG:25833");
    }

    #[test]
    fn test_serialize_omits_absent_crs() {
        let fc = FeatureCollection::new().with_feature(Feature::new(Geometry::point(13.4, 52.5)));
        let json = serde_json::to_string(&fc).unwrap();
        assert!(!json.contains("\"crs\""));
        assert!(json.contains("\"FeatureCollection\""));
    }

    #[test]
    fn test_geometry_collection_round_trip() {
        let json = r#"{
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [1.0, 2.0]},
                {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
            ]
        }"#;

        let geom: Geometry = serde_json::from_str(json).unwrap();
        match &geom {
            Geometry::Known(KnownGeometry::GeometryCollection { geometries }) => {
                assert_eq!(geometries.len(), 2);
            }
            other => panic!("Expected GeometryCollection, got {:?}", other),
        }

        let back = serde_json::to_value(&geom).unwrap();
        assert_eq!(back["type"], "GeometryCollection");
        assert_eq!(back["geometries"][0]["type"], "Point");
    }

    #[test]
    fn test_position_with_elevation() {
        let json = r#"{"type": "Point", "coordinates": [13.4, 52.5, 34.0]}"#;
        let geom: Geometry = serde_json::from_str(json).unwrap();
        match geom {
            Geometry::Known(KnownGeometry::Point { coordinates }) => {
                assert_eq!(coordinates.len(), 3);
                assert_eq!(coordinates[2], 34.0);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }
}
