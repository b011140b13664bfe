//! Recursive reprojection of FeatureCollections into WGS84.

use projection::{Projection, ProjectionRegistry};
use tracing::{debug, warn};

use wfs_common::{
    CrsId, FeatureCollection, Geometry, KnownGeometry, Position, WfsError, WfsResult,
};

/// Reproject a FeatureCollection into WGS84.
///
/// The source CRS is taken from `source_override` when given, otherwise from
/// the collection's legacy `crs` member; a collection without either is
/// assumed to already be WGS84, as RFC 7946 prescribes. Geographic sources
/// short-circuit: the output is the input minus the `crs` member.
///
/// The input is never mutated. On `UnresolvableCrs` the caller still holds
/// the original collection and may fall back to serving unprojected data.
pub fn reproject_to_wgs84(
    registry: &ProjectionRegistry,
    collection: &FeatureCollection,
    source_override: Option<CrsId>,
) -> WfsResult<FeatureCollection> {
    let source = match source_override {
        Some(crs) => crs,
        None => match &collection.crs {
            Some(member) => CrsId::parse(member.name())
                .map_err(|_| WfsError::UnresolvableCrs(member.name().to_string()))?,
            None => {
                debug!("no crs member present; assuming WGS84 per the GeoJSON default");
                magnitude_diagnostic(collection);
                CrsId::Crs84
            }
        },
    };

    let mut output = collection.clone();
    // WGS84 is implicit in GeoJSON; the legacy member never appears on output.
    output.crs = None;

    if source.is_geographic() {
        return Ok(output);
    }

    let transform = registry
        .resolve(&source)
        .ok_or_else(|| WfsError::UnresolvableCrs(source.to_string()))?;

    for feature in &mut output.features {
        if let Some(geometry) = feature.geometry.take() {
            feature.geometry = remap_geometry(geometry, transform.as_ref());
        }
    }

    Ok(output)
}

/// Remap every position of a geometry, recursing through collections.
/// Returns None for JSON-null children so GeometryCollections can drop them.
fn remap_geometry(geometry: Geometry, transform: &dyn Projection) -> Option<Geometry> {
    match geometry {
        Geometry::Known(kind) => Some(Geometry::Known(remap_kind(kind, transform))),
        Geometry::Unrecognized(value) => {
            if value.is_null() {
                return None;
            }
            warn!(
                geometry_type = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("<missing>"),
                "unsupported geometry type passed through without reprojection"
            );
            Some(Geometry::Unrecognized(value))
        }
    }
}

fn remap_kind(kind: KnownGeometry, transform: &dyn Projection) -> KnownGeometry {
    match kind {
        KnownGeometry::Point { coordinates } => KnownGeometry::Point {
            coordinates: remap_position(coordinates, transform),
        },
        KnownGeometry::LineString { coordinates } => KnownGeometry::LineString {
            coordinates: remap_positions(coordinates, transform),
        },
        KnownGeometry::MultiPoint { coordinates } => KnownGeometry::MultiPoint {
            coordinates: remap_positions(coordinates, transform),
        },
        KnownGeometry::Polygon { coordinates } => KnownGeometry::Polygon {
            coordinates: remap_rings(coordinates, transform),
        },
        KnownGeometry::MultiLineString { coordinates } => KnownGeometry::MultiLineString {
            coordinates: remap_rings(coordinates, transform),
        },
        KnownGeometry::MultiPolygon { coordinates } => KnownGeometry::MultiPolygon {
            coordinates: coordinates
                .into_iter()
                .map(|polygon| remap_rings(polygon, transform))
                .collect(),
        },
        KnownGeometry::GeometryCollection { geometries } => KnownGeometry::GeometryCollection {
            geometries: geometries
                .into_iter()
                .filter_map(|child| remap_geometry(child, transform))
                .collect(),
        },
    }
}

fn remap_rings(rings: Vec<Vec<Position>>, transform: &dyn Projection) -> Vec<Vec<Position>> {
    rings
        .into_iter()
        .map(|ring| remap_positions(ring, transform))
        .collect()
}

fn remap_positions(positions: Vec<Position>, transform: &dyn Projection) -> Vec<Position> {
    positions
        .into_iter()
        .map(|position| remap_position(position, transform))
        .collect()
}

/// Transform the first two elements of a position; elevation and any
/// further elements pass through untouched.
fn remap_position(mut position: Position, transform: &dyn Projection) -> Position {
    if position.len() >= 2 {
        let (lon, lat) = transform.unproject(position[0], position[1]);
        position[0] = lon;
        position[1] = lat;
    }
    position
}

/// Diagnostic only: coordinates beyond the geographic range suggest the
/// server delivered a projected CRS without declaring it. Logged, never
/// used for detection — a missing `crs` member is spec-valid WGS84.
fn magnitude_diagnostic(collection: &FeatureCollection) {
    let suspicious = collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .find_map(first_position)
        .filter(|pos| pos.len() >= 2 && pos.iter().take(2).any(|v| v.abs() > 180.0));

    if let Some(position) = suspicious {
        warn!(
            x = position[0],
            y = position[1],
            "coordinates exceed geographic range; source may be an undeclared projected CRS"
        );
    }
}

fn first_position(geometry: &Geometry) -> Option<&Position> {
    match geometry {
        Geometry::Known(kind) => match kind {
            KnownGeometry::Point { coordinates } => Some(coordinates),
            KnownGeometry::LineString { coordinates }
            | KnownGeometry::MultiPoint { coordinates } => coordinates.first(),
            KnownGeometry::Polygon { coordinates }
            | KnownGeometry::MultiLineString { coordinates } => {
                coordinates.first().and_then(|ring| ring.first())
            }
            KnownGeometry::MultiPolygon { coordinates } => coordinates
                .first()
                .and_then(|polygon| polygon.first())
                .and_then(|ring| ring.first()),
            KnownGeometry::GeometryCollection { geometries } => {
                geometries.iter().find_map(first_position)
            }
        },
        Geometry::Unrecognized(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_utils::fixtures::features;
    use wfs_common::CrsMember;

    fn registry() -> ProjectionRegistry {
        ProjectionRegistry::with_defaults()
    }

    fn berlin_collection() -> FeatureCollection {
        serde_json::from_str(features::BERLIN_PAGE).unwrap()
    }

    fn assert_wgs84_berlin(position: &[f64]) {
        assert!(
            (13.0..=13.8).contains(&position[0]),
            "lon out of range: {}",
            position[0]
        );
        assert!(
            (52.3..=52.7).contains(&position[1]),
            "lat out of range: {}",
            position[1]
        );
    }

    #[test]
    fn test_epsg25833_point_lands_in_berlin() {
        let output = reproject_to_wgs84(&registry(), &berlin_collection(), None).unwrap();
        assert!(output.crs.is_none());

        match &output.features[0].geometry {
            Some(Geometry::Known(KnownGeometry::Point { coordinates })) => {
                assert_wgs84_berlin(coordinates);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_properties_and_extras_preserved() {
        let input = berlin_collection();
        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();

        assert_eq!(output.features.len(), input.features.len());
        for (before, after) in input.features.iter().zip(&output.features) {
            assert_eq!(before.properties, after.properties);
            assert_eq!(before.id, after.id);
        }
        assert_eq!(input.extra, output.extra);
    }

    #[test]
    fn test_geographic_input_is_identity_minus_crs() {
        let mut input: FeatureCollection = serde_json::from_str(features::WGS84_PAGE).unwrap();
        input.crs = Some(CrsMember::Plain("urn:ogc:def:crs:OGC:1.3:CRS84".to_string()));

        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();

        let mut expected = input.clone();
        expected.crs = None;
        assert_eq!(output, expected);
    }

    #[test]
    fn test_missing_crs_assumed_wgs84() {
        let input: FeatureCollection = serde_json::from_str(features::WGS84_PAGE).unwrap();
        assert!(input.crs.is_none());

        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();
        assert_eq!(output.features, input.features);
    }

    #[test]
    fn test_explicit_override_wins() {
        // Collection tagged WGS84, but the caller knows better.
        let mut input = berlin_collection();
        input.crs = Some(CrsMember::Plain("EPSG:4326".to_string()));

        let output =
            reproject_to_wgs84(&registry(), &input, Some(CrsId::Epsg(25833))).unwrap();
        match &output.features[0].geometry {
            Some(Geometry::Known(KnownGeometry::Point { coordinates })) => {
                assert_wgs84_berlin(coordinates);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_crs_fails_without_touching_input() {
        let input = berlin_collection();
        let err =
            reproject_to_wgs84(&registry(), &input, Some(CrsId::Epsg(99999))).unwrap_err();
        assert!(matches!(err, WfsError::UnresolvableCrs(_)));
        // Input still carries its crs member and projected coordinates.
        assert!(input.crs.is_some());
    }

    #[test]
    fn test_all_geometry_kinds_preserve_nesting() {
        let input: FeatureCollection =
            serde_json::from_str(features::ALL_GEOMETRIES_25833).unwrap();
        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();

        assert_eq!(output.features.len(), input.features.len());
        for (before, after) in input.features.iter().zip(&output.features) {
            let before_value = serde_json::to_value(&before.geometry).unwrap();
            let after_value = serde_json::to_value(&after.geometry).unwrap();
            assert_eq!(
                before_value["type"], after_value["type"],
                "geometry type must survive"
            );
            assert_eq!(
                nesting_depth(&before_value["coordinates"]),
                nesting_depth(&after_value["coordinates"]),
                "nesting depth must survive for {}",
                before_value["type"]
            );
        }
    }

    fn nesting_depth(value: &serde_json::Value) -> usize {
        match value.as_array().and_then(|a| a.first()) {
            Some(inner) => 1 + nesting_depth(inner),
            None => 0,
        }
    }

    #[test]
    fn test_geometry_collection_recursion() {
        let input: FeatureCollection =
            serde_json::from_str(features::ALL_GEOMETRIES_25833).unwrap();
        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();

        let collection_feature = output
            .features
            .iter()
            .find_map(|f| match &f.geometry {
                Some(Geometry::Known(KnownGeometry::GeometryCollection { geometries })) => {
                    Some(geometries)
                }
                _ => None,
            })
            .expect("fixture contains a GeometryCollection");

        match &collection_feature[0] {
            Geometry::Known(KnownGeometry::Point { coordinates }) => {
                assert_wgs84_berlin(coordinates);
            }
            other => panic!("Expected Point child, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_geometry_passes_through() {
        let input: FeatureCollection = serde_json::from_str(
            r#"{
                "type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::25833"}},
                "features": [
                    {"type": "Feature",
                     "geometry": {"type": "CircularString", "coordinates": [[390000.0, 5819000.0]]},
                     "properties": {"kept": true}},
                    {"type": "Feature",
                     "geometry": {"type": "Point", "coordinates": [390000.0, 5819000.0]},
                     "properties": {}}
                ]
            }"#,
        )
        .unwrap();

        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();
        assert_eq!(output.features.len(), 2);

        // Odd geometry unchanged, with its projected coordinates intact.
        match &output.features[0].geometry {
            Some(Geometry::Unrecognized(value)) => {
                assert_eq!(value["type"], "CircularString");
                assert_eq!(value["coordinates"][0][0], json!(390000.0));
            }
            other => panic!("Expected unrecognized geometry, got {:?}", other),
        }
        // Its sibling still got reprojected.
        match &output.features[1].geometry {
            Some(Geometry::Known(KnownGeometry::Point { coordinates })) => {
                assert_wgs84_berlin(coordinates);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_elevation_passes_through() {
        let input: FeatureCollection = serde_json::from_str(
            r#"{
                "type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "EPSG:25833"}},
                "features": [
                    {"type": "Feature",
                     "geometry": {"type": "Point", "coordinates": [390000.0, 5819000.0, 34.5]},
                     "properties": null}
                ]
            }"#,
        )
        .unwrap();

        let output = reproject_to_wgs84(&registry(), &input, None).unwrap();
        match &output.features[0].geometry {
            Some(Geometry::Known(KnownGeometry::Point { coordinates })) => {
                assert_eq!(coordinates.len(), 3);
                assert_eq!(coordinates[2], 34.5);
                assert_wgs84_berlin(coordinates);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_deterministic_output() {
        let input = berlin_collection();
        let first = reproject_to_wgs84(&registry(), &input, None).unwrap();
        let second = reproject_to_wgs84(&registry(), &input, None).unwrap();
        assert_eq!(first, second);
    }
}
