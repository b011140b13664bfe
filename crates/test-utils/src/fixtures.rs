//! Capabilities documents and GeoJSON pages as served by real endpoints,
//! trimmed to the parts the parsers look at.

/// GetCapabilities fixtures.
pub mod capabilities {
    /// WFS 2.0 document with properly namespaced `wfs:FeatureType` tags,
    /// modeled after a Berlin Geoportal gateway response.
    pub const NAMESPACED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:WFS_Capabilities version="2.0.0"
    xmlns:wfs="http://www.opengis.net/wfs/2.0"
    xmlns:ows="http://www.opengis.net/ows/1.1"
    xmlns:fis="http://www.berlin.de/broker">
  <ows:ServiceIdentification>
    <ows:Title>Energieatlas Berlin</ows:Title>
    <ows:Abstract>Renewable energy registry</ows:Abstract>
  </ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetFeature">
      <ows:Parameter name="outputFormat">
        <ows:AllowedValues>
          <ows:Value>application/gml+xml; version=3.2</ows:Value>
          <ows:Value>application/json</ows:Value>
          <ows:Value>text/xml; subtype=gml/3.2.1</ows:Value>
        </ows:AllowedValues>
      </ows:Parameter>
    </ows:Operation>
  </ows:OperationsMetadata>
  <wfs:FeatureTypeList>
    <wfs:FeatureType>
      <wfs:Name>fis:re_solar</wfs:Name>
      <wfs:Title>Solaranlagen</wfs:Title>
      <wfs:Abstract>Installed solar panels per district</wfs:Abstract>
      <wfs:DefaultCRS>urn:ogc:def:crs:EPSG::25833</wfs:DefaultCRS>
      <wfs:OutputFormats>
        <wfs:Format>application/json</wfs:Format>
      </wfs:OutputFormats>
    </wfs:FeatureType>
    <wfs:FeatureType>
      <wfs:Name>fis:re_wind</wfs:Name>
      <wfs:Title>Windenergieanlagen</wfs:Title>
      <wfs:DefaultCRS>urn:ogc:def:crs:EPSG::25833</wfs:DefaultCRS>
    </wfs:FeatureType>
  </wfs:FeatureTypeList>
</wfs:WFS_Capabilities>
"#;

    /// The same catalog served without any namespace declarations, as some
    /// gateway products do.
    pub const UNNAMESPACED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WFS_Capabilities version="2.0.0">
  <OperationsMetadata>
    <Operation name="GetFeature">
      <Parameter name="outputFormat">
        <AllowedValues>
          <Value>application/gml+xml; version=3.2</Value>
          <Value>application/json</Value>
          <Value>text/xml; subtype=gml/3.2.1</Value>
        </AllowedValues>
      </Parameter>
    </Operation>
  </OperationsMetadata>
  <FeatureTypeList>
    <FeatureType>
      <Name>fis:re_solar</Name>
      <Title>Solaranlagen</Title>
      <Abstract>Installed solar panels per district</Abstract>
      <OutputFormats>
        <Format>application/json</Format>
      </OutputFormats>
    </FeatureType>
    <FeatureType>
      <Name>fis:re_wind</Name>
      <Title>Windenergieanlagen</Title>
    </FeatureType>
  </FeatureTypeList>
</WFS_Capabilities>
"#;

    /// Structurally valid capabilities with no advertised feature types.
    pub const EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:WFS_Capabilities version="2.0.0" xmlns:wfs="http://www.opengis.net/wfs/2.0">
  <wfs:FeatureTypeList/>
</wfs:WFS_Capabilities>
"#;
}

/// GetFeature response fixtures.
pub mod features {
    /// One page of EPSG:25833 features near Berlin.
    pub const BERLIN_PAGE: &str = r#"{
  "type": "FeatureCollection",
  "numberMatched": 8213,
  "numberReturned": 2,
  "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::25833"}},
  "features": [
    {
      "type": "Feature",
      "id": "re_solar.101",
      "geometry": {"type": "Point", "coordinates": [390000.0, 5819000.0]},
      "properties": {"district": "Mitte", "kw_peak": 12.5}
    },
    {
      "type": "Feature",
      "id": "re_solar.102",
      "geometry": {
        "type": "LineString",
        "coordinates": [[390100.0, 5819050.0], [390200.0, 5819100.0]]
      },
      "properties": {"district": "Pankow", "kw_peak": 8.0}
    }
  ]
}"#;

    /// A page already in WGS84, served without a crs member.
    pub const WGS84_PAGE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": 1,
      "geometry": {"type": "Point", "coordinates": [13.4049, 52.5200]},
      "properties": {"name": "Berlin"}
    },
    {
      "type": "Feature",
      "id": 2,
      "geometry": null,
      "properties": {"name": "no geometry"}
    }
  ]
}"#;

    /// Every RFC 7946 geometry kind, in EPSG:25833 around Berlin.
    pub const ALL_GEOMETRIES_25833: &str = r#"{
  "type": "FeatureCollection",
  "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::25833"}},
  "features": [
    {
      "type": "Feature",
      "geometry": {"type": "Point", "coordinates": [390000.0, 5819000.0]},
      "properties": {"kind": "point"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "LineString",
        "coordinates": [[390000.0, 5819000.0], [390500.0, 5819500.0]]
      },
      "properties": {"kind": "linestring"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "Polygon",
        "coordinates": [
          [[390000.0, 5819000.0], [390500.0, 5819000.0], [390500.0, 5819500.0], [390000.0, 5819000.0]],
          [[390100.0, 5819100.0], [390200.0, 5819100.0], [390200.0, 5819200.0], [390100.0, 5819100.0]]
        ]
      },
      "properties": {"kind": "polygon"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "MultiPoint",
        "coordinates": [[390000.0, 5819000.0], [391000.0, 5820000.0]]
      },
      "properties": {"kind": "multipoint"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[390000.0, 5819000.0], [390500.0, 5819500.0]],
          [[391000.0, 5820000.0], [391500.0, 5820500.0]]
        ]
      },
      "properties": {"kind": "multilinestring"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[390000.0, 5819000.0], [390500.0, 5819000.0], [390500.0, 5819500.0], [390000.0, 5819000.0]]],
          [[[391000.0, 5820000.0], [391500.0, 5820000.0], [391500.0, 5820500.0], [391000.0, 5820000.0]]]
        ]
      },
      "properties": {"kind": "multipolygon"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "GeometryCollection",
        "geometries": [
          {"type": "Point", "coordinates": [390000.0, 5819000.0]},
          {"type": "LineString", "coordinates": [[390000.0, 5819000.0], [390500.0, 5819500.0]]}
        ]
      },
      "properties": {"kind": "collection"}
    }
  ]
}"#;

    /// A WFS 2.0 hits response.
    pub const HITS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0"
    timeStamp="2024-05-01T10:00:00Z" numberMatched="8213" numberReturned="0"/>
"#;
}
