//! GetFeature requests, pagination, and response validation.

use quick_xml::events::Event;
use quick_xml::reader::NsReader;
use serde_json::Value;

use wfs_common::{FeatureCollection, WfsError, WfsResult};

/// One pagination window of a GetFeature request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePage {
    /// Maximum number of features in the page (WFS COUNT).
    pub count: u32,
    /// Zero-based offset of the first feature (WFS STARTINDEX).
    pub start_index: u32,
}

impl Default for FeaturePage {
    fn default() -> Self {
        Self {
            count: 1000,
            start_index: 0,
        }
    }
}

impl FeaturePage {
    pub fn new(count: u32, start_index: u32) -> Self {
        Self { count, start_index }
    }

    /// The window immediately after this one. Pagination over a single
    /// feature type must stay sequential: STARTINDEX ordering is only
    /// meaningful within one request stream.
    pub fn next(&self) -> Self {
        Self {
            count: self.count,
            start_index: self.start_index + self.count,
        }
    }
}

/// Protocol parameters for the main GetFeature request.
pub(crate) fn feature_params(type_name: &str, page: FeaturePage) -> Vec<(&'static str, String)> {
    vec![
        ("SERVICE", "WFS".to_string()),
        ("REQUEST", "GetFeature".to_string()),
        ("VERSION", "2.0.0".to_string()),
        ("TYPENAMES", type_name.to_string()),
        ("OUTPUTFORMAT", "application/json".to_string()),
        ("COUNT", page.count.to_string()),
        ("STARTINDEX", page.start_index.to_string()),
    ]
}

/// Protocol parameters for the advisory hits pre-query.
pub(crate) fn hits_params(type_name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("SERVICE", "WFS".to_string()),
        ("REQUEST", "GetFeature".to_string()),
        ("VERSION", "2.0.0".to_string()),
        ("TYPENAMES", type_name.to_string()),
        ("RESULTTYPE", "hits".to_string()),
    ]
}

/// True when a Content-Type header value declares a JSON payload
/// (`application/json`, `application/geo+json`, charset suffixes, ...).
pub(crate) fn declares_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Validate and deserialize a GetFeature response body.
pub fn parse_feature_collection(body: &str, source_url: &str) -> WfsResult<FeatureCollection> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| WfsError::InvalidResponse {
            url: source_url.to_string(),
            message: format!("body is not a GeoJSON FeatureCollection: {}", e),
        })?;

    if !collection.is_valid() {
        return Err(WfsError::InvalidResponse {
            url: source_url.to_string(),
            message: format!(
                "expected type 'FeatureCollection', got '{}'",
                collection.type_
            ),
        });
    }

    Ok(collection)
}

/// Extract the advisory `numberMatched` total from a hits response.
///
/// WFS 2.0 servers answer with XML carrying a `numberMatched` attribute on
/// the root element; some answer with JSON carrying a `numberMatched`
/// member. Returns None when neither form is present — the total is a
/// hint, never a precondition.
pub fn parse_number_matched(body: &str) -> Option<u64> {
    if let Some(n) = number_matched_from_xml(body) {
        return Some(n);
    }
    number_matched_from_json(body)
}

fn number_matched_from_xml(body: &str) -> Option<u64> {
    let mut reader = NsReader::from_str(body);
    reader.trim_text(true);

    loop {
        match reader.read_resolved_event() {
            Ok((_, Event::Start(e))) | Ok((_, Event::Empty(e))) => {
                // Only the root element carries the attribute.
                return e
                    .try_get_attribute("numberMatched")
                    .ok()
                    .flatten()
                    .and_then(|attr| String::from_utf8(attr.value.into_owned()).ok())
                    .and_then(|v| v.parse().ok());
            }
            Ok((_, Event::Eof)) | Err(_) => return None,
            _ => {}
        }
    }
}

fn number_matched_from_json(body: &str) -> Option<u64> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("numberMatched")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::features;

    const URL: &str = "https://example.com/wfs";

    #[test]
    fn test_feature_params_carry_pagination() {
        let params = feature_params("fis:re_solar", FeaturePage::new(5, 10));
        assert!(params.contains(&("COUNT", "5".to_string())));
        assert!(params.contains(&("STARTINDEX", "10".to_string())));
        assert!(params.contains(&("OUTPUTFORMAT", "application/json".to_string())));
        assert!(params.contains(&("VERSION", "2.0.0".to_string())));
    }

    #[test]
    fn test_consecutive_pages_are_disjoint() {
        let first = FeaturePage::new(5, 0);
        let second = first.next();
        assert_eq!(second.start_index, 5);
        assert_ne!(
            feature_params("t", first),
            feature_params("t", second)
        );
    }

    #[test]
    fn test_default_window() {
        let page = FeaturePage::default();
        assert_eq!(page.count, 1000);
        assert_eq!(page.start_index, 0);
    }

    #[test]
    fn test_declares_json() {
        assert!(declares_json("application/json"));
        assert!(declares_json("application/json; charset=utf-8"));
        assert!(declares_json("application/geo+json"));
        assert!(!declares_json("text/xml"));
        assert!(!declares_json(""));
    }

    #[test]
    fn test_parse_feature_collection() {
        let collection = parse_feature_collection(features::BERLIN_PAGE, URL).unwrap();
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn test_non_collection_body_fails() {
        let err = parse_feature_collection(r#"{"type": "Feature", "geometry": null, "properties": {}, "features": []}"#, URL)
            .unwrap_err();
        assert!(matches!(err, WfsError::InvalidResponse { .. }));

        let err = parse_feature_collection("<html>busy</html>", URL).unwrap_err();
        assert!(matches!(err, WfsError::InvalidResponse { .. }));
    }

    #[test]
    fn test_number_matched_from_xml_attribute() {
        assert_eq!(parse_number_matched(features::HITS_XML), Some(8213));
    }

    #[test]
    fn test_number_matched_from_json_field() {
        let json = r#"{"type": "FeatureCollection", "numberMatched": 42, "features": []}"#;
        assert_eq!(parse_number_matched(json), Some(42));

        let json_string = r#"{"numberMatched": "17"}"#;
        assert_eq!(parse_number_matched(json_string), Some(17));
    }

    #[test]
    fn test_number_matched_absent() {
        assert_eq!(parse_number_matched("<FeatureCollection/>"), None);
        assert_eq!(parse_number_matched(r#"{"type": "FeatureCollection"}"#), None);
        assert_eq!(parse_number_matched("garbage"), None);
    }
}
