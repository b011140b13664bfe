//! GetCapabilities parsing tolerant of XML namespace variation.
//!
//! Some deployments serve `wfs:FeatureType` bound to the OGC WFS 2.0
//! namespace, others serve bare `FeatureType` tags. Lookup is an explicit
//! two-phase strategy: namespace-aware first, unqualified fallback second,
//! with the phase that matched reported as a tagged result.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::debug;

use wfs_common::{WfsError, WfsResult};

/// The OGC WFS 2.0 namespace URI.
pub const WFS_20_NAMESPACE: &str = "http://www.opengis.net/wfs/2.0";

/// One advertised feature type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTypeDescriptor {
    pub name: String,
    pub title: String,
    pub abstract_: Option<String>,
}

/// Parsed capabilities. `feature_types` is never empty: zero advertised
/// types almost always signals a parse mismatch, not a featureless service,
/// and is modeled as failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub feature_types: Vec<FeatureTypeDescriptor>,
    pub output_formats: Vec<String>,
}

/// Which lookup phase produced the feature-type list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLookup {
    /// `FeatureType` elements bound to the WFS 2.0 namespace.
    Namespaced,
    /// Unqualified tag-name match after the namespaced pass found nothing.
    Unqualified,
    /// Neither pass matched anything.
    NotFound,
}

#[derive(Debug, Clone, Copy)]
enum TagMode {
    Namespaced,
    Unqualified,
}

/// Parse a capabilities document into `Capabilities`.
///
/// Fails with `EmptyCapabilities` when both lookup phases yield zero
/// feature types, and `InvalidResponse` on malformed XML.
pub fn parse_capabilities(xml: &str, source_url: &str) -> WfsResult<Capabilities> {
    let (feature_types, lookup) = resolve_feature_types(xml, source_url)?;

    debug!(
        phase = ?lookup,
        count = feature_types.len(),
        "resolved feature types from capabilities"
    );

    if feature_types.is_empty() {
        return Err(WfsError::EmptyCapabilities {
            url: source_url.to_string(),
        });
    }

    let output_formats = collect_output_formats(xml, source_url)?;

    Ok(Capabilities {
        feature_types,
        output_formats,
    })
}

/// Run the two-phase tag lookup and report which phase matched.
pub fn resolve_feature_types(
    xml: &str,
    source_url: &str,
) -> WfsResult<(Vec<FeatureTypeDescriptor>, TagLookup)> {
    let namespaced = collect_feature_types(xml, TagMode::Namespaced, source_url)?;
    if !namespaced.is_empty() {
        return Ok((namespaced, TagLookup::Namespaced));
    }

    let unqualified = collect_feature_types(xml, TagMode::Unqualified, source_url)?;
    if !unqualified.is_empty() {
        return Ok((unqualified, TagLookup::Unqualified));
    }

    Ok((Vec::new(), TagLookup::NotFound))
}

fn xml_error(source_url: &str, e: impl std::fmt::Display) -> WfsError {
    WfsError::InvalidResponse {
        url: source_url.to_string(),
        message: format!("XML parse error: {}", e),
    }
}

fn tag_matches(resolution: &ResolveResult<'_>, mode: TagMode) -> bool {
    match mode {
        TagMode::Namespaced => {
            matches!(resolution, ResolveResult::Bound(Namespace(ns)) if *ns == WFS_20_NAMESPACE.as_bytes())
        }
        TagMode::Unqualified => true,
    }
}

#[derive(Debug, Clone, Copy)]
enum DescriptorField {
    Name,
    Title,
    Abstract,
}

fn collect_feature_types(
    xml: &str,
    mode: TagMode,
    source_url: &str,
) -> WfsResult<Vec<FeatureTypeDescriptor>> {
    let mut reader = NsReader::from_str(xml);
    reader.trim_text(true);

    let mut types = Vec::new();
    let mut in_feature_type = false;
    let mut field: Option<DescriptorField> = None;
    let mut name = String::new();
    let mut title = String::new();
    let mut abstract_ = String::new();

    loop {
        match reader.read_resolved_event() {
            Ok((resolution, Event::Start(e))) => {
                if !in_feature_type {
                    if e.local_name().as_ref() == b"FeatureType" && tag_matches(&resolution, mode)
                    {
                        in_feature_type = true;
                        name.clear();
                        title.clear();
                        abstract_.clear();
                    }
                } else {
                    field = match e.local_name().as_ref() {
                        b"Name" => Some(DescriptorField::Name),
                        b"Title" => Some(DescriptorField::Title),
                        b"Abstract" => Some(DescriptorField::Abstract),
                        _ => None,
                    };
                }
            }
            Ok((_, Event::Text(t))) if in_feature_type => {
                if let Some(current) = field {
                    let text = t
                        .unescape()
                        .map_err(|e| xml_error(source_url, e))?;
                    match current {
                        DescriptorField::Name => name.push_str(&text),
                        DescriptorField::Title => title.push_str(&text),
                        DescriptorField::Abstract => abstract_.push_str(&text),
                    }
                }
            }
            Ok((resolution, Event::End(e))) => {
                if in_feature_type
                    && e.local_name().as_ref() == b"FeatureType"
                    && tag_matches(&resolution, mode)
                {
                    in_feature_type = false;
                    let trimmed_name = name.trim();
                    if !trimmed_name.is_empty() {
                        let trimmed_abstract = abstract_.trim();
                        types.push(FeatureTypeDescriptor {
                            name: trimmed_name.to_string(),
                            title: title.trim().to_string(),
                            abstract_: if trimmed_abstract.is_empty() {
                                None
                            } else {
                                Some(trimmed_abstract.to_string())
                            },
                        });
                    }
                } else {
                    field = None;
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(xml_error(source_url, e)),
            _ => {}
        }
    }

    Ok(types)
}

/// Collect advertised output formats: `ows:Value` entries under a
/// `Parameter name="outputFormat"` plus `Format` entries under
/// `OutputFormats`, deduplicated in document order.
fn collect_output_formats(xml: &str, source_url: &str) -> WfsResult<Vec<String>> {
    let mut reader = NsReader::from_str(xml);
    reader.trim_text(true);

    let mut formats: Vec<String> = Vec::new();
    let mut in_output_parameter = false;
    let mut in_output_formats = false;
    let mut capturing = false;

    loop {
        match reader.read_resolved_event() {
            Ok((_, Event::Start(e))) => match e.local_name().as_ref() {
                b"Parameter" => {
                    let is_output = e
                        .try_get_attribute("name")
                        .map_err(|err| xml_error(source_url, err))?
                        .map(|attr| attr.value.as_ref() == b"outputFormat")
                        .unwrap_or(false);
                    in_output_parameter = is_output;
                }
                b"OutputFormats" => in_output_formats = true,
                b"Value" if in_output_parameter => capturing = true,
                b"Format" if in_output_formats => capturing = true,
                _ => {}
            },
            Ok((_, Event::Text(t))) if capturing => {
                let text = t
                    .unescape()
                    .map_err(|e| xml_error(source_url, e))?;
                let value = text.trim().to_string();
                if !value.is_empty() && !formats.contains(&value) {
                    formats.push(value);
                }
            }
            Ok((_, Event::End(e))) => match e.local_name().as_ref() {
                b"Parameter" => in_output_parameter = false,
                b"OutputFormats" => in_output_formats = false,
                b"Value" | b"Format" => capturing = false,
                _ => {}
            },
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(xml_error(source_url, e)),
            _ => {}
        }
    }

    Ok(formats)
}
