//! Error types for WFS client operations.

use std::fmt;

use thiserror::Error;

/// Result type alias using WfsError.
pub type WfsResult<T> = Result<T, WfsError>;

/// The protocol stage a network request belongs to.
///
/// Carried by transport errors so callers can tell whether discovery or
/// retrieval failed without inspecting the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Capabilities,
    Hits,
    GetFeature,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStage::Capabilities => "GetCapabilities",
            RequestStage::Hits => "hits query",
            RequestStage::GetFeature => "GetFeature",
        };
        write!(f, "{}", name)
    }
}

/// Primary error type for WFS client operations.
///
/// Every variant carries the concrete offending URL or CRS name so callers
/// can report it upward and suggest manual retrieval instead of silently
/// substituting synthetic data.
#[derive(Debug, Error)]
pub enum WfsError {
    #[error("Invalid resource URL '{url}': {message}")]
    UrlParse { url: String, message: String },

    #[error("Network error during {stage} against {url}: {message}")]
    Network {
        stage: RequestStage,
        url: String,
        message: String,
    },

    #[error("Request timed out during {stage} against {url}")]
    Timeout { stage: RequestStage, url: String },

    #[error("Capabilities document from {url} advertises no feature types")]
    EmptyCapabilities { url: String },

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Cannot resolve CRS '{0}' to a known projection definition")]
    UnresolvableCrs(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WfsError {
    /// True when retrying against the same resource could plausibly succeed.
    ///
    /// Retry policy itself belongs to the caller; this only classifies.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WfsError::Network { .. } | WfsError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_url() {
        let err = WfsError::Timeout {
            stage: RequestStage::GetFeature,
            url: "https://example.com/wfs".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GetFeature"));
        assert!(msg.contains("https://example.com/wfs"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(WfsError::Network {
            stage: RequestStage::Capabilities,
            url: "https://example.com".to_string(),
            message: "connection reset".to_string(),
        }
        .is_transient());

        assert!(!WfsError::UnresolvableCrs("EPSG:99999".to_string()).is_transient());
        assert!(!WfsError::EmptyCapabilities {
            url: "https://example.com".to_string()
        }
        .is_transient());
    }
}
