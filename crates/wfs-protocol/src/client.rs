//! HTTP client for WFS operations.
//!
//! An explicit client object owned by the caller and passed by dependency
//! injection; it wraps one reqwest connection pool with bounded timeouts.
//! The client performs no implicit retries — retry policy is a backpressure
//! decision that belongs to the caller.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{instrument, warn};
use url::Url;

use wfs_common::{FeatureCollection, RequestStage, WfsError, WfsResult};

use crate::capabilities::{parse_capabilities, Capabilities};
use crate::endpoint::WfsEndpoint;
use crate::getfeature::{
    declares_json, feature_params, hits_params, parse_feature_collection, parse_number_matched,
    FeaturePage,
};

/// Configuration for the WFS client.
#[derive(Debug, Clone)]
pub struct WfsClientConfig {
    /// Per-request timeout covering connect-to-last-byte.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for WfsClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("wfs-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Stateless WFS protocol client.
///
/// Every operation issues at most one awaited HTTP GET and retains nothing
/// across calls, so concurrent use against unrelated feature types is safe
/// and dropping an in-flight future cancels cleanly.
pub struct WfsClient {
    client: reqwest::Client,
    config: WfsClientConfig,
}

impl WfsClient {
    /// Create a client with the given configuration.
    pub fn new(config: WfsClientConfig) -> WfsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WfsError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> WfsResult<Self> {
        Self::new(WfsClientConfig::default())
    }

    pub fn config(&self) -> &WfsClientConfig {
        &self.config
    }

    async fn get(&self, url: Url, stage: RequestStage) -> WfsResult<reqwest::Response> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(e, stage, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WfsError::Network {
                stage,
                url: url.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        Ok(response)
    }

    async fn body_text(
        &self,
        response: reqwest::Response,
        stage: RequestStage,
        url: &Url,
    ) -> WfsResult<String> {
        response
            .text()
            .await
            .map_err(|e| transport_error(e, stage, url))
    }

    /// Issue GetCapabilities and parse the feature-type catalog.
    #[instrument(skip(self), fields(base = %endpoint.base_url()))]
    pub async fn get_capabilities(&self, endpoint: &WfsEndpoint) -> WfsResult<Capabilities> {
        let url = endpoint.request_url(&[("SERVICE", "WFS"), ("REQUEST", "GetCapabilities")]);
        let stage = RequestStage::Capabilities;

        let response = self.get(url.clone(), stage).await?;
        let body = self.body_text(response, stage, &url).await?;
        parse_capabilities(&body, url.as_str())
    }

    /// Fetch one page of features as a GeoJSON FeatureCollection.
    ///
    /// Geometries and properties pass through unmodified; reprojection is a
    /// separate, explicit step.
    #[instrument(skip(self), fields(base = %endpoint.base_url(), type_name, count = page.count, start_index = page.start_index))]
    pub async fn get_feature_page(
        &self,
        endpoint: &WfsEndpoint,
        type_name: &str,
        page: FeaturePage,
    ) -> WfsResult<FeatureCollection> {
        let params = feature_params(type_name, page);
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = endpoint.request_url(&borrowed);
        let stage = RequestStage::GetFeature;

        let response = self.get(url.clone(), stage).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !declares_json(&content_type) {
            return Err(WfsError::InvalidResponse {
                url: url.to_string(),
                message: format!(
                    "requested application/json but server answered with '{}'",
                    content_type
                ),
            });
        }

        let body = self.body_text(response, stage, &url).await?;
        parse_feature_collection(&body, url.as_str())
    }

    /// Ask the server how many features match, via `RESULTTYPE=hits`.
    ///
    /// Advisory only: every failure is swallowed and reported as 0 so a
    /// broken hits implementation never blocks the actual fetch.
    #[instrument(skip(self), fields(base = %endpoint.base_url(), type_name))]
    pub async fn get_number_matched(&self, endpoint: &WfsEndpoint, type_name: &str) -> u64 {
        let params = hits_params(type_name);
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = endpoint.request_url(&borrowed);

        let response = match self.get(url.clone(), RequestStage::Hits).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "hits query failed, continuing without a total");
                return 0;
            }
        };

        match self.body_text(response, RequestStage::Hits, &url).await {
            Ok(body) => parse_number_matched(&body).unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "hits response unreadable, continuing without a total");
                0
            }
        }
    }
}

fn transport_error(e: reqwest::Error, stage: RequestStage, url: &Url) -> WfsError {
    if e.is_timeout() {
        WfsError::Timeout {
            stage,
            url: url.to_string(),
        }
    } else {
        WfsError::Network {
            stage,
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WfsClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("wfs-client/"));
    }

    #[test]
    fn test_client_construction() {
        let client = WfsClient::with_defaults().unwrap();
        assert_eq!(client.config().request_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Reserved TEST-NET-1 address; connections fail fast or time out.
        let client = WfsClient::new(WfsClientConfig {
            request_timeout: Duration::from_millis(250),
            connect_timeout: Duration::from_millis(250),
            ..WfsClientConfig::default()
        })
        .unwrap();

        let endpoint = WfsEndpoint::from_resource_url("http://192.0.2.1/wfs?nodeId=5").unwrap();
        let err = client.get_capabilities(&endpoint).await.unwrap_err();
        assert!(err.is_transient(), "expected transport error, got {}", err);
    }
}
