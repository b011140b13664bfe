//! WFS endpoint URL normalization.
//!
//! Portal gateways hide WFS services behind URLs that mix protocol
//! parameters with routing parameters of their own (e.g. Berlin's
//! `ogcsl.ashx?nodeId=298`). Normalization strips the protocol parameters,
//! which the client sets itself per request, and preserves everything else
//! so routing survives every subsequent request.

use url::Url;

use wfs_common::{WfsError, WfsResult};

/// Query parameter keys owned by the WFS protocol. Compared
/// case-insensitively; never preserved from the input URL.
const RESERVED_KEYS: [&str; 9] = [
    "SERVICE",
    "REQUEST",
    "VERSION",
    "TYPENAME",
    "TYPENAMES",
    "OUTPUTFORMAT",
    "COUNT",
    "STARTINDEX",
    "RESULTTYPE",
];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS
        .iter()
        .any(|reserved| key.eq_ignore_ascii_case(reserved))
}

/// A normalized WFS endpoint: a query-free base URL plus the ordered
/// non-protocol query parameters to carry on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfsEndpoint {
    base_url: Url,
    preserved_params: Vec<(String, String)>,
}

impl WfsEndpoint {
    /// Normalize an arbitrary resource URL into an endpoint.
    ///
    /// Protocol parameters are dropped in any casing; all other parameters
    /// are retained in their original order.
    pub fn from_resource_url(raw: &str) -> WfsResult<Self> {
        let mut url = Url::parse(raw).map_err(|e| WfsError::UrlParse {
            url: raw.to_string(),
            message: e.to_string(),
        })?;

        let preserved_params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            base_url: url,
            preserved_params,
        })
    }

    /// The stable base URL, guaranteed query-free.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The non-protocol parameters preserved from the resource URL.
    pub fn preserved_params(&self) -> &[(String, String)] {
        &self.preserved_params
    }

    /// Build a request URL: protocol parameters first, preserved routing
    /// parameters appended after them.
    pub fn request_url(&self, protocol_params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in protocol_params {
                pairs.append_pair(key, value);
            }
            for (key, value) in &self.preserved_params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}
