use std::net::Ipv4Addr;

use log::{debug, trace};
use reqwest::blocking::Client;

use super::{parse_address, Ipv4Source, SourceError};

/// Echo service used when no other endpoint is configured
pub const DEFAULT_ENDPOINT: &str = "https://checkip.amazonaws.com";

/// An Ipv4 address source that asks a public "what is my IP" service for our address.
///
/// The service must answer a plain `GET` with the bare address as the response body,
/// like `checkip.amazonaws.com` or `api.ipify.org` do.
///
/// This source uses a blocking HTTP client, so it must not be called from within an async context.
///
/// To create a new source, use the [`HttpSource::from_config()`] function
#[derive(Debug)]
#[non_exhaustive]
pub struct HttpSource {
    url: String,
    client: Client,
}

/// Configuration for [`HttpSource`]. Must be supplied when creating a [`HttpSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpSourceConfig {
    /// URL of the echo service
    pub url: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        HttpSourceConfig {
            url: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Ipv4Source for HttpSource {
    fn addr(&self) -> Result<Ipv4Addr, SourceError> {
        debug!("Requesting public address from {}", self.url);
        let body = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| SourceError::Network(e.to_string()))?;
        trace!("Address source replied with {:?}", body);
        parse_address(&body)
    }
}

impl HttpSource {
    /// Create a new [`HttpSource`] with the supplied configuration.
    /// Returns an error if the HTTP client cannot be initialized
    pub fn from_config(config: &HttpSourceConfig) -> Result<HttpSource, SourceError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Network(format!("could not initialize HTTP client: {}", e)))?;
        Ok(HttpSource {
            url: config.url.to_owned(),
            client,
        })
    }
}
