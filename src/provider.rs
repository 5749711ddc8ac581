//! DNS providers that serve the A records we keep up to date.
//!
//! A provider only needs to expose the three operations the reconciler uses:
//! listing A records by name, creating a record and updating an existing one.
//! Currently only [`CloudflareProvider`] is implemented.

mod cloudflare;

// Re-exports for convenience
pub use self::cloudflare::{CloudflareCredentials, CloudflareProvider, CloudflareProviderConfig};

use std::{fmt::Display, net::Ipv4Addr};

use thiserror::Error;

/// A provider is any DNS service provider that can read and modify A records in a zone.
#[cfg_attr(test, mockall::automock)]
pub trait Provider {
    /// Returns all A records in `zone_id` matching `filter`, in the order the provider returned them.
    fn list_a_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<ARecord>, ProviderError>;

    /// Create a new A record named `name` pointing at `content`.
    fn create_a_record(
        &self,
        zone_id: &str,
        name: &str,
        content: Ipv4Addr,
    ) -> Result<ARecord, ProviderError>;

    /// Overwrite the record identified by `record.id` with the given fields.
    fn update_a_record(&self, zone_id: &str, record: &ARecord) -> Result<(), ProviderError>;
}

/// Errors returned by a provider action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The API client could not be constructed from the supplied credentials
    #[error("unable to initialize provider client: {0}")]
    Init(String),
    /// The provider API answered with an error
    #[error("provider API error: {0}")]
    Api(String),
    /// The request never produced a usable response
    #[error("request failed: {0}")]
    Request(String),
}

/// Filter applied when listing records. An empty filter matches every A record in the zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RecordFilter {
    pub name: Option<String>,
}

impl RecordFilter {
    pub fn by_name(name: &str) -> Self {
        RecordFilter {
            name: Some(name.to_owned()),
        }
    }
}

/// An A record as stored by a provider.
///
/// `ttl` and `proxied` are provider-side settings that must survive an update untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ARecord {
    pub id: String,
    pub name: String,
    pub content: Ipv4Addr,
    pub ttl: u32,
    pub proxied: bool,
}
impl Display for ARecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: A {} ({})", self.name, self.content, self.id)
    }
}
