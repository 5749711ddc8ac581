mod traits;
mod wrapper;

use std::{fmt::Debug, net::Ipv4Addr};

use cloudflare::endpoints::dns;
use itertools::Itertools;
use log::{debug, trace};
use mockall_double::double;

#[double]
use wrapper::CloudflareWrapper;

use super::{ARecord, Provider, ProviderError, RecordFilter};

/// A [`Provider`] connecting to the Cloudflare API for listing, creating and updating A records.
///
/// To create a provider, use the [`CloudflareProvider::from_config()`] function.
#[non_exhaustive]
pub struct CloudflareProvider {
    api: CloudflareWrapper,
    proxied: bool,
}

/// Credentials accepted by the Cloudflare API.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CloudflareCredentials {
    /// Global API key, paired with the account email
    ApiKey { email: String, key: String },
    /// Scoped API token
    ApiToken(String),
}
impl Debug for CloudflareCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the secret itself
        match self {
            CloudflareCredentials::ApiKey { email, .. } => f
                .debug_struct("ApiKey")
                .field("email", email)
                .field("key", &"<redacted>")
                .finish(),
            CloudflareCredentials::ApiToken(_) => {
                f.debug_tuple("ApiToken").field(&"<redacted>").finish()
            }
        }
    }
}

/// Configuration object for a [`CloudflareProvider`]. Must be supplied when creating a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CloudflareProviderConfig<'a> {
    /// The credentials to authenticate with
    pub credentials: &'a CloudflareCredentials,
    /// Whether newly created records should be proxied through Cloudflares protective network.
    /// Existing records keep whatever setting they already have.
    pub proxied: bool,
}

impl CloudflareProvider {
    /// Build a new provider. No request is sent to Cloudflare until the first record operation.
    pub fn from_config(config: &CloudflareProviderConfig) -> Result<CloudflareProvider, ProviderError> {
        let api = CloudflareWrapper::try_new(config.credentials.into())?;
        Ok(CloudflareProvider {
            api,
            proxied: config.proxied,
        })
    }
}

impl Provider for CloudflareProvider {
    fn list_a_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<ARecord>, ProviderError> {
        debug!("Reading records in zone {} matching {:?}", zone_id, filter);
        let records = self
            .api
            .list_records(zone_id, filter.name.to_owned())?
            .iter()
            .filter_map(|r| ARecord::try_from(r).ok())
            .collect_vec();
        trace!("Collected records: {:?}", records);
        Ok(records)
    }

    fn create_a_record(
        &self,
        zone_id: &str,
        name: &str,
        content: Ipv4Addr,
    ) -> Result<ARecord, ProviderError> {
        let created = self.api.create_record(
            zone_id,
            name,
            self.proxied,
            dns::DnsContent::A { content },
        )?;
        debug!("Created record {} in zone {}", created.name, zone_id);
        ARecord::try_from(&created).map_err(ProviderError::Api)
    }

    fn update_a_record(&self, zone_id: &str, record: &ARecord) -> Result<(), ProviderError> {
        self.api.update_record(
            zone_id,
            &record.id,
            &record.name,
            record.ttl,
            record.proxied,
            dns::DnsContent::A {
                content: record.content,
            },
        )?;
        debug!("Updated record {} in zone {}", record, zone_id);
        Ok(())
    }
}
