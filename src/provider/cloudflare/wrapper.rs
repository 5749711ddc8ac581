#![cfg_attr(test, allow(dead_code))]

use cloudflare::{
    endpoints::dns,
    framework::{
        auth::Credentials,
        response::{ApiFailure, ApiResponse},
        Environment, HttpApiClient, HttpApiClientConfig,
    },
};

use crate::provider::ProviderError;

const CLOUDFLARE_RECORD_PAGE_SIZE: u32 = 100;

/// Internal wrapper around the Cloudflare API. Provides some convenience features such as paged requests
pub struct CloudflareWrapper {
    client: HttpApiClient,
}

impl CloudflareWrapper {
    // Perform a paged request by repeatedly calling the provided request fun with the current page number.
    // page_size must match the page_size in the request. The caller is responsible for ensuring that these match
    fn paged_request<R>(
        &self,
        page_size: usize,
        request: &mut dyn FnMut(u32) -> ApiResponse<Vec<R>>,
    ) -> Result<Vec<R>, ApiFailure> {
        let mut page_counter = 1;

        // Initial failures are never good, return quickly
        let mut results = request(page_counter)?.result;
        let mut current_size = results.len();

        while current_size >= page_size {
            page_counter += 1;
            match request(page_counter) {
                Ok(mut r) => {
                    current_size = r.result.len();
                    results.append(&mut r.result);
                }
                Err(ApiFailure::Error(http::StatusCode::NOT_FOUND, _)) => break,
                Err(e) => return Err(e),
            };
        }
        Ok(results)
    }

    pub fn list_records(
        &self,
        zone_id: &str,
        name: Option<String>,
    ) -> Result<Vec<dns::DnsRecord>, ProviderError> {
        let records = self.paged_request(
            CLOUDFLARE_RECORD_PAGE_SIZE as usize,
            &mut |page_counter: u32| {
                self.client.request(&dns::ListDnsRecords {
                    zone_identifier: zone_id,
                    params: dns::ListDnsRecordsParams {
                        name: name.to_owned(),
                        page: Some(page_counter),
                        per_page: Some(CLOUDFLARE_RECORD_PAGE_SIZE),
                        ..Default::default()
                    },
                })
            },
        )?;
        Ok(records)
    }

    pub fn create_record(
        &self,
        zone_id: &str,
        name: &str,
        proxied: bool,
        content: dns::DnsContent,
    ) -> Result<dns::DnsRecord, ProviderError> {
        let created = self.client.request(&dns::CreateDnsRecord {
            zone_identifier: zone_id,
            params: dns::CreateDnsRecordParams {
                priority: None,
                ttl: None,
                proxied: Some(proxied),
                name,
                content,
            },
        })?;
        Ok(created.result)
    }

    pub fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        ttl: u32,
        proxied: bool,
        content: dns::DnsContent,
    ) -> Result<dns::DnsRecord, ProviderError> {
        let updated = self.client.request(&dns::UpdateDnsRecord {
            zone_identifier: zone_id,
            identifier: record_id,
            params: dns::UpdateDnsRecordParams {
                ttl: Some(ttl),
                proxied: Some(proxied),
                name,
                content,
            },
        })?;
        Ok(updated.result)
    }

    pub fn try_new(credentials: Credentials) -> Result<CloudflareWrapper, ProviderError> {
        let client = HttpApiClient::new(
            credentials,
            HttpApiClientConfig::default(),
            Environment::Production,
        )
        .map_err(|e| ProviderError::Init(e.to_string()))?;
        Ok(CloudflareWrapper { client })
    }
}

#[cfg(test)]
use mockall::mock;

#[cfg(test)]
mock! {
    pub CloudflareWrapper {
        pub fn list_records(
            &self,
            zone_id: &str,
            name: Option<String>,
        ) -> Result<Vec<dns::DnsRecord>, ProviderError>;
        pub fn create_record(
            &self,
            zone_id: &str,
            name: &str,
            proxied: bool,
            content: dns::DnsContent,
        ) -> Result<dns::DnsRecord, ProviderError>;
        pub fn update_record(
            &self,
            zone_id: &str,
            record_id: &str,
            name: &str,
            ttl: u32,
            proxied: bool,
            content: dns::DnsContent,
        ) -> Result<dns::DnsRecord, ProviderError>;
        pub fn try_new(credentials: Credentials) -> Result<Self, ProviderError>;
    }
}
