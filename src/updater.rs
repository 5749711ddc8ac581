//! One full update pass: look up our address, then reconcile every configured record.

use std::net::Ipv4Addr;

use itertools::Itertools;
use log::{debug, error, info};

use crate::{
    config::Config,
    ipv4source::{Ipv4Source, SourceError},
    provider::{Provider, ProviderError, RecordFilter},
    reconcile::{reconcile, Outcome},
};

/// An updater performs the complete set of actions needed to bring our records up-to-date
pub struct Updater<P, S> {
    provider: P,
    source: S,
    zone_id: String,
    records: Vec<String>,
}

/// Result of one update cycle. Each record name is listed once per occurrence in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub address: Ipv4Addr,
    pub results: Vec<(String, Result<Outcome, ProviderError>)>,
}

impl CycleReport {
    /// Names whose reconciliation failed, along with the reason
    pub fn failures(&self) -> Vec<(&str, &ProviderError)> {
        self.results
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)))
            .collect_vec()
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }
}

impl<P: Provider, S: Ipv4Source> Updater<P, S> {
    pub fn new(provider: P, source: S, config: &Config) -> Self {
        Updater {
            provider,
            source,
            zone_id: config.zone_id.to_owned(),
            records: config.records.to_owned(),
        }
    }

    /// Check that the provider accepts our credentials and can read the zone, without changing anything.
    ///
    /// Issues a single query for the first configured record, so large zones are not paged through.
    pub fn validate(&self) -> Result<(), ProviderError> {
        let filter = RecordFilter {
            name: self.records.first().cloned(),
        };
        let records = self.provider.list_a_records(&self.zone_id, &filter)?;
        info!(
            "Configuration is valid, found {} A records for {} in zone {}",
            records.len(),
            filter.name.as_deref().unwrap_or("*"),
            self.zone_id
        );
        Ok(())
    }

    /// Run a single update cycle.
    ///
    /// Returns an error only if our address could not be determined, in which case no record is touched.
    /// Failures for individual records are collected in the [`CycleReport`] and do not stop the cycle.
    pub fn run(&self) -> Result<CycleReport, SourceError> {
        let address = match self.source.addr() {
            Ok(a) => a,
            Err(e) => {
                error!("Could not determine public IPv4 address, skipping this cycle: {}", e);
                return Err(e);
            }
        };
        info!("Public IPv4 address: {}", address);

        let results = self
            .records
            .iter()
            .map(|name| {
                let result = reconcile(&self.provider, &self.zone_id, name, address);
                match &result {
                    Ok(o @ Outcome::Unchanged) => debug!("{} -> {}: {}", name, address, o),
                    Ok(o) => info!("{} -> {}: {}", name, address, o),
                    Err(e) => error!("Unable to update {}: {}", name, e),
                }
                (name.to_owned(), result)
            })
            .collect_vec();

        let report = CycleReport { address, results };
        if report.is_success() {
            info!("Cycle complete, all records point to {}", address);
        } else {
            error!(
                "Cycle completed with errors for: {}",
                report.failures().iter().map(|(name, _)| name).join(", ")
            );
        }
        Ok(report)
    }
}
