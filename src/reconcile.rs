//! Converge a single record name onto the desired address.

use std::{fmt::Display, net::Ipv4Addr};

use log::{debug, warn};

use crate::provider::{ARecord, Provider, ProviderError, RecordFilter};

/// What [`reconcile()`] had to do to bring a record up-to-date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No A record existed, a new one was created
    Created,
    /// An existing A record pointed elsewhere and was rewritten
    Updated { previous: Ipv4Addr },
    /// The record already pointed at the desired address, nothing was written
    Unchanged,
}
impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Updated { previous } => write!(f, "updated (was {})", previous),
            Outcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Ensure that `name` in `zone_id` has an A record pointing at `desired`.
///
/// If the provider returns several A records for the name, only the first one is considered.
/// Only the record content is ever changed, all other record settings are written back as-is.
/// Calling this again with the same address performs no writes.
pub fn reconcile<P: Provider + ?Sized>(
    provider: &P,
    zone_id: &str,
    name: &str,
    desired: Ipv4Addr,
) -> Result<Outcome, ProviderError> {
    let existing = provider.list_a_records(zone_id, &RecordFilter::by_name(name))?;
    if existing.len() > 1 {
        warn!(
            "Found {} A records for {}, only the first one will be managed",
            existing.len(),
            name
        );
    }

    match existing.into_iter().next() {
        None => {
            debug!("No A record for {}, creating one", name);
            provider.create_a_record(zone_id, name, desired)?;
            Ok(Outcome::Created)
        }
        Some(current) if current.content == desired => Ok(Outcome::Unchanged),
        Some(current) => {
            let previous = current.content;
            debug!("Record {} is outdated, pointing it to {}", current, desired);
            provider.update_a_record(
                zone_id,
                &ARecord {
                    content: desired,
                    ..current
                },
            )?;
            Ok(Outcome::Updated { previous })
        }
    }
}
