//! A way to retrieve the public IPv4 address that all managed A records should point to.
//! Each source implements the [`Ipv4Source`] trait.
//!
//! The following sources are currently available:
//! - [`HttpSource`]: Asks a public IP echo service (such as `checkip.amazonaws.com`) for our address

mod echo;

pub use self::echo::{HttpSource, HttpSourceConfig, DEFAULT_ENDPOINT};

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use thiserror::Error;

/// An `Ipv4Source` can be used to retrieve a single IPv4 address for use in DNS records.
///
/// Sources never cache: every call to [`Ipv4Source::addr()`] looks the address up again.
#[cfg_attr(test, mockall::automock)]
pub trait Ipv4Source {
    fn addr(&self) -> Result<Ipv4Addr, SourceError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The lookup request could not be completed
    #[error("unable to reach address source: {0}")]
    Network(String),
    #[error("source returned an invalid IP address: {0:?}")]
    InvalidAddress(String),
    #[error("source returned {0}, which is not an IPv4 address")]
    NotIpv4(Ipv6Addr),
}

/// Parse the text returned by an IP echo service into an IPv4 address.
/// Surrounding whitespace (usually a trailing newline) is ignored.
pub fn parse_address(body: &str) -> Result<Ipv4Addr, SourceError> {
    let trimmed = body.trim();
    match trimmed.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => Ok(v4),
        // IPv4-mapped addresses (::ffff:a.b.c.d) still carry an IPv4 address
        Ok(IpAddr::V6(v6)) => v6.to_ipv4_mapped().ok_or(SourceError::NotIpv4(v6)),
        Err(_) => Err(SourceError::InvalidAddress(trimmed.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::{parse_address, SourceError};

    #[test]
    fn should_parse_trailing_newline() {
        assert_eq!(
            parse_address("203.0.113.7\n"),
            Ok(Ipv4Addr::new(203, 0, 113, 7))
        );
    }

    #[test]
    fn should_trim_surrounding_whitespace() {
        assert_eq!(
            parse_address("  \t198.51.100.5 \r\n"),
            Ok(Ipv4Addr::new(198, 51, 100, 5))
        );
    }

    #[test]
    fn should_reject_garbage() {
        assert_eq!(
            parse_address("not-an-ip"),
            Err(SourceError::InvalidAddress("not-an-ip".to_string()))
        );
        assert!(matches!(
            parse_address(""),
            Err(SourceError::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_address("<html>Too Many Requests</html>"),
            Err(SourceError::InvalidAddress(_))
        ));
    }

    #[test]
    fn should_reject_ipv6() {
        assert!(matches!(
            parse_address("2001:db8::1\n"),
            Err(SourceError::NotIpv4(_))
        ));
    }

    #[test]
    fn should_unwrap_ipv4_mapped_addresses() {
        assert_eq!(
            parse_address("::ffff:203.0.113.7"),
            Ok(Ipv4Addr::new(203, 0, 113, 7))
        );
    }
}
