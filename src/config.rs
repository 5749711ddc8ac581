//! Parsing of the TOML configuration document.
//!
//! ```toml
//! email = "admin@example.com"   # together with apiKey, or use apiToken instead
//! apiKey = "0123456789abcdef"
//! zoneID = "023e105f4ecef8ad9ca31a8372d0c353"
//! records = ["example.com", "www.example.com"]
//! proxied = true                # optional, applies to newly created records
//! ```

use std::{io::Read, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::provider::CloudflareCredentials;

/// Email of the placeholder configuration shipped with deployments
pub const DUMMY_EMAIL: &str = "email";
/// API token of the placeholder configuration shipped with deployments
pub const DUMMY_API_TOKEN: &str = "token";

/// Validated, immutable configuration for one updater instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credentials: CloudflareCredentials,
    pub zone_id: String,
    /// Record names to manage, in configuration order. Duplicates are kept.
    pub records: Vec<String>,
    /// Proxy setting for newly created records
    pub proxied: bool,
}

/// A configuration document as read at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedConfig {
    /// The placeholder shipped with deployments. Its other fields are not validated.
    Dummy,
    Ready(Config),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read configuration: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required configuration key `{0}`")]
    Missing(&'static str),
    #[error("configuration key `{0}` must not be empty")]
    Empty(&'static str),
    #[error("missing credentials: set either `apiToken` or both `email` and `apiKey`")]
    MissingCredentials,
    #[error("conflicting credentials: `apiToken` cannot be combined with `email` or `apiKey`")]
    ConflictingCredentials,
}

// The document as written by the user, before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawConfig {
    email: Option<String>,
    api_key: Option<String>,
    api_token: Option<String>,
    #[serde(rename = "zoneID")]
    zone_id: Option<String>,
    records: Option<Vec<String>>,
    proxied: Option<bool>,
}

impl RawConfig {
    // Only the placeholder credential is inspected, the rest of the document may still be blank
    fn is_dummy(&self) -> bool {
        self.email.as_deref() == Some(DUMMY_EMAIL)
            || self.api_token.as_deref() == Some(DUMMY_API_TOKEN)
    }
}

fn non_empty(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value {
        None => Err(ConfigError::Missing(key)),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(key)),
        Some(v) => Ok(v),
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let credentials = match (raw.email, raw.api_key, raw.api_token) {
            (None, None, Some(token)) => {
                CloudflareCredentials::ApiToken(non_empty(Some(token), "apiToken")?)
            }
            (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingCredentials)
            }
            (None, None, None) => return Err(ConfigError::MissingCredentials),
            (email, key, None) => CloudflareCredentials::ApiKey {
                email: non_empty(email, "email")?,
                key: non_empty(key, "apiKey")?,
            },
        };

        let zone_id = non_empty(raw.zone_id, "zoneID")?;

        let records = raw.records.ok_or(ConfigError::Missing("records"))?;
        if records.is_empty() || records.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Empty("records"));
        }

        Ok(Config {
            credentials,
            zone_id,
            records,
            proxied: raw.proxied.unwrap_or(true),
        })
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str::<RawConfig>(s)?.try_into()
    }
}

impl FromStr for LoadedConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = toml::from_str::<RawConfig>(s)?;
        if raw.is_dummy() {
            return Ok(LoadedConfig::Dummy);
        }
        Ok(LoadedConfig::Ready(raw.try_into()?))
    }
}

impl LoadedConfig {
    /// Read a configuration document, typically from stdin.
    ///
    /// The placeholder configuration is recognized before any other validation takes place.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<LoadedConfig, ConfigError> {
        let mut data = String::new();
        reader.read_to_string(&mut data)?;
        data.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, LoadedConfig};
    use crate::provider::CloudflareCredentials;

    const KEY_CONFIG: &str = r#"
        email = "admin@example.com"
        apiKey = "0123456789abcdef"
        zoneID = "Z"
        records = ["a.example.com", "b.example.com"]
    "#;

    #[test]
    fn should_parse_api_key_config() {
        let config: Config = KEY_CONFIG.parse().unwrap();
        assert_eq!(
            config,
            Config {
                credentials: CloudflareCredentials::ApiKey {
                    email: "admin@example.com".to_string(),
                    key: "0123456789abcdef".to_string(),
                },
                zone_id: "Z".to_string(),
                records: vec!["a.example.com".to_string(), "b.example.com".to_string()],
                proxied: true,
            }
        );
    }

    #[test]
    fn should_parse_api_token_config() {
        let config: Config = r#"
            apiToken = "secret"
            zoneID = "Z"
            records = ["a.example.com"]
            proxied = false
        "#
        .parse()
        .unwrap();
        assert_eq!(
            config.credentials,
            CloudflareCredentials::ApiToken("secret".to_string())
        );
        assert!(!config.proxied);
    }

    #[test]
    fn should_read_from_reader() {
        assert!(matches!(
            LoadedConfig::from_reader(KEY_CONFIG.as_bytes()),
            Ok(LoadedConfig::Ready(_))
        ));
    }

    #[test]
    fn should_keep_duplicate_records_in_order() {
        let config: Config = r#"
            apiToken = "secret"
            zoneID = "Z"
            records = ["b.example.com", "a.example.com", "b.example.com"]
        "#
        .parse()
        .unwrap();
        assert_eq!(
            config.records,
            vec!["b.example.com", "a.example.com", "b.example.com"]
        );
    }

    #[test]
    fn should_reject_unknown_keys() {
        let err = format!("{}\nrecord = \"typo\"\n", KEY_CONFIG)
            .parse::<Config>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn should_reject_malformed_toml() {
        let err = "zoneID = ".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn should_require_zone() {
        let err = r#"
            apiToken = "secret"
            records = ["a.example.com"]
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("zoneID")));
    }

    #[test]
    fn should_reject_empty_records() {
        let err = r#"
            apiToken = "secret"
            zoneID = "Z"
            records = []
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("records")));

        let err = r#"
            apiToken = "secret"
            zoneID = "Z"
            records = ["a.example.com", ""]
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("records")));
    }

    #[test]
    fn should_require_complete_credentials() {
        let err = r#"
            zoneID = "Z"
            records = ["a.example.com"]
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));

        let err = r#"
            email = "admin@example.com"
            zoneID = "Z"
            records = ["a.example.com"]
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("apiKey")));

        let err = r#"
            email = "admin@example.com"
            apiKey = ""
            zoneID = "Z"
            records = ["a.example.com"]
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("apiKey")));
    }

    #[test]
    fn should_reject_mixed_credentials() {
        let err = r#"
            apiKey = "0123456789abcdef"
            apiToken = "secret"
            zoneID = "Z"
            records = ["a.example.com"]
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingCredentials));
    }

    #[test]
    fn should_detect_dummy_config() {
        let loaded: LoadedConfig = r#"
            email = "email"
            apiKey = "apiKey"
            zoneID = "zoneID"
            records = ["example.com"]
        "#
        .parse()
        .unwrap();
        assert_eq!(loaded, LoadedConfig::Dummy);

        let loaded: LoadedConfig = r#"
            apiToken = "token"
            zoneID = "zoneID"
            records = ["example.com"]
        "#
        .parse()
        .unwrap();
        assert_eq!(loaded, LoadedConfig::Dummy);
    }

    #[test]
    fn should_detect_blank_dummy_config() {
        let loaded: LoadedConfig = r#"
            email = "email"
            apiKey = ""
            zoneID = ""
            records = []
        "#
        .parse()
        .unwrap();
        assert_eq!(loaded, LoadedConfig::Dummy);
    }

    #[test]
    fn should_still_reject_unknown_keys_in_dummy_config() {
        let err = r#"
            email = "email"
            record = "typo"
        "#
        .parse::<LoadedConfig>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn should_validate_non_dummy_config() {
        let err = r#"
            email = "admin@example.com"
            apiKey = ""
            zoneID = "Z"
            records = ["a.example.com"]
        "#
        .parse::<LoadedConfig>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("apiKey")));
    }
}
