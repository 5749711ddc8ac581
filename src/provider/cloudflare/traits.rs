use cloudflare::{endpoints::dns, framework::auth::Credentials, framework::response::ApiFailure};

use super::CloudflareCredentials;
use crate::provider::{ARecord, ProviderError};

impl From<ApiFailure> for ProviderError {
    fn from(f: ApiFailure) -> Self {
        match f {
            ApiFailure::Error(s, errs) => ProviderError::Api(format!("[{}] {:?}", s, errs.errors)),
            ApiFailure::Invalid(e) => ProviderError::Request(e.to_string()),
        }
    }
}

impl TryFrom<&dns::DnsRecord> for ARecord {
    type Error = String;

    fn try_from(r: &dns::DnsRecord) -> Result<Self, Self::Error> {
        match &r.content {
            dns::DnsContent::A { content } => Ok(ARecord {
                id: r.id.to_owned(),
                name: r.name.to_owned(),
                content: *content,
                ttl: r.ttl,
                proxied: r.proxied,
            }),
            _ => Err(format!("Not an A record: {:?}", r.content)),
        }
    }
}

impl From<&CloudflareCredentials> for Credentials {
    fn from(c: &CloudflareCredentials) -> Self {
        match c {
            CloudflareCredentials::ApiKey { email, key } => Credentials::UserAuthKey {
                email: email.to_owned(),
                key: key.to_owned(),
            },
            CloudflareCredentials::ApiToken(token) => Credentials::UserAuthToken {
                token: token.to_owned(),
            },
        }
    }
}
