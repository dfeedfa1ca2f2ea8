// ABOUTME: Fetches a user's public keys from a key-hosting service's `.keys` endpoint
// ABOUTME: Resolves the service URL template and performs one unauthenticated blocking GET

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Placeholder replaced with the username in service URL templates.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

pub struct KeyFetcher {
    services: BTreeMap<String, String>,
    client: reqwest::blocking::Client,
}

impl KeyFetcher {
    pub fn new(services: BTreeMap<String, String>) -> Self {
        Self::with_client(services, reqwest::blocking::Client::new())
    }

    pub fn with_client(services: BTreeMap<String, String>, client: reqwest::blocking::Client) -> Self {
        Self { services, client }
    }

    pub fn url_for(&self, service: &str, username: &str) -> Result<String> {
        let template = self
            .services
            .get(service)
            .ok_or_else(|| Error::InvalidService {
                service: service.to_string(),
            })?;
        Ok(template.replace(USERNAME_PLACEHOLDER, username))
    }

    /// Returns the response body unmodified.
    pub fn fetch(&self, service: &str, username: &str) -> Result<Vec<u8>> {
        let url = self.url_for(service, username)?;
        debug!("Fetching {} keys for {} from {}", service, username, url);

        let response = self.client.get(&url).send().map_err(|source| Error::Network {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|source| Error::Network {
            url: url.clone(),
            source,
        })?;

        if body.is_empty() {
            return Err(Error::EmptyResult {
                service: service.to_string(),
                username: username.to_string(),
            });
        }

        info!("Fetched {} bytes of keys from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
