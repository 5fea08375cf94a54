use async_trait::async_trait;
use detective_core::model::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SocialConfig;
use crate::rpc::http_client;

/// Resolves a social handle (such as `@alice`) for an address.
#[async_trait]
pub trait HandleLookup: Send + Sync {
    /// `None` when the address has no handle or the lookup failed.
    async fn handle_for(&self, address: Address) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct NeynarUser {
    #[serde(default)]
    username: Option<String>,
}

/// Farcaster handle lookup through Neynar's bulk-by-address endpoint.
#[derive(Clone)]
pub struct NeynarClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NeynarClient {
    #[must_use]
    pub fn new(config: &SocialConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn fetch(&self, address: Address) -> Result<Option<String>, reqwest::Error> {
        let url = format!(
            "{}/farcaster/user/bulk-by-address",
            self.base_url.trim_end_matches('/')
        );
        let key = address.to_lower_hex();
        let body: Value = self
            .client
            .get(url)
            .query(&[("addresses", key.as_str())])
            .header("accept", "application/json")
            .header("api_key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(handle_from_response(body, &key))
    }
}

#[async_trait]
impl HandleLookup for NeynarClient {
    async fn handle_for(&self, address: Address) -> Option<String> {
        match self.fetch(address).await {
            Ok(handle) => {
                debug!(address = %address, found = handle.is_some(), "handle lookup");
                handle
            }
            Err(err) => {
                warn!(address = %address, error = %err, "handle lookup failed");
                None
            }
        }
    }
}

/// Users are keyed by lowercase address, either at the top level or under
/// `users`; each entry is a user object or a list of them.
fn handle_from_response(body: Value, lower_address: &str) -> Option<String> {
    let users = body.get("users").unwrap_or(&body).as_object()?;
    let entry = users
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(lower_address))
        .map(|(_, entry)| entry.clone())?;

    let candidates: Vec<NeynarUser> = match entry {
        Value::Array(_) => serde_json::from_value(entry).ok()?,
        other => vec![serde_json::from_value(other).ok()?],
    };
    candidates
        .into_iter()
        .filter_map(|user| user.username)
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .map(|name| format!("@{name}"))
}
