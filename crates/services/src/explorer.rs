//! Best-effort lookups against an Etherscan-compatible explorer API.
//!
//! Nothing here is fatal: every failure becomes `Lookup::Unavailable` with a
//! short reason the UI can show next to the rest of the report.

use chrono::{DateTime, Utc};
use detective_core::model::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::abi::parse_quantity;
use crate::config::ChainConfig;
use crate::rpc::http_client;

/// Outcome of an optional lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Unavailable(String),
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Verification details of a contract's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    pub verified: bool,
    pub contract_name: Option<String>,
    pub compiler_version: Option<String>,
}

/// One entry of an address's transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerTx {
    pub hash: String,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value_wei: u128,
    pub timestamp: Option<DateTime<Utc>>,
    pub failed: bool,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    #[serde(rename = "SourceCode", default)]
    source_code: String,
    #[serde(rename = "ContractName", default)]
    contract_name: String,
    #[serde(rename = "CompilerVersion", default)]
    compiler_version: String,
}

#[derive(Debug, Deserialize)]
struct TxEntry {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(rename = "timeStamp", default)]
    time_stamp: String,
    #[serde(rename = "isError", default)]
    is_error: String,
}

/// Client for an Etherscan-style `?module=..&action=..` API.
#[derive(Clone)]
pub struct ExplorerClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    site_url: String,
}

impl ExplorerClient {
    #[must_use]
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            client: http_client(),
            api_url: config.explorer_api_url.clone(),
            api_key: config.explorer_api_key.clone(),
            site_url: config.explorer_url.clone(),
        }
    }

    /// Public page for `address` on the explorer site.
    #[must_use]
    pub fn address_url(&self, address: Address) -> String {
        address_url(&self.site_url, address)
    }

    /// Verified source metadata for `address`.
    pub async fn source_code(&self, address: Address) -> Lookup<ContractSource> {
        let address = address.to_lower_hex();
        match self
            .fetch(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address.as_str()),
            ])
            .await
        {
            Ok(envelope) => parse_source(envelope),
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    /// Most recent transactions of `address`, newest first.
    pub async fn transactions(&self, address: Address, limit: usize) -> Lookup<Vec<ExplorerTx>> {
        let address = address.to_lower_hex();
        let offset = limit.max(1).to_string();
        match self
            .fetch(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address.as_str()),
                ("page", "1"),
                ("offset", offset.as_str()),
                ("sort", "desc"),
            ])
            .await
        {
            Ok(envelope) => parse_transactions(envelope, limit),
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> Result<ApiEnvelope, String> {
        debug!(url = %self.api_url, ?params, "explorer request");
        let mut request = self.client.get(&self.api_url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "explorer request failed");
            "explorer unreachable".to_string()
        })?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "explorer returned error status");
            return Err(format!("explorer returned {}", response.status()));
        }
        response.json::<ApiEnvelope>().await.map_err(|err| {
            warn!(error = %err, "explorer response was not understood");
            "explorer response was not understood".to_string()
        })
    }
}

#[must_use]
pub fn address_url(site_url: &str, address: Address) -> String {
    format!("{}/address/{}", site_url.trim_end_matches('/'), address.to_checksum())
}

fn envelope_error(envelope: &ApiEnvelope) -> String {
    match &envelope.result {
        Value::String(text) if !text.is_empty() => text.clone(),
        _ if !envelope.message.is_empty() => envelope.message.clone(),
        _ => "explorer returned no data".to_string(),
    }
}

fn parse_source(envelope: ApiEnvelope) -> Lookup<ContractSource> {
    if envelope.status != "1" {
        return Lookup::Unavailable(envelope_error(&envelope));
    }
    let entries: Vec<SourceEntry> = match serde_json::from_value(envelope.result) {
        Ok(entries) => entries,
        Err(_) => return Lookup::Unavailable("unexpected source payload".to_string()),
    };
    let Some(entry) = entries.into_iter().next() else {
        return Lookup::Unavailable("explorer returned no data".to_string());
    };

    let non_empty = |value: String| {
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    };
    Lookup::Found(ContractSource {
        verified: !entry.source_code.trim().is_empty(),
        contract_name: non_empty(entry.contract_name),
        compiler_version: non_empty(entry.compiler_version),
    })
}

fn parse_transactions(envelope: ApiEnvelope, limit: usize) -> Lookup<Vec<ExplorerTx>> {
    if envelope.status != "1" {
        // An address with no history is reported as status "0" with an empty list.
        if matches!(&envelope.result, Value::Array(items) if items.is_empty()) {
            return Lookup::Found(Vec::new());
        }
        return Lookup::Unavailable(envelope_error(&envelope));
    }
    let entries: Vec<TxEntry> = match serde_json::from_value(envelope.result) {
        Ok(entries) => entries,
        Err(_) => return Lookup::Unavailable("unexpected transaction payload".to_string()),
    };

    let txs = entries
        .into_iter()
        .take(limit)
        .map(|entry| ExplorerTx {
            hash: entry.hash,
            from: entry.from.parse().ok(),
            to: entry.to.parse().ok(),
            value_wei: entry.value.parse().unwrap_or_else(|_| {
                parse_quantity(&entry.value).unwrap_or(0)
            }),
            timestamp: entry
                .time_stamp
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            failed: entry.is_error == "1",
        })
        .collect();
    Lookup::Found(txs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(raw: &str) -> ApiEnvelope {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn address_url_uses_checksum() {
        let address: Address = "0xfbc5fbe823f76964de240433ad00651a76c672c8".parse().unwrap();
        assert_eq!(
            address_url("https://basescan.org/", address),
            "https://basescan.org/address/0xFBc5FBe823F76964De240433aD00651a76C672c8"
        );
    }

    #[test]
    fn verified_source_is_found() {
        let lookup = parse_source(envelope(
            r#"{"status":"1","message":"OK","result":[{"SourceCode":"contract A {}","ContractName":"A","CompilerVersion":"v0.8.20"}]}"#,
        ));
        assert_eq!(
            lookup,
            Lookup::Found(ContractSource {
                verified: true,
                contract_name: Some("A".into()),
                compiler_version: Some("v0.8.20".into()),
            })
        );
    }

    #[test]
    fn unverified_source_is_found_but_not_verified() {
        let lookup = parse_source(envelope(
            r#"{"status":"1","message":"OK","result":[{"SourceCode":"","ContractName":"","CompilerVersion":""}]}"#,
        ));
        let source = lookup.found().unwrap();
        assert!(!source.verified);
        assert_eq!(source.contract_name, None);
    }

    #[test]
    fn api_error_is_unavailable() {
        let lookup = parse_source(envelope(
            r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#,
        ));
        assert_eq!(lookup, Lookup::Unavailable("Invalid API Key".into()));
    }

    #[test]
    fn transactions_are_parsed_and_limited() {
        let lookup = parse_transactions(
            envelope(
                r#"{"status":"1","message":"OK","result":[
                    {"hash":"0xaa","from":"0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed","to":"","value":"1000000000000000000","timeStamp":"1700000000","isError":"0"},
                    {"hash":"0xbb","from":"","to":"","value":"0","timeStamp":"1700000001","isError":"1"}
                ]}"#,
            ),
            1,
        );
        let txs = lookup.found().unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].hash, "0xaa");
        assert!(txs[0].from.is_some());
        assert_eq!(txs[0].to, None);
        assert_eq!(txs[0].value_wei, 1_000_000_000_000_000_000);
        assert_eq!(txs[0].timestamp.unwrap().timestamp(), 1_700_000_000);
        assert!(!txs[0].failed);
    }

    #[test]
    fn empty_history_is_found_empty() {
        let lookup = parse_transactions(
            envelope(r#"{"status":"0","message":"No transactions found","result":[]}"#),
            10,
        );
        assert_eq!(lookup, Lookup::Found(Vec::new()));
    }
}
