use std::env;

use detective_core::model::{Address, CaseId};

use crate::error::ConfigError;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";
pub const DEFAULT_CHAIN_ID: u64 = 8453;
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xfbc5fbe823f76964de240433ad00651a76c672c8";
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.basescan.org/api";
pub const DEFAULT_EXPLORER_URL: &str = "https://basescan.org";
pub const DEFAULT_NEYNAR_URL: &str = "https://api.neynar.com/v2";

/// Chain and contract settings passed into the contract client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract_address: Address,
    pub explorer_api_url: String,
    pub explorer_api_key: Option<String>,
    pub explorer_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            chain_id: DEFAULT_CHAIN_ID,
            contract_address: DEFAULT_CONTRACT_ADDRESS
                .parse()
                .unwrap_or(Address::ZERO),
            explorer_api_url: DEFAULT_EXPLORER_API_URL.into(),
            explorer_api_key: None,
            explorer_url: DEFAULT_EXPLORER_URL.into(),
        }
    }
}

impl ChainConfig {
    /// Read `DETECTIVE_*` chain variables, falling back to Base mainnet defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the contract address or chain id is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let contract_address = match non_empty_var("DETECTIVE_CONTRACT_ADDRESS") {
            Some(raw) => raw.parse().map_err(|source| ConfigError::InvalidAddress {
                var: "DETECTIVE_CONTRACT_ADDRESS",
                source,
            })?,
            None => defaults.contract_address,
        };
        let chain_id = match non_empty_var("DETECTIVE_CHAIN_ID") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "DETECTIVE_CHAIN_ID",
                raw,
            })?,
            None => defaults.chain_id,
        };

        Ok(Self {
            rpc_url: non_empty_var("DETECTIVE_RPC_URL").unwrap_or(defaults.rpc_url),
            chain_id,
            contract_address,
            explorer_api_url: non_empty_var("DETECTIVE_EXPLORER_API_URL")
                .unwrap_or(defaults.explorer_api_url),
            explorer_api_key: non_empty_var("DETECTIVE_EXPLORER_API_KEY"),
            explorer_url: non_empty_var("DETECTIVE_EXPLORER_URL").unwrap_or(defaults.explorer_url),
        })
    }
}

/// Social-graph lookup settings. Absent when no API key is configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocialConfig {
    pub base_url: String,
    pub api_key: String,
}

impl SocialConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = non_empty_var("DETECTIVE_NEYNAR_API_KEY")?;
        let base_url = non_empty_var("DETECTIVE_NEYNAR_URL").unwrap_or_else(|| DEFAULT_NEYNAR_URL.into());
        Some(Self { base_url, api_key })
    }
}

/// Wallet endpoints, in order of preference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletConfig {
    /// Provider exposed by the hosting mini-app client.
    pub embedded_url: Option<String>,
    /// Browser-style injected provider or a local signer.
    pub injected_url: Option<String>,
}

impl WalletConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            embedded_url: non_empty_var("DETECTIVE_MINIAPP_PROVIDER_URL"),
            injected_url: non_empty_var("DETECTIVE_WALLET_URL"),
        }
    }
}

/// Everything the composition root needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub social: Option<SocialConfig>,
    pub wallet: WalletConfig,
    pub case_id: CaseId,
    pub question_bank: Option<String>,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let case_id = match non_empty_var("DETECTIVE_CASE_ID") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "DETECTIVE_CASE_ID",
                raw,
            })?,
            None => CaseId::new(1),
        };

        Ok(Self {
            chain: ChainConfig::from_env()?,
            social: SocialConfig::from_env(),
            wallet: WalletConfig::from_env(),
            case_id,
            question_bank: non_empty_var("DETECTIVE_QUESTION_BANK"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
