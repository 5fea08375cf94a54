use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use detective_core::model::Address;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::abi::{decode_hex, decode_revert_reason, encode_hex};
use crate::config::WalletConfig;
use crate::error::{ChainError, RpcError};
use crate::rpc::RpcClient;

/// EIP-1193 "user rejected request" error code.
const USER_REJECTED: i64 = 4001;

/// Hash of a submitted transaction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.0)
    }
}

/// A contract call to be signed and submitted by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    pub value: u128,
    pub chain_id: u64,
}

#[derive(Debug, Serialize)]
struct TransactionParams {
    from: String,
    to: String,
    data: String,
    value: String,
    #[serde(rename = "chainId")]
    chain_id: String,
}

impl From<&TransactionRequest> for TransactionParams {
    fn from(tx: &TransactionRequest) -> Self {
        Self {
            from: tx.from.to_lower_hex(),
            to: tx.to.to_lower_hex(),
            data: encode_hex(&tx.data),
            value: format!("{:#x}", tx.value),
            chain_id: format!("{:#x}", tx.chain_id),
        }
    }
}

/// Something that can discover the user's account and submit transactions
/// on their behalf.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Short label for logs.
    fn label(&self) -> &str;

    /// Accounts the wallet is willing to sign for.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the provider cannot be reached or refuses.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    /// Sign and submit `tx`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Rejected` if the user declines and
    /// `ChainError::Reverted` if the node refuses the call.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ChainError>;
}

/// Wallet reached over an EIP-1193 style JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcWallet {
    label: String,
    rpc: RpcClient,
}

impl RpcWallet {
    #[must_use]
    pub fn new(label: impl Into<String>, rpc: RpcClient) -> Self {
        Self {
            label: label.into(),
            rpc,
        }
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    fn label(&self) -> &str {
        &self.label
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let raw: Vec<String> = self
            .rpc
            .call("eth_accounts", json!([]))
            .await
            .map_err(classify_write_error)?;
        raw.iter()
            .map(|entry| {
                entry
                    .parse::<Address>()
                    .map_err(|e| ChainError::Rpc(RpcError::Decode(e.to_string())))
            })
            .collect()
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ChainError> {
        let params = TransactionParams::from(tx);
        let hash: String = self
            .rpc
            .call("eth_sendTransaction", json!([params]))
            .await
            .map_err(classify_write_error)?;
        Ok(TxHash(hash))
    }
}

/// Map a node error on a write into the rejected/reverted taxonomy.
pub(crate) fn classify_write_error(err: RpcError) -> ChainError {
    match err {
        RpcError::Node { code, message, .. } if code == USER_REJECTED => {
            ChainError::Rejected(message)
        }
        RpcError::Node {
            message, data, ..
        } if message.to_lowercase().contains("revert") => {
            let reason = data
                .as_deref()
                .and_then(|raw| decode_hex(raw).ok())
                .and_then(|bytes| decode_revert_reason(&bytes))
                .unwrap_or(message);
            ChainError::Reverted(reason)
        }
        other => ChainError::Rpc(other),
    }
}

/// Ordered wallet candidates; the first one present wins.
#[derive(Clone, Default)]
pub struct ProviderChain {
    embedded: Option<Arc<dyn WalletProvider>>,
    injected: Option<Arc<dyn WalletProvider>>,
}

impl ProviderChain {
    #[must_use]
    pub fn new(
        embedded: Option<Arc<dyn WalletProvider>>,
        injected: Option<Arc<dyn WalletProvider>>,
    ) -> Self {
        Self { embedded, injected }
    }

    #[must_use]
    pub fn from_config(config: &WalletConfig) -> Self {
        let wrap = |label: &str, url: &Option<String>| {
            url.as_ref().map(|url| {
                let wallet: Arc<dyn WalletProvider> =
                    Arc::new(RpcWallet::new(label, RpcClient::new(url.clone())));
                wallet
            })
        };
        Self {
            embedded: wrap("mini-app", &config.embedded_url),
            injected: wrap("injected", &config.injected_url),
        }
    }

    /// The embedded mini-app provider if present, otherwise the injected one.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::ProviderUnavailable` when neither is configured.
    pub fn acquire(&self) -> Result<Arc<dyn WalletProvider>, ChainError> {
        if let Some(provider) = &self.embedded {
            info!(provider = provider.label(), "using embedded wallet provider");
            return Ok(Arc::clone(provider));
        }
        if let Some(provider) = &self.injected {
            info!(provider = provider.label(), "using injected wallet provider");
            return Ok(Arc::clone(provider));
        }
        warn!("no wallet provider available");
        Err(ChainError::ProviderUnavailable)
    }

    /// First account of the acquired provider.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::ProviderUnavailable` or `ChainError::NoAccount`.
    pub async fn primary_account(&self) -> Result<Address, ChainError> {
        let provider = self.acquire()?;
        let accounts = provider.accounts().await?;
        debug!(count = accounts.len(), "wallet accounts");
        accounts.first().copied().ok_or(ChainError::NoAccount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWallet {
        label: &'static str,
        account: Option<Address>,
    }

    #[async_trait]
    impl WalletProvider for FixedWallet {
        fn label(&self) -> &str {
            self.label
        }

        async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
            Ok(self.account.into_iter().collect())
        }

        async fn send_transaction(&self, _tx: &TransactionRequest) -> Result<TxHash, ChainError> {
            Ok(TxHash("0x01".into()))
        }
    }

    fn wallet(label: &'static str, account: Option<Address>) -> Arc<dyn WalletProvider> {
        Arc::new(FixedWallet { label, account })
    }

    #[test]
    fn prefers_embedded_provider() {
        let chain = ProviderChain::new(
            Some(wallet("embedded", None)),
            Some(wallet("injected", None)),
        );
        assert_eq!(chain.acquire().unwrap().label(), "embedded");
    }

    #[test]
    fn falls_back_to_injected_provider() {
        let chain = ProviderChain::new(None, Some(wallet("injected", None)));
        assert_eq!(chain.acquire().unwrap().label(), "injected");
    }

    #[test]
    fn no_provider_is_unavailable() {
        let chain = ProviderChain::default();
        assert!(matches!(
            chain.acquire().err(),
            Some(ChainError::ProviderUnavailable)
        ));
    }

    #[tokio::test]
    async fn primary_account_requires_an_account() {
        let chain = ProviderChain::new(Some(wallet("embedded", None)), None);
        assert!(matches!(
            chain.primary_account().await,
            Err(ChainError::NoAccount)
        ));

        let expected = Address::from_bytes([7; 20]);
        let chain = ProviderChain::new(Some(wallet("embedded", Some(expected))), None);
        assert_eq!(chain.primary_account().await.unwrap(), expected);
    }

    #[test]
    fn classifies_user_rejection() {
        let err = classify_write_error(RpcError::Node {
            code: 4001,
            message: "User rejected the request.".into(),
            data: None,
        });
        assert!(matches!(err, ChainError::Rejected(_)));
    }

    #[test]
    fn classifies_revert_with_reason_payload() {
        let data = "0x08c379a0\
            0000000000000000000000000000000000000000000000000000000000000020\
            0000000000000000000000000000000000000000000000000000000000000010\
            43617365206e6f74207374617274656400000000000000000000000000000000";
        let err = classify_write_error(RpcError::Node {
            code: 3,
            message: "execution reverted".into(),
            data: Some(data.into()),
        });
        match err {
            ChainError::Reverted(reason) => assert_eq!(reason, "Case not started"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn transaction_params_are_hex_encoded() {
        let tx = TransactionRequest {
            from: Address::from_bytes([1; 20]),
            to: Address::from_bytes([2; 20]),
            data: vec![0xab],
            value: 0,
            chain_id: 8453,
        };
        let params = TransactionParams::from(&tx);
        assert_eq!(params.value, "0x0");
        assert_eq!(params.chain_id, "0x2105");
        assert_eq!(params.data, "0xab");
    }
}
