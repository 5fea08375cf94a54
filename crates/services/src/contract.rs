use async_trait::async_trait;
use detective_core::model::{Address, CaseId, CaseRecord};
use serde_json::json;
use tracing::{debug, info};

use crate::abi::{
    complete_case_calldata, completed_users_calldata, decode_address_array, decode_hex,
    decode_player_case, encode_hex, player_cases_calldata, start_case_calldata,
};
use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::rpc::RpcClient;
use crate::wallet::{ProviderChain, TransactionRequest, TxHash};

/// The on-chain case ledger.
///
/// Writes go through the user's wallet; reads hit the public RPC endpoint.
#[async_trait]
pub trait CaseContract: Send + Sync {
    /// Account that writes will be sent from.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::ProviderUnavailable` if no wallet is connected.
    async fn current_player(&self) -> Result<Address, ChainError>;

    /// Submit `startCase(caseId)`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the wallet or node refuses the transaction.
    async fn start_case(&self, case_id: CaseId) -> Result<TxHash, ChainError>;

    /// Submit `completeCase(caseId, result)`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the wallet or node refuses the transaction.
    async fn complete_case(&self, case_id: CaseId, result: u8) -> Result<TxHash, ChainError>;

    /// Read `playerCases(player, caseId)`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the call fails or returns malformed data.
    async fn player_case(
        &self,
        player: Address,
        case_id: CaseId,
    ) -> Result<CaseRecord, ChainError>;

    /// Read `getCompletedUsers()`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the call fails or returns malformed data.
    async fn completed_users(&self) -> Result<Vec<Address>, ChainError>;
}

/// `CaseContract` backed by JSON-RPC and a wallet provider.
#[derive(Clone)]
pub struct RpcCaseContract {
    config: ChainConfig,
    rpc: RpcClient,
    wallets: ProviderChain,
}

impl RpcCaseContract {
    #[must_use]
    pub fn new(config: ChainConfig, wallets: ProviderChain) -> Self {
        let rpc = RpcClient::new(config.rpc_url.clone());
        Self {
            config,
            rpc,
            wallets,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    #[must_use]
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    async fn eth_call(&self, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let call = json!({
            "to": self.config.contract_address.to_lower_hex(),
            "data": encode_hex(&data),
        });
        let raw: String = self.rpc.call("eth_call", json!([call, "latest"])).await?;
        Ok(decode_hex(&raw)?)
    }

    async fn write(&self, function: &'static str, data: Vec<u8>) -> Result<TxHash, ChainError> {
        let provider = self.wallets.acquire()?;
        let from = provider
            .accounts()
            .await?
            .first()
            .copied()
            .ok_or(ChainError::NoAccount)?;
        let tx = TransactionRequest {
            from,
            to: self.config.contract_address,
            data,
            value: 0,
            chain_id: self.config.chain_id,
        };
        info!(function, from = %from, provider = provider.label(), "submitting transaction");
        let hash = provider.send_transaction(&tx).await?;
        info!(function, tx = %hash, "transaction submitted");
        Ok(hash)
    }
}

#[async_trait]
impl CaseContract for RpcCaseContract {
    async fn current_player(&self) -> Result<Address, ChainError> {
        self.wallets.primary_account().await
    }

    async fn start_case(&self, case_id: CaseId) -> Result<TxHash, ChainError> {
        self.write("startCase", start_case_calldata(case_id)).await
    }

    async fn complete_case(&self, case_id: CaseId, result: u8) -> Result<TxHash, ChainError> {
        self.write("completeCase", complete_case_calldata(case_id, result))
            .await
    }

    async fn player_case(
        &self,
        player: Address,
        case_id: CaseId,
    ) -> Result<CaseRecord, ChainError> {
        debug!(player = %player, case_id = case_id.value(), "reading case record");
        let data = self.eth_call(player_cases_calldata(player, case_id)).await?;
        Ok(decode_player_case(&data)?)
    }

    async fn completed_users(&self) -> Result<Vec<Address>, ChainError> {
        let data = self.eth_call(completed_users_calldata()).await?;
        Ok(decode_address_array(&data)?)
    }
}
