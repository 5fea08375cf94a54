use std::sync::Arc;

use detective_core::model::Address;
use tracing::debug;

use crate::error::AnalysisError;
use crate::explorer::{ContractSource, ExplorerClient, ExplorerTx, Lookup, address_url};
use crate::rpc::ChainReader;

const WEI_DECIMALS: u32 = 18;
const RECENT_TX_LIMIT: usize = 5;

/// Everything the tools page shows for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressReport {
    pub address: Address,
    pub has_bytecode: bool,
    pub bytecode_len: usize,
    pub balance_wei: u128,
    pub balance_eth: String,
    pub explorer_url: String,
    pub source: Option<Lookup<ContractSource>>,
    pub recent_transactions: Option<Lookup<Vec<ExplorerTx>>>,
}

impl AddressReport {
    /// Checksummed form of the analysed address.
    #[must_use]
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum()
    }
}

/// Inspects an arbitrary address: code, balance and explorer data.
#[derive(Clone)]
pub struct AddressAnalyzer {
    chain: Arc<dyn ChainReader>,
    explorer: Option<ExplorerClient>,
    explorer_site: String,
}

impl AddressAnalyzer {
    #[must_use]
    pub fn new(chain: Arc<dyn ChainReader>, explorer_site: impl Into<String>) -> Self {
        Self {
            chain,
            explorer: None,
            explorer_site: explorer_site.into(),
        }
    }

    #[must_use]
    pub fn with_explorer(mut self, explorer: ExplorerClient) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Validate `input` and build a report for it.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidAddress` before any network call if the
    /// input is not an address, and `AnalysisError::Chain` if bytecode or
    /// balance cannot be fetched. Explorer failures only mark their lookups
    /// unavailable.
    pub async fn analyze(&self, input: &str) -> Result<AddressReport, AnalysisError> {
        let address: Address = input.parse()?;
        debug!(address = %address, "analysing address");

        let (code, balance) = tokio::try_join!(
            self.chain.code_at(address),
            self.chain.balance_of(address)
        )?;

        let (source, recent_transactions) = match &self.explorer {
            Some(explorer) => {
                let (source, txs) = tokio::join!(
                    explorer.source_code(address),
                    explorer.transactions(address, RECENT_TX_LIMIT)
                );
                (Some(source), Some(txs))
            }
            None => (None, None),
        };

        Ok(AddressReport {
            address,
            has_bytecode: !code.is_empty(),
            bytecode_len: code.len(),
            balance_wei: balance,
            balance_eth: format_ether(balance),
            explorer_url: address_url(&self.explorer_site, address),
            source,
            recent_transactions,
        })
    }
}

/// Render wei as ether with up to 18 decimals and no trailing zeros.
#[must_use]
pub fn format_ether(wei: u128) -> String {
    format_units(wei, WEI_DECIMALS)
}

fn format_units(value: u128, decimals: u32) -> String {
    let unit = 10_u128.pow(decimals);
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = decimals as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
