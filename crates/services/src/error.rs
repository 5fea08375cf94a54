//! Shared error types for the services crate.

use thiserror::Error;

use detective_core::model::AddressError;
use storage::StorageError;

/// Revert text the contract uses when `completeCase` runs before `startCase`.
pub const CASE_NOT_STARTED_SIGNATURE: &str = "not started";

/// Errors from the JSON-RPC transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpcError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("rpc request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("rpc error {code}: {message}")]
    Node {
        code: i64,
        message: String,
        data: Option<String>,
    },
    #[error("rpc response had neither result nor error")]
    EmptyResponse,
    #[error("rpc result could not be decoded: {0}")]
    Decode(String),
}

/// Errors from encoding or decoding contract call data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AbiError {
    #[error("hex payload is malformed")]
    InvalidHex,
    #[error("{0} does not fit the target type")]
    Overflow(&'static str),
    #[error("return data could not be decoded: {0}")]
    Decode(String),
}

impl From<alloy_sol_types::Error> for AbiError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Errors from reading or writing the case contract.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChainError {
    #[error("no wallet provider found; connect a wallet and try again")]
    ProviderUnavailable,
    #[error("wallet exposed no account")]
    NoAccount,
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Abi(#[from] AbiError),
}

impl ChainError {
    /// Whether the contract refused `completeCase` because no case was started.
    #[must_use]
    pub fn is_case_not_started(&self) -> bool {
        let reason = match self {
            Self::Reverted(reason) => reason.as_str(),
            Self::Rpc(RpcError::Node { message, .. }) => message.as_str(),
            _ => return false,
        };
        reason.to_lowercase().contains(CASE_NOT_STARTED_SIGNATURE)
    }
}

/// Errors emitted by `ResultRecorder`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error("recording failed: {0}")]
    Chain(#[from] ChainError),
    #[error("recording failed after starting the case: {complete}")]
    AfterRemediation {
        complete: ChainError,
        start: Option<ChainError>,
    },
}

/// Errors emitted by quiz session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session is already in progress")]
    InProgress,
    #[error("session is not finished")]
    NotFinished,
    #[error("session is already complete")]
    Completed,
    #[error("session result already recorded")]
    AlreadyRecorded,
    #[error("answer {index} is out of range for {count} answers")]
    AnswerOutOfRange { index: usize, count: usize },
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AddressAnalyzer`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("failed to fetch contract data: {0}")]
    Chain(#[from] ChainError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not a valid address: {source}")]
    InvalidAddress {
        var: &'static str,
        source: AddressError,
    },
    #[error("{var} is not a valid number: {raw}")]
    InvalidNumber { var: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
