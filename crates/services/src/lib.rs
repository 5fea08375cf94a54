#![forbid(unsafe_code)]

pub mod abi;
pub mod analysis;
pub mod app_services;
pub mod config;
pub mod contract;
pub mod error;
pub mod explorer;
pub mod leaderboard;
pub mod playground;
pub mod recorder;
pub mod rpc;
pub mod sessions;
pub mod social;
pub mod wallet;

pub use detective_core::Clock;
pub use sessions as session;

pub use analysis::{AddressAnalyzer, AddressReport, format_ether};
pub use app_services::AppServices;
pub use config::{AppConfig, ChainConfig, SocialConfig, WalletConfig};
pub use contract::{CaseContract, RpcCaseContract};
pub use error::{
    AbiError, AnalysisError, AppServicesError, ChainError, ConfigError, RecordError, RpcError,
    SessionError,
};
pub use explorer::{ContractSource, ExplorerClient, ExplorerTx, Lookup};
pub use leaderboard::{LeaderboardEntry, LeaderboardService};
pub use playground::{PlaygroundService, PracticeOutcome, PracticeRound};
pub use recorder::{RecordReceipt, ResultRecorder};
pub use rpc::{ChainReader, RpcClient};
pub use sessions::{
    AnswerOutcome, CaseStatus, QuizLoopService, QuizSession, RecordStatus, SessionPhase,
    SessionProgress,
};
pub use social::{HandleLookup, NeynarClient};
pub use wallet::{ProviderChain, RpcWallet, TransactionRequest, TxHash, WalletProvider};
