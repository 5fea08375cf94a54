use std::path::Path;
use std::sync::Arc;

use detective_core::model::CaseId;
use storage::repository::{QuestionBank, Storage};
use tracing::info;

use crate::analysis::AddressAnalyzer;
use crate::config::AppConfig;
use crate::contract::{CaseContract, RpcCaseContract};
use crate::error::AppServicesError;
use crate::explorer::ExplorerClient;
use crate::leaderboard::LeaderboardService;
use crate::playground::PlaygroundService;
use crate::recorder::ResultRecorder;
use crate::rpc::RpcClient;
use crate::sessions::QuizLoopService;
use crate::social::{HandleLookup, NeynarClient};
use crate::wallet::ProviderChain;
use crate::Clock;

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    case_id: CaseId,
    bank: Arc<dyn QuestionBank>,
    quiz_loop: Arc<QuizLoopService>,
    leaderboard: Arc<LeaderboardService>,
    analyzer: Arc<AddressAnalyzer>,
    playground: Arc<PlaygroundService>,
    handles: Option<Arc<dyn HandleLookup>>,
}

impl AppServices {
    /// Build services against the configured chain and question bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the question bank cannot be loaded.
    pub fn from_config(config: &AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = match &config.question_bank {
            Some(path) => Storage::from_json_file(Path::new(path))?,
            None => Storage::builtin()?,
        };
        let wallets = ProviderChain::from_config(&config.wallet);
        let contract: Arc<dyn CaseContract> =
            Arc::new(RpcCaseContract::new(config.chain.clone(), wallets));
        Ok(Self::with_parts(config, clock, storage, contract))
    }

    /// Build services from `DETECTIVE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` for malformed variables or an unreadable bank.
    pub fn from_env(clock: Clock) -> Result<Self, AppServicesError> {
        let config = AppConfig::from_env()?;
        Self::from_config(&config, clock)
    }

    /// Wire services around an existing storage and contract.
    #[must_use]
    pub fn with_parts(
        config: &AppConfig,
        clock: Clock,
        storage: Storage,
        contract: Arc<dyn CaseContract>,
    ) -> Self {
        let handles = config.social.as_ref().map(|social| {
            let lookup: Arc<dyn HandleLookup> = Arc::new(NeynarClient::new(social));
            lookup
        });

        let recorder = ResultRecorder::new(Arc::clone(&contract));
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::clone(&storage.bank),
            recorder,
        ));
        let leaderboard = Arc::new(LeaderboardService::new(
            Arc::clone(&contract),
            handles.clone(),
        ));
        let reader = Arc::new(RpcClient::new(config.chain.rpc_url.clone()));
        let analyzer = Arc::new(
            AddressAnalyzer::new(reader, config.chain.explorer_url.clone())
                .with_explorer(ExplorerClient::new(&config.chain)),
        );
        let playground = Arc::new(PlaygroundService::new(Arc::clone(&storage.bank)));

        info!(
            case_id = config.case_id.value(),
            chain_id = config.chain.chain_id,
            contract = %config.chain.contract_address,
            social = handles.is_some(),
            "services ready"
        );

        Self {
            case_id: config.case_id,
            bank: storage.bank,
            quiz_loop,
            leaderboard,
            analyzer,
            playground,
            handles,
        }
    }

    #[must_use]
    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    #[must_use]
    pub fn bank(&self) -> Arc<dyn QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn analyzer(&self) -> Arc<AddressAnalyzer> {
        Arc::clone(&self.analyzer)
    }

    #[must_use]
    pub fn playground(&self) -> Arc<PlaygroundService> {
        Arc::clone(&self.playground)
    }

    #[must_use]
    pub fn handles(&self) -> Option<Arc<dyn HandleLookup>> {
        self.handles.clone()
    }
}
