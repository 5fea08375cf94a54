use std::sync::Arc;

use detective_core::model::CaseId;
use services::{AddressAnalyzer, LeaderboardService, PlaygroundService, QuizLoopService};

use crate::platform::LinkOpenerRef;

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn case_id(&self) -> CaseId;

    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn leaderboard(&self) -> Arc<LeaderboardService>;
    fn analyzer(&self) -> Arc<AddressAnalyzer>;
    fn playground(&self) -> Arc<PlaygroundService>;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    case_id: CaseId,

    quiz_loop: Arc<QuizLoopService>,
    leaderboard: Arc<LeaderboardService>,
    analyzer: Arc<AddressAnalyzer>,
    playground: Arc<PlaygroundService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            case_id: app.case_id(),
            quiz_loop: app.quiz_loop(),
            leaderboard: app.leaderboard(),
            analyzer: app.analyzer(),
            playground: app.playground(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn case_id(&self) -> CaseId {
        self.case_id
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

    pub fn open_url(&self, url: &str) {
        self.link_opener.open_url(url);
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
