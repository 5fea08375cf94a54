use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use detective_core::model::{
    Address, Case, CaseId, CaseRecord, Challenge, ChallengeDraft, ChallengeId, Difficulty,
    Question, QuestionId,
};
use detective_core::time::fixed_now;
use services::{
    AddressAnalyzer, CaseContract, ChainError, ChainReader, Clock, LeaderboardService,
    PlaygroundService, QuizLoopService, ResultRecorder, TxHash,
};
use storage::InMemoryQuestionBank;
use tokio::sync::Notify;

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::home::QuizTestHandles;
use crate::views::{AboutView, HomeView, LeaderboardView, PlaygroundView, ToolsView};

pub const CASE_ID: u8 = 1;

/// Contract double: completed players are fixed, writes succeed unless `fail_writes`.
///
/// With a `write_gate`, `complete_case` waits for a notification before answering.
pub struct StubContract {
    pub completed: Vec<Address>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub write_gate: Option<Arc<Notify>>,
    pub results: Mutex<Vec<u8>>,
}

impl StubContract {
    pub fn new(completed: Vec<Address>) -> Self {
        Self {
            completed,
            fail_reads: false,
            fail_writes: false,
            write_gate: None,
            results: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CaseContract for StubContract {
    async fn current_player(&self) -> Result<Address, ChainError> {
        Ok(Address::from_bytes([0x42; 20]))
    }

    async fn start_case(&self, _case_id: CaseId) -> Result<TxHash, ChainError> {
        Ok(TxHash("0xstart".into()))
    }

    async fn complete_case(&self, _case_id: CaseId, result: u8) -> Result<TxHash, ChainError> {
        if let Some(gate) = &self.write_gate {
            gate.notified().await;
        }
        if self.fail_writes {
            return Err(ChainError::ProviderUnavailable);
        }
        self.results.lock().unwrap().push(result);
        Ok(TxHash("0xc0ffee".into()))
    }

    async fn player_case(
        &self,
        _player: Address,
        _case_id: CaseId,
    ) -> Result<CaseRecord, ChainError> {
        Ok(CaseRecord::default())
    }

    async fn completed_users(&self) -> Result<Vec<Address>, ChainError> {
        if self.fail_reads {
            return Err(ChainError::Reverted("paused".into()));
        }
        Ok(self.completed.clone())
    }
}

struct StubChain;

#[async_trait]
impl ChainReader for StubChain {
    async fn code_at(&self, _address: Address) -> Result<Vec<u8>, ChainError> {
        Ok(vec![0x60, 0x80])
    }

    async fn balance_of(&self, _address: Address) -> Result<u128, ChainError> {
        Ok(2_000_000_000_000_000_000)
    }
}

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UiLinkOpener for RecordingOpener {
    fn open_url(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    leaderboard: Arc<LeaderboardService>,
    analyzer: Arc<AddressAnalyzer>,
    playground: Arc<PlaygroundService>,
    opener: Arc<RecordingOpener>,
}

impl UiApp for TestApp {
    fn case_id(&self) -> CaseId {
        CaseId::new(CASE_ID)
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    fn analyzer(&self) -> Arc<AddressAnalyzer> {
        Arc::clone(&self.analyzer)
    }

    fn playground(&self) -> Arc<PlaygroundService> {
        Arc::clone(&self.playground)
    }

    fn link_opener(&self) -> LinkOpenerRef {
        self.opener.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Leaderboard,
    Tools,
    Playground,
    About,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Leaderboard => rsx! { LeaderboardView {} },
        ViewKind::Tools => rsx! { ToolsView {} },
        ViewKind::Playground => rsx! { PlaygroundView {} },
        ViewKind::About => rsx! { AboutView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub contract: Arc<StubContract>,
    pub opener: Arc<RecordingOpener>,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn test_bank() -> InMemoryQuestionBank {
    let bank = InMemoryQuestionBank::new();
    let question = Question::new(
        QuestionId::new(1),
        "Which transaction drained the vault?",
        vec!["The flash loan".into(), "The airdrop".into()],
    )
    .expect("question");
    bank.insert_case(
        Case::new(
            CaseId::new(CASE_ID),
            "The Vanishing Vault",
            "Funds left the vault overnight.",
            vec![question],
        )
        .expect("case"),
    )
    .expect("insert case");
    bank.insert_challenge(
        Challenge::new(
            ChallengeId::new(1),
            ChallengeDraft {
                title: "Reentrancy".into(),
                description: "A withdraw function sends ether before updating balances.".into(),
                question: "What is the flaw?".into(),
                options: vec!["State updated after the call".into(), "Missing event".into()],
                difficulty: Difficulty::Easy,
                explanation: "Update balances before external calls.".into(),
            },
        )
        .expect("challenge"),
    )
    .expect("insert challenge");
    bank
}

pub fn setup_view_harness(view: ViewKind, contract: StubContract) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let bank = Arc::new(test_bank());
    let contract = Arc::new(contract);

    let quiz_loop = Arc::new(QuizLoopService::new(
        clock,
        bank.clone(),
        ResultRecorder::new(contract.clone()),
    ));
    let leaderboard = Arc::new(LeaderboardService::new(contract.clone(), None));
    let analyzer = Arc::new(AddressAnalyzer::new(
        Arc::new(StubChain),
        "https://basescan.org",
    ));
    let playground = Arc::new(PlaygroundService::new(bank));
    let opener = Arc::new(RecordingOpener::default());

    let quiz_handles = match view {
        ViewKind::Home => Some(QuizTestHandles::default()),
        _ => None,
    };

    let app = Arc::new(TestApp {
        quiz_loop,
        leaderboard,
        analyzer,
        playground,
        opener: opener.clone(),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        contract,
        opener,
        quiz_handles,
    }
}
