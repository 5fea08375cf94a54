use std::sync::Arc;

use detective_core::model::{Address, CaseId, CaseRecord};
use storage::repository::QuestionBank;
use tracing::{debug, warn};

use super::service::{AnswerOutcome, QuizSession, SessionPhase};
use crate::error::{RecordError, SessionError};
use crate::recorder::{RecordReceipt, ResultRecorder};
use crate::Clock;

/// A player's on-chain record for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStatus {
    pub player: Address,
    pub case_id: CaseId,
    pub record: CaseRecord,
}

/// Orchestrates quiz start, answering and on-chain recording.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBank>,
    recorder: ResultRecorder,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBank>, recorder: ResultRecorder) -> Self {
        Self {
            clock,
            bank,
            recorder,
        }
    }

    /// Load `case_id` and start a run seeded from the clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the case cannot be loaded.
    pub async fn start_session(&self, case_id: CaseId) -> Result<QuizSession, SessionError> {
        let case = self.bank.get_case(case_id).await?;
        let mut session = QuizSession::new(case);
        let seed = self.clock.session_seed();
        session.start(seed, self.clock.now())?;
        debug!(case_id = case_id.value(), seed, "quiz session started");
        Ok(session)
    }

    /// Pick an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for phase violations or out-of-range picks.
    pub fn answer_current(
        &self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        session.select_answer(index, self.clock.now())
    }

    /// Write a finished session's verdict to the contract.
    ///
    /// A failed write keeps the session `Finished` with a failed record
    /// status so the caller can offer another attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the last question,
    /// `SessionError::AlreadyRecorded` after a successful write, and
    /// `SessionError::Record` when the contract write fails.
    pub async fn record_result(
        &self,
        session: &mut QuizSession,
    ) -> Result<RecordReceipt, SessionError> {
        match session.phase() {
            SessionPhase::Finished => {}
            SessionPhase::Recorded => return Err(SessionError::AlreadyRecorded),
            SessionPhase::NotStarted | SessionPhase::InProgress => {
                return Err(SessionError::NotFinished);
            }
        }
        let verdict = session.verdict().ok_or(SessionError::NotFinished)?;

        match self
            .recorder
            .record(session.case_id(), verdict.result_code())
            .await
        {
            Ok(receipt) => {
                session.mark_recorded();
                Ok(receipt)
            }
            Err(err) => {
                warn!(case_id = session.case_id().value(), error = %err, "recording failed");
                session.mark_record_failed();
                Err(err.into())
            }
        }
    }

    /// Start the same case again with a fresh seed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` if the run is not over yet.
    pub fn restart(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.start(self.clock.session_seed(), self.clock.now())
    }

    /// Read the on-chain record of `player`, or of the connected wallet when
    /// no player is given.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Record` if the wallet or contract read fails.
    pub async fn case_status(
        &self,
        case_id: CaseId,
        player: Option<Address>,
    ) -> Result<CaseStatus, SessionError> {
        let contract = self.recorder.contract();
        let player = match player {
            Some(player) => player,
            None => contract
                .current_player()
                .await
                .map_err(RecordError::from)?,
        };
        let record = contract
            .player_case(player, case_id)
            .await
            .map_err(RecordError::from)?;
        Ok(CaseStatus {
            player,
            case_id,
            record,
        })
    }
}
