use detective_core::model::CaseId;
use services::{
    AnswerOutcome, QuizLoopService, QuizSession, RecordReceipt, RecordStatus, SessionPhase,
};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Record,
    Restart,
}

/// Transient feedback for the latest pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Correct => "Correct! On to the next clue.",
            Self::Incorrect => "Not quite. Look at the evidence again.",
        }
    }
}

pub struct QuizVm {
    session: QuizSession,
    feedback: Option<Feedback>,
    receipt: Option<RecordReceipt>,
    record_error: Option<ViewError>,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            feedback: None,
            receipt: None,
            record_error: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn case_title(&self) -> &str {
        self.session.case().title()
    }

    #[must_use]
    pub fn case_summary(&self) -> &str {
        self.session.case().summary()
    }

    #[must_use]
    pub fn question_text(&self) -> Option<&str> {
        self.session.current_question().map(|q| q.text.as_str())
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        self.session
            .current_question()
            .map(|q| q.shuffled_answers.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.session.progress();
        if self.session.is_finished() {
            format!("{} / {} solved", progress.total, progress.total)
        } else {
            format!("Question {} of {}", progress.answered + 1, progress.total)
        }
    }

    #[must_use]
    pub fn misses_label(&self) -> String {
        match self.session.total_misses() {
            0 => "No wrong guesses".to_string(),
            1 => "1 wrong guess".to_string(),
            n => format!("{n} wrong guesses"),
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.session.phase() == SessionPhase::Recorded
    }

    #[must_use]
    pub fn verdict_label(&self) -> Option<&'static str> {
        self.session.verdict().map(|verdict| verdict.label())
    }

    /// Status line under the result card.
    #[must_use]
    pub fn record_message(&self) -> Option<String> {
        match self.session.record_status() {
            RecordStatus::NotAttempted => None,
            RecordStatus::Success => Some(match &self.receipt {
                Some(receipt) => format!("Recorded on-chain: {}", receipt.complete_tx),
                None => "Recorded on-chain".to_string(),
            }),
            RecordStatus::Failed => Some(
                self.record_error
                    .unwrap_or(ViewError::Unknown)
                    .message()
                    .to_string(),
            ),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the pick is not valid in the current phase.
    pub fn select(&mut self, quiz_loop: &QuizLoopService, index: usize) -> Result<(), ViewError> {
        let outcome = quiz_loop
            .answer_current(&mut self.session, index)
            .map_err(|err| ViewError::from_session(&err))?;
        self.feedback = Some(match outcome {
            AnswerOutcome::Correct { .. } => Feedback::Correct,
            AnswerOutcome::Incorrect { .. } => Feedback::Incorrect,
        });
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the mapped `ViewError` when the contract write fails.
    pub async fn record(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        match quiz_loop.record_result(&mut self.session).await {
            Ok(receipt) => {
                self.receipt = Some(receipt);
                self.record_error = None;
                Ok(())
            }
            Err(err) => {
                let view_err = ViewError::from_session(&err);
                self.record_error = Some(view_err);
                Err(view_err)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` while a run is still in progress.
    pub fn restart(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        quiz_loop
            .restart(&mut self.session)
            .map_err(|err| ViewError::from_session(&err))?;
        self.feedback = None;
        self.receipt = None;
        self.record_error = None;
        Ok(())
    }
}

/// # Errors
///
/// Returns `ViewError::CaseNotFound` when the case is missing from the bank.
pub async fn start_quiz(quiz_loop: &QuizLoopService, case_id: CaseId) -> Result<QuizVm, ViewError> {
    let session = quiz_loop
        .start_session(case_id)
        .await
        .map_err(|err| ViewError::from_session(&err))?;
    Ok(QuizVm::new(session))
}
