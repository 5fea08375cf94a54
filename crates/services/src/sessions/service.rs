use chrono::{DateTime, Utc};
use std::fmt;

use detective_core::model::{Case, CaseId, PreparedQuestion, Verdict};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a quiz run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Finished,
    Recorded,
}

/// Outcome of the most recent attempt to write the result on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordStatus {
    #[default]
    NotAttempted,
    Success,
    Failed,
}

/// Result of a single answer pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The pick was right; `finished` is set when it was the last question.
    Correct { finished: bool },
    /// The pick was wrong; the same question stays on screen.
    Incorrect { misses: u32 },
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct { .. })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz run over one case.
///
/// Questions are prepared from the session seed on `start`; the step only
/// advances on a correct pick.
#[derive(Clone)]
pub struct QuizSession {
    case: Case,
    seed: Option<u32>,
    questions: Vec<PreparedQuestion>,
    step: usize,
    misses: Vec<u32>,
    phase: SessionPhase,
    record_status: RecordStatus,
    last_pick_wrong: bool,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(case: Case) -> Self {
        Self {
            case,
            seed: None,
            questions: Vec::new(),
            step: 0,
            misses: Vec::new(),
            phase: SessionPhase::NotStarted,
            record_status: RecordStatus::NotAttempted,
            last_pick_wrong: false,
            started_at: None,
            finished_at: None,
        }
    }

    /// Prepare questions for `seed` and reset all progress.
    ///
    /// Allowed from every phase except `InProgress`, which is how "try again"
    /// works after a finished or recorded run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` if a run is underway.
    pub fn start(&mut self, seed: u32, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase == SessionPhase::InProgress {
            return Err(SessionError::InProgress);
        }

        self.questions = self.case.prepare(seed);
        self.misses = vec![0; self.questions.len()];
        self.seed = Some(seed);
        self.step = 0;
        self.phase = SessionPhase::InProgress;
        self.record_status = RecordStatus::NotAttempted;
        self.last_pick_wrong = false;
        self.started_at = Some(now);
        self.finished_at = None;
        Ok(())
    }

    /// Pick answer `index` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`,
    /// `SessionError::Completed` once every question is answered, and
    /// `SessionError::AnswerOutOfRange` for an index past the answer list.
    pub fn select_answer(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        match self.phase {
            SessionPhase::InProgress => {}
            SessionPhase::NotStarted => return Err(SessionError::NotStarted),
            SessionPhase::Finished | SessionPhase::Recorded => {
                return Err(SessionError::Completed);
            }
        }

        let step = self.step;
        let question = self.questions.get(step).ok_or(SessionError::Completed)?;
        let count = question.answer_count();
        if index >= count {
            return Err(SessionError::AnswerOutOfRange { index, count });
        }

        if !question.is_correct(index) {
            let tally = &mut self.misses[step];
            *tally = tally.saturating_add(1);
            self.last_pick_wrong = true;
            return Ok(AnswerOutcome::Incorrect { misses: *tally });
        }

        self.last_pick_wrong = false;
        self.step += 1;
        let finished = self.step >= self.questions.len();
        if finished {
            self.phase = SessionPhase::Finished;
            self.finished_at = Some(now);
        }
        Ok(AnswerOutcome::Correct { finished })
    }

    #[must_use]
    pub fn case(&self) -> &Case {
        &self.case
    }

    #[must_use]
    pub fn case_id(&self) -> CaseId {
        self.case.id()
    }

    #[must_use]
    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn record_status(&self) -> RecordStatus {
        self.record_status
    }

    #[must_use]
    pub fn questions(&self) -> &[PreparedQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&PreparedQuestion> {
        if self.phase == SessionPhase::InProgress {
            self.questions.get(self.step)
        } else {
            None
        }
    }

    /// Zero-based index of the question on screen.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Whether the latest pick was wrong; cleared by the next correct pick.
    #[must_use]
    pub fn last_pick_wrong(&self) -> bool {
        self.last_pick_wrong
    }

    /// Wrong picks per prepared question, in play order.
    #[must_use]
    pub fn misses(&self) -> &[u32] {
        &self.misses
    }

    #[must_use]
    pub fn total_misses(&self) -> u32 {
        self.misses.iter().fold(0_u32, |acc, m| acc.saturating_add(*m))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished | SessionPhase::Recorded)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Tier of a finished run; `None` until every question is answered.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.is_finished()
            .then(|| Verdict::from_misses(self.total_misses(), self.questions.len()))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = if self.is_finished() { total } else { self.step };
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            misses: self.total_misses(),
            phase: self.phase,
        }
    }

    pub(crate) fn mark_recorded(&mut self) {
        self.phase = SessionPhase::Recorded;
        self.record_status = RecordStatus::Success;
    }

    pub(crate) fn mark_record_failed(&mut self) {
        self.record_status = RecordStatus::Failed;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("case_id", &self.case.id())
            .field("seed", &self.seed)
            .field("questions_len", &self.questions.len())
            .field("step", &self.step)
            .field("phase", &self.phase)
            .field("record_status", &self.record_status)
            .field("total_misses", &self.total_misses())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::model::{Question, QuestionId};
    use detective_core::time::fixed_now;

    fn build_case(questions: u32) -> Case {
        let questions = (1..=questions)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec![
                        format!("right {id}"),
                        format!("wrong a{id}"),
                        format!("wrong b{id}"),
                        format!("wrong c{id}"),
                    ],
                )
                .unwrap()
            })
            .collect();
        Case::new(CaseId::new(1), "Test Case", "", questions).unwrap()
    }

    fn started(questions: u32, seed: u32) -> QuizSession {
        let mut session = QuizSession::new(build_case(questions));
        session.start(seed, fixed_now()).unwrap();
        session
    }

    fn correct_index(session: &QuizSession) -> usize {
        session.current_question().unwrap().correct_index
    }

    fn wrong_index(session: &QuizSession) -> usize {
        (correct_index(session) + 1) % session.current_question().unwrap().answer_count()
    }

    #[test]
    fn new_session_is_not_started() {
        let mut session = QuizSession::new(build_case(2));
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert!(session.current_question().is_none());
        assert!(matches!(
            session.select_answer(0, fixed_now()),
            Err(SessionError::NotStarted)
        ));
    }

    #[test]
    fn correct_answers_reach_finished() {
        let mut session = started(3, 42);
        for expected_step in 0..3 {
            assert_eq!(session.step(), expected_step);
            let outcome = session.select_answer(correct_index(&session), fixed_now()).unwrap();
            assert!(outcome.is_correct());
        }
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.finished_at(), Some(fixed_now()));
        assert_eq!(session.verdict(), Some(Verdict::Flawless));
    }

    #[test]
    fn wrong_answer_keeps_step_and_counts_miss() {
        let mut session = started(2, 7);
        let outcome = session.select_answer(wrong_index(&session), fixed_now()).unwrap();
        assert_eq!(outcome, AnswerOutcome::Incorrect { misses: 1 });
        assert_eq!(session.step(), 0);
        assert!(session.last_pick_wrong());

        session.select_answer(correct_index(&session), fixed_now()).unwrap();
        assert_eq!(session.step(), 1);
        assert!(!session.last_pick_wrong());
        assert_eq!(session.misses(), &[1, 0]);
    }

    #[test]
    fn out_of_range_is_an_error_not_a_miss() {
        let mut session = started(2, 7);
        let err = session.select_answer(4, fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::AnswerOutOfRange { index: 4, count: 4 }
        ));
        assert_eq!(session.total_misses(), 0);
        assert_eq!(session.step(), 0);
    }

    #[test]
    fn cannot_restart_while_in_progress() {
        let mut session = started(2, 1);
        assert!(matches!(
            session.start(2, fixed_now()),
            Err(SessionError::InProgress)
        ));
    }

    #[test]
    fn restart_after_finish_resets_progress() {
        let mut session = started(1, 5);
        session.select_answer(wrong_index(&session), fixed_now()).unwrap();
        session.select_answer(correct_index(&session), fixed_now()).unwrap();
        session.mark_record_failed();
        assert_eq!(session.record_status(), RecordStatus::Failed);

        session.start(6, fixed_now()).unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.step(), 0);
        assert_eq!(session.total_misses(), 0);
        assert_eq!(session.record_status(), RecordStatus::NotAttempted);
        assert_eq!(session.seed(), Some(6));
    }

    #[test]
    fn answering_after_finish_is_rejected() {
        let mut session = started(1, 5);
        session.select_answer(correct_index(&session), fixed_now()).unwrap();
        assert!(matches!(
            session.select_answer(0, fixed_now()),
            Err(SessionError::Completed)
        ));
    }

    #[test]
    fn same_seed_reproduces_correct_indices() {
        let first = started(3, 1234);
        let second = started(3, 1234);
        let indices = |s: &QuizSession| {
            s.questions()
                .iter()
                .map(|q| (q.id, q.correct_index))
                .collect::<Vec<_>>()
        };
        assert_eq!(indices(&first), indices(&second));
        assert_eq!(first.questions(), second.questions());
    }

    #[test]
    fn progress_tracks_answers_and_misses() {
        let mut session = started(3, 9);
        session.select_answer(wrong_index(&session), fixed_now()).unwrap();
        session.select_answer(correct_index(&session), fixed_now()).unwrap();
        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.misses, 1);
        assert_eq!(progress.phase, SessionPhase::InProgress);
    }

    #[test]
    fn verdict_tiers_follow_misses() {
        let mut session = started(1, 3);
        for _ in 0..2 {
            session.select_answer(wrong_index(&session), fixed_now()).unwrap();
        }
        session.select_answer(correct_index(&session), fixed_now()).unwrap();
        assert_eq!(session.verdict(), Some(Verdict::Struggled));
    }
}
