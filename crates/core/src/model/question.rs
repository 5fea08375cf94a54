use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::shuffle::arrange;

/// Multiplier used to spread question ids across the seed space.
const ANSWER_SEED_STRIDE: u32 = 0x9E37_79B9;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least two answers, got {count}")]
    TooFewAnswers { count: usize },

    #[error("answer {index} is empty")]
    EmptyAnswer { index: usize },

    #[error("answer {index} duplicates an earlier answer")]
    DuplicateAnswer { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A quiz question as authored.
///
/// `answers[0]` is always the correct answer; ordering for play is derived
/// later from a session seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    answers: Vec<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two answers are
    /// given, or an answer is blank or duplicated.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        answers: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let answers = validate_answers(answers)?;
        Ok(Self { id, text, answers })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.answers[0]
    }

    /// Derive the per-session ordering of this question's answers.
    #[must_use]
    pub fn prepare(&self, session_seed: u32) -> PreparedQuestion {
        let (shuffled_answers, correct_index) =
            arrange(&self.answers, answer_seed(session_seed, self.id));

        PreparedQuestion {
            id: self.id,
            text: self.text.clone(),
            shuffled_answers,
            correct_index,
        }
    }
}

/// Trims answers and rejects blanks or duplicates.
pub(crate) fn validate_answers(answers: Vec<String>) -> Result<Vec<String>, QuestionError> {
    if answers.len() < 2 {
        return Err(QuestionError::TooFewAnswers {
            count: answers.len(),
        });
    }

    let mut seen = HashSet::with_capacity(answers.len());
    let mut out = Vec::with_capacity(answers.len());
    for (index, answer) in answers.into_iter().enumerate() {
        let answer = answer.trim().to_owned();
        if answer.is_empty() {
            return Err(QuestionError::EmptyAnswer { index });
        }
        if !seen.insert(answer.to_lowercase()) {
            return Err(QuestionError::DuplicateAnswer { index });
        }
        out.push(answer);
    }
    Ok(out)
}

/// Seed used to order the answers of one question within a session.
#[must_use]
pub fn answer_seed(session_seed: u32, question_id: QuestionId) -> u32 {
    session_seed.wrapping_add(question_id.value().wrapping_mul(ANSWER_SEED_STRIDE))
}

//
// ─── PREPARED QUESTION ─────────────────────────────────────────────────────────
//

/// A question with answers in play order for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    pub id: QuestionId,
    pub text: String,
    pub shuffled_answers: Vec<String>,
    pub correct_index: usize,
}

impl PreparedQuestion {
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }

    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.shuffled_answers.len()
    }
}
