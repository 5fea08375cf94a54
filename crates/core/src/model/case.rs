use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{CaseId, QuestionId};
use crate::model::question::{PreparedQuestion, Question};
use crate::shuffle::shuffled;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CaseError {
    #[error("case title cannot be empty")]
    EmptyTitle,

    #[error("case has no questions")]
    NoQuestions,

    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

/// A themed set of questions recorded on-chain under one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    id: CaseId,
    title: String,
    summary: String,
    questions: Vec<Question>,
}

impl Case {
    /// # Errors
    ///
    /// Returns `CaseError` if the title is blank, there are no questions, or
    /// two questions share an id.
    pub fn new(
        id: CaseId,
        title: impl Into<String>,
        summary: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, CaseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CaseError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(CaseError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(CaseError::DuplicateQuestion(question.id()));
            }
        }

        Ok(Self {
            id,
            title,
            summary: summary.into().trim().to_owned(),
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> CaseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Question order and answer order for one playthrough.
    #[must_use]
    pub fn prepare(&self, session_seed: u32) -> Vec<PreparedQuestion> {
        shuffled(&self.questions, session_seed)
            .iter()
            .map(|question| question.prepare(session_seed))
            .collect()
    }
}
