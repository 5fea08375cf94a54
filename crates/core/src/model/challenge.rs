use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::ChallengeId;
use crate::model::question::{QuestionError, validate_answers};
use crate::shuffle::arrange;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("challenge {field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error(transparent)]
    Options(#[from] QuestionError),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ChallengeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ChallengeError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Authored fields of a playground challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeDraft {
    pub title: String,
    pub description: String,
    pub question: String,
    /// `options[0]` is the correct option.
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub explanation: String,
}

/// A standalone security scenario used for practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    id: ChallengeId,
    title: String,
    description: String,
    question: String,
    options: Vec<String>,
    difficulty: Difficulty,
    explanation: String,
}

impl Challenge {
    /// # Errors
    ///
    /// Returns `ChallengeError` if a text field is blank or the options fail
    /// the same checks as question answers.
    pub fn new(id: ChallengeId, draft: ChallengeDraft) -> Result<Self, ChallengeError> {
        let title = non_empty(draft.title, "title")?;
        let description = non_empty(draft.description, "description")?;
        let question = non_empty(draft.question, "question")?;
        let explanation = non_empty(draft.explanation, "explanation")?;
        let options = validate_answers(draft.options)?;

        Ok(Self {
            id,
            title,
            description,
            question,
            options,
            difficulty: draft.difficulty,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Options in display order plus the index of the correct one.
    #[must_use]
    pub fn arranged_options(&self, seed: u32) -> (Vec<String>, usize) {
        arrange(&self.options, seed)
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, ChallengeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChallengeError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}
