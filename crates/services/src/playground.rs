use std::sync::Arc;

use detective_core::model::{Challenge, ChallengeId};
use rand::Rng;
use rand::seq::IndexedRandom;
use storage::repository::{QuestionBank, StorageError};

use crate::error::SessionError;

/// A practice challenge with options in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeRound {
    challenge: Challenge,
    options: Vec<String>,
    correct_index: usize,
    selected: Option<usize>,
}

/// Result of picking an option in a practice round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeOutcome {
    Correct { explanation: String },
    Incorrect,
}

impl PracticeRound {
    #[must_use]
    pub fn new(challenge: Challenge, seed: u32) -> Self {
        let (options, correct_index) = challenge.arranged_options(seed);
        Self {
            challenge,
            options,
            correct_index,
            selected: None,
        }
    }

    #[must_use]
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Explanation, once the correct option has been picked.
    #[must_use]
    pub fn revealed_explanation(&self) -> Option<&str> {
        (self.selected == Some(self.correct_index)).then(|| self.challenge.explanation())
    }

    /// Pick option `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AnswerOutOfRange` for an index past the options.
    pub fn check(&mut self, index: usize) -> Result<PracticeOutcome, SessionError> {
        let count = self.options.len();
        if index >= count {
            return Err(SessionError::AnswerOutOfRange { index, count });
        }
        self.selected = Some(index);
        if index == self.correct_index {
            Ok(PracticeOutcome::Correct {
                explanation: self.challenge.explanation().to_string(),
            })
        } else {
            Ok(PracticeOutcome::Incorrect)
        }
    }
}

/// Random practice challenges from the question bank.
#[derive(Clone)]
pub struct PlaygroundService {
    bank: Arc<dyn QuestionBank>,
}

impl PlaygroundService {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        Self { bank }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    pub async fn challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        self.bank.list_challenges().await
    }

    /// A random round, avoiding `current` whenever another challenge exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bank has no challenges.
    pub async fn next_round(
        &self,
        current: Option<ChallengeId>,
    ) -> Result<PracticeRound, StorageError> {
        let challenges = self.bank.list_challenges().await?;
        let mut rng = rand::rng();
        let challenge = pick_challenge(&challenges, current, &mut rng)
            .cloned()
            .ok_or(StorageError::NotFound)?;
        Ok(PracticeRound::new(challenge, rng.random()))
    }
}

/// Choose a challenge other than `current` when possible.
pub fn pick_challenge<'a, R: Rng + ?Sized>(
    challenges: &'a [Challenge],
    current: Option<ChallengeId>,
    rng: &mut R,
) -> Option<&'a Challenge> {
    let others: Vec<&Challenge> = challenges
        .iter()
        .filter(|challenge| Some(challenge.id()) != current)
        .collect();
    if others.is_empty() {
        return challenges.first();
    }
    others.choose(rng).copied()
}
