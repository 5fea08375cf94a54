use detective_core::model::ChallengeId;
use services::{PlaygroundService, PracticeOutcome, PracticeRound};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaygroundVm {
    round: PracticeRound,
    outcome: Option<PracticeOutcome>,
}

impl PlaygroundVm {
    #[must_use]
    pub fn new(round: PracticeRound) -> Self {
        Self {
            round,
            outcome: None,
        }
    }

    #[must_use]
    pub fn challenge_id(&self) -> ChallengeId {
        self.round.challenge().id()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.round.challenge().title()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.round.challenge().description()
    }

    #[must_use]
    pub fn question(&self) -> &str {
        self.round.challenge().question()
    }

    #[must_use]
    pub fn difficulty_label(&self) -> &'static str {
        self.round.challenge().difficulty().as_str()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        self.round.options()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.round.selected()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, Some(PracticeOutcome::Correct { .. }))
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&'static str> {
        self.outcome.as_ref().map(|outcome| match outcome {
            PracticeOutcome::Correct { .. } => "Correct!",
            PracticeOutcome::Incorrect => "Not quite. Try another option.",
        })
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.round.revealed_explanation()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for an index past the options.
    pub fn select(&mut self, index: usize) -> Result<(), ViewError> {
        let outcome = self
            .round
            .check(index)
            .map_err(|err| ViewError::from_session(&err))?;
        self.outcome = Some(outcome);
        Ok(())
    }
}

/// # Errors
///
/// Returns `ViewError::CaseNotFound` when the bank has no challenges.
pub async fn next_practice(
    playground: &PlaygroundService,
    current: Option<ChallengeId>,
) -> Result<PlaygroundVm, ViewError> {
    let round = playground
        .next_round(current)
        .await
        .map_err(|_| ViewError::CaseNotFound)?;
    Ok(PlaygroundVm::new(round))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use detective_core::model::{Challenge, ChallengeDraft, Difficulty};
    use storage::InMemoryQuestionBank;

    use super::*;

    fn challenge(id: u32) -> Challenge {
        Challenge::new(
            ChallengeId::new(id),
            ChallengeDraft {
                title: format!("Challenge {id}"),
                description: "Spot the bug".into(),
                question: "Which line re-enters?".into(),
                options: vec!["The external call".into(), "The event".into()],
                difficulty: Difficulty::Medium,
                explanation: "State is updated after the call.".into(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn practice_round_reveals_explanation_once_solved() {
        let bank = InMemoryQuestionBank::new();
        bank.insert_challenge(challenge(1)).unwrap();
        let service = PlaygroundService::new(Arc::new(bank));

        let mut vm = next_practice(&service, None).await.unwrap();
        assert_eq!(vm.difficulty_label(), "Medium");
        let correct = vm
            .options()
            .iter()
            .position(|option| option == "The external call")
            .unwrap();

        vm.select(1 - correct).unwrap();
        assert_eq!(vm.feedback(), Some("Not quite. Try another option."));
        assert_eq!(vm.explanation(), None);

        vm.select(correct).unwrap();
        assert!(vm.is_solved());
        assert_eq!(vm.explanation(), Some("State is updated after the call."));
        assert_eq!(vm.select(9), Err(ViewError::Unknown));
    }

    #[tokio::test]
    async fn empty_bank_has_no_practice() {
        let service = PlaygroundService::new(Arc::new(InMemoryQuestionBank::new()));
        assert_eq!(
            next_practice(&service, None).await.err(),
            Some(ViewError::CaseNotFound)
        );
    }
}
