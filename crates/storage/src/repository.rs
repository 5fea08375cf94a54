use async_trait::async_trait;
use detective_core::model::{Case, CaseId, Challenge, ChallengeId};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid bank entry: {0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read access to cases and playground challenges.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Fetch a case by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the case is missing.
    async fn get_case(&self, id: CaseId) -> Result<Case, StorageError>;

    /// All cases ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn list_cases(&self) -> Result<Vec<Case>, StorageError>;

    /// All playground challenges ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError>;
}

/// Simple in-memory bank, also the target of the JSON loader.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    cases: Arc<Mutex<BTreeMap<CaseId, Case>>>,
    challenges: Arc<Mutex<BTreeMap<ChallengeId, Challenge>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a case with the same id exists.
    pub fn insert_case(&self, case: Case) -> Result<(), StorageError> {
        let mut guard = self
            .cases
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&case.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(case.id(), case);
        Ok(())
    }

    /// Add a challenge.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a challenge with the same id exists.
    pub fn insert_challenge(&self, challenge: Challenge) -> Result<(), StorageError> {
        let mut guard = self
            .challenges
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&challenge.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(challenge.id(), challenge);
        Ok(())
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn get_case(&self, id: CaseId) -> Result<Case, StorageError> {
        let guard = self
            .cases
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_cases(&self) -> Result<Vec<Case>, StorageError> {
        let guard = self
            .cases
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        let guard = self
            .challenges
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

/// Storage handles passed to the services layer.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn QuestionBank>,
}

impl Storage {
    /// An empty bank.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            bank: Arc::new(InMemoryQuestionBank::new()),
        }
    }

    /// The bank shipped with the app.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bundled data fails validation.
    pub fn builtin() -> Result<Self, StorageError> {
        let bank = json::builtin_bank()?;
        Ok(Self {
            bank: Arc::new(bank),
        })
    }

    /// A bank loaded from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, StorageError> {
        let bank = json::load_bank_from_path(path)?;
        Ok(Self {
            bank: Arc::new(bank),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::model::{Question, QuestionId};

    fn build_case(id: u8) -> Case {
        let question = Question::new(
            QuestionId::new(1),
            "Q",
            vec!["right".to_string(), "wrong".to_string()],
        )
        .unwrap();
        Case::new(CaseId::new(id), format!("Case {id}"), "", vec![question]).unwrap()
    }

    #[tokio::test]
    async fn in_memory_roundtrip() {
        let bank = InMemoryQuestionBank::new();
        bank.insert_case(build_case(2)).unwrap();
        bank.insert_case(build_case(1)).unwrap();

        let fetched = bank.get_case(CaseId::new(2)).await.unwrap();
        assert_eq!(fetched.title(), "Case 2");

        let ids: Vec<_> = bank
            .list_cases()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id().value())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn missing_case_is_not_found() {
        let bank = InMemoryQuestionBank::new();
        let err = bank.get_case(CaseId::new(9)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn duplicate_case_conflicts() {
        let bank = InMemoryQuestionBank::new();
        bank.insert_case(build_case(1)).unwrap();
        let err = bank.insert_case(build_case(1)).unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }
}
