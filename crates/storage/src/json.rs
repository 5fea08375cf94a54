//! JSON question bank format.
//!
//! ```json
//! { "cases": [{ "id": 1, "title": "...", "summary": "...",
//!               "questions": [{ "id": 1, "text": "...", "answers": ["correct", "..."] }] }],
//!   "challenges": [{ "id": 1, "title": "...", "description": "...", "question": "...",
//!                    "options": ["correct", "..."], "difficulty": "Easy", "explanation": "..." }] }
//! ```

use std::path::Path;

use detective_core::model::{
    Case, CaseId, Challenge, ChallengeDraft, ChallengeId, Difficulty, Question, QuestionId,
};
use serde::Deserialize;

use crate::repository::{InMemoryQuestionBank, StorageError};

const BUILTIN_BANK: &str = include_str!("../data/bank.json");

#[derive(Debug, Deserialize)]
struct BankFile {
    #[serde(default)]
    cases: Vec<CaseEntry>,
    #[serde(default)]
    challenges: Vec<ChallengeEntry>,
}

#[derive(Debug, Deserialize)]
struct CaseEntry {
    id: u8,
    title: String,
    #[serde(default)]
    summary: String,
    questions: Vec<QuestionEntry>,
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    id: u32,
    text: String,
    answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChallengeEntry {
    id: u32,
    title: String,
    description: String,
    question: String,
    options: Vec<String>,
    difficulty: String,
    explanation: String,
}

/// Parse a bank from JSON text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::Invalid` for entries that fail domain validation.
pub fn load_bank_from_str(raw: &str) -> Result<InMemoryQuestionBank, StorageError> {
    let file: BankFile =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let bank = InMemoryQuestionBank::new();

    for entry in file.cases {
        let case_id = entry.id;
        let questions = entry
            .questions
            .into_iter()
            .map(|q| {
                let question_id = q.id;
                Question::new(QuestionId::new(q.id), q.text, q.answers).map_err(|e| {
                    StorageError::Invalid(format!("case {case_id} question {question_id}: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let case = Case::new(CaseId::new(entry.id), entry.title, entry.summary, questions)
            .map_err(|e| StorageError::Invalid(format!("case {case_id}: {e}")))?;
        bank.insert_case(case)?;
    }

    for entry in file.challenges {
        let challenge_id = entry.id;
        let difficulty: Difficulty = entry
            .difficulty
            .parse()
            .map_err(|e| StorageError::Invalid(format!("challenge {challenge_id}: {e}")))?;
        let draft = ChallengeDraft {
            title: entry.title,
            description: entry.description,
            question: entry.question,
            options: entry.options,
            difficulty,
            explanation: entry.explanation,
        };
        let challenge = Challenge::new(ChallengeId::new(entry.id), draft)
            .map_err(|e| StorageError::Invalid(format!("challenge {challenge_id}: {e}")))?;
        bank.insert_challenge(challenge)?;
    }

    Ok(bank)
}

/// Read and parse a bank file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be read, plus any parse error.
pub fn load_bank_from_path(path: &Path) -> Result<InMemoryQuestionBank, StorageError> {
    let raw = std::fs::read_to_string(path)?;
    load_bank_from_str(&raw)
}

/// The bank compiled into the binary.
///
/// # Errors
///
/// Returns `StorageError` if the bundled data is invalid.
pub fn builtin_bank() -> Result<InMemoryQuestionBank, StorageError> {
    load_bank_from_str(BUILTIN_BANK)
}
