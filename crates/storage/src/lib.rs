#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use repository::{InMemoryQuestionBank, QuestionBank, Storage, StorageError};
