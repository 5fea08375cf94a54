mod progress;
mod service;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, QuizSession, RecordStatus, SessionPhase};
pub use workflow::{CaseStatus, QuizLoopService};
