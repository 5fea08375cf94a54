mod address;
mod case;
mod challenge;
mod ids;
mod question;
mod record;
mod verdict;

pub use ids::{CaseId, ChallengeId, ParseIdError, QuestionId};

pub use address::{Address, AddressError};
pub use case::{Case, CaseError};
pub use challenge::{Challenge, ChallengeDraft, ChallengeError, Difficulty};
pub use question::{PreparedQuestion, Question, QuestionError, answer_seed};
pub use record::CaseRecord;
pub use verdict::Verdict;
