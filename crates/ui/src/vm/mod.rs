mod analysis_vm;
mod leaderboard_vm;
mod playground_vm;
mod quiz_vm;
mod time_fmt;

pub use analysis_vm::{AnalysisVm, TxRowVm};
pub use leaderboard_vm::{LeaderboardRowVm, map_leaderboard_rows};
pub use playground_vm::{PlaygroundVm, next_practice};
pub use quiz_vm::{Feedback, QuizIntent, QuizVm, start_quiz};
