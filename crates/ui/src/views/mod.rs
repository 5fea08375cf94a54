mod about;
mod home;
mod leaderboard;
mod playground;
mod state;
mod tools;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use about::AboutView;
pub use home::HomeView;
pub use leaderboard::LeaderboardView;
pub use playground::PlaygroundView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use tools::ToolsView;
