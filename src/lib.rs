pub use command::{apply, Command};
pub use engine::aggregate::fold_match;
pub use error::{Result, ScoringError, StoreError};
pub use leaderboard::{leaderboard, LeaderboardEntry, Metric};
pub use model::*;
pub use scorer::Scorer;
pub use store::{JsonFileStore, MemoryStore, StateStore, STATE_PATH_ENV};

mod command;
mod engine;
pub mod error;
mod leaderboard;
pub mod model;
mod scorer;
mod store;
