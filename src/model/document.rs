use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use super::ball::PlayerId;
use super::match_record::Match;
use super::stats::{PlayerStats, StatsBook};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Player,
    Umpire,
    Admin,
}

/// An account of the surrounding application. Only read by the scoring core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: PlayerId,
    pub username: String,
    pub password: Option<String>,
    pub role: Role,
}

/// The whole persisted application state, written back as one unit after
/// every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub users: Vec<User>,
    pub current_user: Option<User>,
    /// Statistics from matches played on a team roster.
    pub player_stats: StatsBook,
    /// Statistics from matches played as a common (guest) player.
    pub common_stats: StatsBook,
    /// Finalized matches, oldest first.
    pub history: Vec<Match>,
    pub live_match: Option<Match>,
}

impl AppState {
    /// A fresh document with zeroed statistics in both pools for every player.
    pub fn seeded(users: Vec<User>) -> Self {
        let mut state = AppState {
            users,
            ..AppState::default()
        };
        for user in state.users.iter().filter(|u| u.role == Role::Player) {
            state
                .player_stats
                .insert(user.id.clone(), PlayerStats::new(user.id.clone()));
            state
                .common_stats
                .insert(user.id.clone(), PlayerStats::new(user.id.clone()));
        }
        state
    }

    pub fn players(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Player)
    }
}
