use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ball::PlayerId;

/// Career statistics of a player, keyed by player id.
pub type StatsBook = BTreeMap<PlayerId, PlayerStats>;

/// Cumulative batting and bowling totals for one player in one pool
/// (own-team matches or common-player matches).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub id: PlayerId,
    pub matches: u32,
    pub innings: u32,

    // Batting
    pub runs: u32,
    pub highest_score: u32,
    pub balls: u32,
    pub dots: u32,
    pub ones: u32,
    pub twos: u32,
    pub fours: u32,
    pub sixes: u32,
    pub wide_faced: u32,
    pub nb_faced: u32,
    pub outs: u32,
    pub ducks: u32,

    // Bowling
    pub wickets: u32,
    pub overs_bowled: u32,
    pub runs_conceded: u32,
    pub dots_bowled: u32,
    pub ones_conceded: u32,
    pub twos_conceded: u32,
    pub fours_conceded: u32,
    pub sixes_conceded: u32,
    pub wide_bowled: u32,
    pub nb_bowled: u32,
    pub maidens: u32,
    pub max_runs_in_over: u32,
}

impl PlayerStats {
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Runs per 100 balls faced.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            f64::from(self.runs) * 100.0 / f64::from(self.balls)
        }
    }

    /// Runs per dismissal; a batsman never out averages their total.
    pub fn batting_average(&self) -> f64 {
        if self.outs == 0 {
            f64::from(self.runs)
        } else {
            f64::from(self.runs) / f64::from(self.outs)
        }
    }

    /// Runs conceded per over bowled.
    pub fn economy(&self) -> Option<f64> {
        (self.overs_bowled > 0)
            .then(|| f64::from(self.runs_conceded) / f64::from(self.overs_bowled))
    }
}
