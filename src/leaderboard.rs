use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::model::{PlayerId, PlayerStats, Role, StatsBook, User};

/// A ranking key over [`PlayerStats`].
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
    EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Runs,
    HighestScore,
    Balls,
    StrikeRate,
    Sixes,
    Fours,
    Dots,
    Ducks,
    Wickets,
    Maidens,
    Economy,
    OversBowled,
    RunsConceded,
    MaxRunsInOver,
    DotsBowled,
}

impl Metric {
    /// Lower is better for economy and for the most expensive over.
    pub fn ascending(self) -> bool {
        matches!(self, Metric::Economy | Metric::MaxRunsInOver)
    }

    /// The value of this metric, or `None` when the player has nothing to rank on.
    pub fn value(self, stats: &PlayerStats) -> Option<f64> {
        let count = |n: u32| Some(f64::from(n));
        match self {
            Metric::Runs => count(stats.runs),
            Metric::HighestScore => count(stats.highest_score),
            Metric::Balls => count(stats.balls),
            Metric::StrikeRate => Some(stats.strike_rate()),
            Metric::Sixes => count(stats.sixes),
            Metric::Fours => count(stats.fours),
            Metric::Dots => count(stats.dots),
            Metric::Ducks => count(stats.ducks),
            Metric::Wickets => count(stats.wickets),
            Metric::Maidens => count(stats.maidens),
            Metric::Economy => stats.economy(),
            Metric::OversBowled => count(stats.overs_bowled),
            Metric::RunsConceded => count(stats.runs_conceded),
            Metric::MaxRunsInOver => {
                (stats.max_runs_in_over > 0).then(|| f64::from(stats.max_runs_in_over))
            }
            Metric::DotsBowled => count(stats.dots_bowled),
        }
    }

    fn compare(self, a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) if self.ascending() => a.total_cmp(&b),
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub username: String,
    pub value: Option<f64>,
}

/// Rank every player-role user in `users` by `metric`, best first.
///
/// Players missing from `book` rank as if they had zeroed statistics. Ties
/// keep the order of `users`.
pub fn leaderboard(book: &StatsBook, users: &[User], metric: Metric) -> Vec<LeaderboardEntry> {
    let empty = PlayerStats::default();
    users
        .iter()
        .filter(|u| u.role == Role::Player)
        .map(|u| LeaderboardEntry {
            player_id: u.id.clone(),
            username: u.username.clone(),
            value: metric.value(book.get(&u.id).unwrap_or(&empty)),
        })
        .sorted_by(|a, b| metric.compare(a.value, b.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            username: format!("{id}-name"),
            password: None,
            role,
        }
    }

    fn book() -> StatsBook {
        [
            PlayerStats {
                runs: 40,
                balls: 20,
                overs_bowled: 2,
                runs_conceded: 20,
                max_runs_in_over: 12,
                ..PlayerStats::new("p1")
            },
            PlayerStats {
                runs: 55,
                balls: 50,
                overs_bowled: 4,
                runs_conceded: 16,
                max_runs_in_over: 6,
                ..PlayerStats::new("p2")
            },
            PlayerStats {
                runs: 10,
                balls: 4,
                ..PlayerStats::new("p3")
            },
        ]
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect()
    }

    fn users() -> Vec<User> {
        vec![
            user("p1", Role::Player),
            user("p2", Role::Player),
            user("p3", Role::Player),
            user("u1", Role::Umpire),
        ]
    }

    fn ids(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.player_id.as_str()).collect()
    }

    #[test]
    fn test_descending_metrics() {
        let board = leaderboard(&book(), &users(), Metric::Runs);
        assert_eq!(ids(&board), ["p2", "p1", "p3"]);
        assert_eq!(board[0].value, Some(55.0));
        assert_eq!(board[0].username, "p2-name");

        let board = leaderboard(&book(), &users(), Metric::StrikeRate);
        assert_eq!(ids(&board), ["p3", "p1", "p2"]);
        assert_eq!(board[0].value, Some(250.0));
    }

    #[test]
    fn test_ascending_metrics_put_missing_last() {
        let board = leaderboard(&book(), &users(), Metric::Economy);
        assert_eq!(ids(&board), ["p2", "p1", "p3"]);
        assert_eq!(board[0].value, Some(4.0));
        assert_eq!(board[2].value, None);

        let board = leaderboard(&book(), &users(), Metric::MaxRunsInOver);
        assert_eq!(ids(&board), ["p2", "p1", "p3"]);
        assert_eq!(board[2].value, None);
    }

    #[test]
    fn test_only_players_ranked_and_missing_books_are_zero() {
        let mut users = users();
        users.push(user("p4", Role::Player));
        let board = leaderboard(&book(), &users, Metric::Wickets);
        assert_eq!(board.len(), 4);
        assert!(board.iter().all(|e| e.value == Some(0.0)));
        // Ties keep roster order.
        assert_eq!(ids(&board), ["p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::MaxRunsInOver.to_string(), "maxRunsInOver");
        assert_eq!(Metric::from_str("oversBowled").unwrap(), Metric::OversBowled);
        assert_eq!(Metric::iter().filter(|m| m.ascending()).count(), 2);
    }
}
