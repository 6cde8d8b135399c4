use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::model::{
    BallEvent, DeliveryKind, Innings, Match, NoBallOutcome, Participant, PlayerStats, StatsBook,
    BALLS_PER_OVER,
};

/// The two statistics pools plus the rule deciding which one a participant feeds.
struct Books<'a> {
    own: StatsBook,
    common: StatsBook,
    commons: &'a [Participant],
}

impl Books<'_> {
    /// Stats record for a participant, created zeroed on first use.
    /// Anonymous participants have none.
    fn entry(&mut self, participant: &Participant) -> Option<&mut PlayerStats> {
        let id = participant.player_id()?;
        let book = if self.commons.contains(participant) {
            &mut self.common
        } else {
            &mut self.own
        };
        Some(
            book.entry(id.clone())
                .or_insert_with(|| PlayerStats::new(id.clone())),
        )
    }
}

/// Fold a finished match into the own and common statistics books.
///
/// Not idempotent: a match folded twice is counted twice.
#[instrument(skip_all, fields(match_id = %m.id))]
pub fn fold_match(m: &Match, own: StatsBook, common: StatsBook) -> (StatsBook, StatsBook) {
    let mut books = Books {
        own,
        common,
        commons: &m.commons,
    };

    for participant in m.participants().unique() {
        if let Some(stats) = books.entry(participant) {
            stats.matches += 1;
        }
    }

    for innings in &m.innings {
        fold_innings(&mut books, innings);
    }

    debug!(
        innings = m.innings.len(),
        own = books.own.len(),
        common = books.common.len(),
        "folded match"
    );
    (books.own, books.common)
}

fn fold_innings(books: &mut Books, innings: &Innings) {
    // Each batsman's score so far in this innings.
    let mut running: HashMap<&Participant, u32> = HashMap::new();

    for over in innings.overs.iter().filter(|o| !o.balls.is_empty()) {
        let mut over_runs = 0;
        let mut maiden = over.balls.len() >= BALLS_PER_OVER;

        for ball in &over.balls {
            over_runs += ball.runs;
            if !ball.is_legal() || ball.runs > 0 {
                maiden = false;
            }
            fold_batting(books, &mut running, ball);
            fold_bowling(books, ball);
        }

        let Some(bowler) = &over.bowler else {
            continue;
        };
        if let Some(stats) = books.entry(bowler) {
            stats.overs_bowled += 1;
            if maiden {
                stats.maidens += 1;
            }
            stats.max_runs_in_over = stats.max_runs_in_over.max(over_runs);
        }
    }
}

fn fold_batting<'m>(
    books: &mut Books,
    running: &mut HashMap<&'m Participant, u32>,
    ball: &'m BallEvent,
) {
    let first_appearance = !running.contains_key(&ball.batsman);
    let score = running.entry(&ball.batsman).or_insert(0);
    let Some(stats) = books.entry(&ball.batsman) else {
        return;
    };
    if first_appearance {
        stats.innings += 1;
    }

    match ball.kind {
        DeliveryKind::Wide => stats.wide_faced += 1,
        DeliveryKind::NoBall => {
            stats.nb_faced += 1;
            if let Some(NoBallOutcome::Runs(runs)) = ball.no_ball {
                credit_runs(stats, score, runs);
            }
        }
        DeliveryKind::Dot | DeliveryKind::Runs => {
            stats.balls += 1;
            credit_runs(stats, score, ball.runs);
        }
        // The dismissal ball counts as an out only, not as a ball faced.
        DeliveryKind::Wicket => {}
    }

    if ball.is_dismissal() {
        stats.outs += 1;
        if *score == 0 {
            stats.ducks += 1;
        }
    }
    stats.highest_score = stats.highest_score.max(*score);
}

fn credit_runs(stats: &mut PlayerStats, score: &mut u32, runs: u32) {
    stats.runs += runs;
    *score += runs;
    match runs {
        0 => stats.dots += 1,
        1 => stats.ones += 1,
        2 => stats.twos += 1,
        4 => stats.fours += 1,
        6 => stats.sixes += 1,
        _ => {}
    }
}

fn fold_bowling(books: &mut Books, ball: &BallEvent) {
    let Some(stats) = books.entry(&ball.bowler) else {
        return;
    };
    stats.runs_conceded += ball.runs;

    match ball.kind {
        DeliveryKind::Wicket => stats.wickets += 1,
        DeliveryKind::Wide => stats.wide_bowled += 1,
        DeliveryKind::NoBall => stats.nb_bowled += 1,
        DeliveryKind::Dot => stats.dots_bowled += 1,
        DeliveryKind::Runs if ball.runs == 0 => stats.dots_bowled += 1,
        DeliveryKind::Runs => {}
    }

    if ball.is_legal() {
        match ball.runs {
            1 => stats.ones_conceded += 1,
            2 => stats.twos_conceded += 1,
            4 => stats.fours_conceded += 1,
            6 => stats.sixes_conceded += 1,
            _ => {}
        }
    }
}
