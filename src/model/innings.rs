use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use super::ball::{BallEvent, Participant};

/// Legal deliveries in a complete over.
pub const BALLS_PER_OVER: usize = 6;

/// One of the two teams of a match.
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
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Whether an innings belongs to the match proper or to a tie-breaking super over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Main,
    /// Super overs are numbered from 1; a tied super over leads to the next one.
    SuperOver(u32),
}

/// An over: the ordered deliveries of one bowler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Over {
    pub balls: Vec<BallEvent>,
    /// Bowler of the most recent ball, `None` until the first ball is bowled.
    pub bowler: Option<Participant>,
    pub completed: bool,
}

impl Over {
    pub fn legal_balls(&self) -> usize {
        self.balls.iter().filter(|b| b.is_legal()).count()
    }

    pub fn runs(&self) -> u32 {
        self.balls.iter().map(|b| b.runs).sum()
    }
}

/// One side's turn at batting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innings {
    pub batting_side: Side,
    pub stage: Stage,
    pub max_overs: u32,
    pub score: u32,
    pub wickets: u32,
    pub overs: Vec<Over>,
    pub current_over: usize,
    /// Set when the overs run out or the umpire ends the innings by hand.
    pub all_out: bool,
    pub dismissed: BTreeSet<Participant>,
}

impl Innings {
    pub fn new(batting_side: Side, stage: Stage, max_overs: u32) -> Self {
        Self {
            batting_side,
            stage,
            max_overs,
            score: 0,
            wickets: 0,
            overs: vec![Over::default()],
            current_over: 0,
            all_out: false,
            dismissed: BTreeSet::new(),
        }
    }

    pub fn bowling_side(&self) -> Side {
        self.batting_side.opponent()
    }

    pub fn over(&self) -> &Over {
        &self.overs[self.current_over]
    }

    pub(crate) fn over_mut(&mut self) -> &mut Over {
        &mut self.overs[self.current_over]
    }

    /// Every delivery of the innings in recording order.
    pub fn balls(&self) -> impl Iterator<Item = &BallEvent> {
        self.overs.iter().flat_map(|o| o.balls.iter())
    }

    pub fn ball_count(&self) -> usize {
        self.overs.iter().map(|o| o.balls.len()).sum()
    }

    /// Bowler of the over before the current one, who may not bowl next.
    pub fn previous_bowler(&self) -> Option<&Participant> {
        self.current_over
            .checked_sub(1)
            .and_then(|i| self.overs[i].bowler.as_ref())
    }

    /// Overs in `O.B` notation: completed overs, then legal balls of the open over.
    pub fn overs_display(&self) -> String {
        let completed = self.overs.iter().filter(|o| o.completed).count();
        let over = self.over();
        let balls = if over.completed { 0 } else { over.legal_balls() };
        format!("{completed}.{balls}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Delivery;

    fn ball(delivery: Delivery) -> BallEvent {
        delivery.into_event(Participant::roster("bat"), Participant::roster("bowl"))
    }

    #[test]
    fn test_over_counts_only_legal_balls() {
        let over = Over {
            balls: vec![
                ball(Delivery::runs(1)),
                ball(Delivery::wide(1)),
                ball(Delivery::no_ball(crate::model::NoBallOutcome::Runs(4))),
                ball(Delivery::dot()),
            ],
            bowler: Some(Participant::roster("bowl")),
            completed: false,
        };
        assert_eq!(over.legal_balls(), 2);
        assert_eq!(over.runs(), 6);
    }

    #[test]
    fn test_overs_display() {
        let mut innings = Innings::new(Side::A, Stage::Main, 2);
        assert_eq!(innings.overs_display(), "0.0");
        innings.overs[0].balls.push(ball(Delivery::dot()));
        innings.overs[0].balls.push(ball(Delivery::wide(0)));
        assert_eq!(innings.overs_display(), "0.1");
        innings.overs[0].completed = true;
        assert_eq!(innings.overs_display(), "1.0");
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
    }
}
