use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use super::ball::Participant;
use super::innings::{Innings, Side};
use crate::error::{Result, ScoringError};

/// Most shared ("common") players a match may have.
pub const MAX_COMMONS: usize = 2;
/// Most anonymous "other" slots a match may have.
pub const MAX_OTHERS: u8 = 10;

/// A team roster for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub captain: Option<Participant>,
    pub players: Vec<Participant>,
}

impl Team {
    /// A roster without a captain.
    pub fn new(players: Vec<Participant>) -> Self {
        Self {
            captain: None,
            players,
        }
    }

    pub fn with_captain(mut self, captain: Participant) -> Self {
        self.captain = Some(captain);
        self
    }
}

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
pub enum TossChoice {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner: Side,
    pub choice: TossChoice,
}

impl Toss {
    /// The side that bats first: the toss winner if they chose to bat.
    pub fn batting_side(&self) -> Side {
        match self.choice {
            TossChoice::Bat => self.winner,
            TossChoice::Bowl => self.winner.opponent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    Live,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Team(Side),
    Draw,
}

/// A question the umpire has to answer before scoring can continue.
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
#[strum(serialize_all = "kebab-case")]
pub enum PendingDecision {
    /// The first innings of a pair ended; the chase starts on confirmation.
    SecondInnings,
    /// The chase finished one run short: draw or super over.
    TieBreak,
}

/// The umpire's current batsman and bowler picks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub batsman: Option<Participant>,
    pub bowler: Option<Participant>,
}

/// Everything needed to start a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub id: String,
    pub date: NaiveDate,
    pub max_overs: u32,
    pub team_a: Team,
    pub team_b: Team,
    pub commons: Vec<Participant>,
    /// Number of anonymous slots; slot numbers run from 1 to `others`.
    pub others: u8,
    pub toss: Toss,
}

impl MatchSetup {
    /// A setup dated today with a timestamp id, no commons and no anonymous slots.
    pub fn new(max_overs: u32, team_a: Team, team_b: Team, toss: Toss) -> Self {
        let now = Local::now();
        Self {
            id: now.timestamp_millis().to_string(),
            date: now.date_naive(),
            max_overs,
            team_a,
            team_b,
            commons: Vec::new(),
            others: 0,
            toss,
        }
    }

    pub fn with_commons(mut self, commons: Vec<Participant>) -> Self {
        self.commons = commons;
        self
    }

    pub fn with_others(mut self, others: u8) -> Self {
        self.others = others;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(ScoringError::InvalidSetup {
                reason: reason.to_string(),
            })
        };
        if self.max_overs == 0 {
            return invalid("a match needs at least one over");
        }
        if self.team_a.players.is_empty() || self.team_b.players.is_empty() {
            return invalid("both teams need at least one player");
        }
        if self.commons.len() > MAX_COMMONS {
            return invalid("at most two common players");
        }
        if self.others > MAX_OTHERS {
            return invalid("at most ten anonymous players");
        }
        for team in [&self.team_a, &self.team_b] {
            if let Some(captain) = &team.captain {
                if !team.players.contains(captain) {
                    return Err(ScoringError::InvalidSetup {
                        reason: format!("captain {captain} is not in their team"),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        let everyone = self
            .team_a
            .players
            .iter()
            .chain(&self.team_b.players)
            .chain(&self.commons);
        for participant in everyone {
            if let Participant::Anonymous { slot } = participant {
                if *slot == 0 || *slot > self.others {
                    return Err(ScoringError::InvalidSetup {
                        reason: format!("no anonymous slot {slot}"),
                    });
                }
            }
            if !seen.insert(participant) {
                return Err(ScoringError::DuplicateAssignment(participant.to_string()));
            }
        }
        Ok(())
    }
}

/// A match from toss to result, ball by ball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub date: NaiveDate,
    /// Overs per innings of the match proper; super overs carry their own limit.
    pub max_overs: u32,
    pub team_a: Team,
    pub team_b: Team,
    pub commons: Vec<Participant>,
    pub others: u8,
    pub toss: Toss,
    /// Never empty; the last entry is the innings in play.
    pub innings: Vec<Innings>,
    pub status: MatchStatus,
    pub winner: Option<Winner>,
    pub pending: Option<PendingDecision>,
    pub selection: Selection,
}

/// The live header shown to the umpire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    /// 1-based position of the innings in play within the match.
    pub innings_number: usize,
    pub batting_side: Side,
    pub score: u32,
    pub wickets: u32,
    pub overs: String,
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
}

impl Match {
    /// The roster of `side`.
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn current_innings(&self) -> &Innings {
        // `innings` is created non-empty and only ever replaced by non-empty lists.
        &self.innings[self.innings.len() - 1]
    }

    pub(crate) fn current_innings_mut(&mut self) -> &mut Innings {
        let last = self.innings.len() - 1;
        &mut self.innings[last]
    }

    pub fn is_common(&self, participant: &Participant) -> bool {
        self.commons.contains(participant)
    }

    /// Batsmen needed to dismiss a side: its roster plus the commons,
    /// anonymous slots included.
    pub fn eligible_batsmen(&self, side: Side) -> usize {
        self.team(side).players.len() + self.commons.len()
    }

    /// Team roster players of both sides and the commons.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.team_a
            .players
            .iter()
            .chain(&self.team_b.players)
            .chain(&self.commons)
    }

    /// In the batting roster or the commons, and not yet out this innings.
    pub fn can_bat(&self, participant: &Participant) -> bool {
        let innings = self.current_innings();
        (self.team(innings.batting_side).players.contains(participant)
            || self.is_common(participant))
            && !innings.dismissed.contains(participant)
    }

    /// In the fielding roster or the commons.
    pub fn can_bowl(&self, participant: &Participant) -> bool {
        let innings = self.current_innings();
        self.team(innings.bowling_side()).players.contains(participant)
            || self.is_common(participant)
    }

    /// Everyone who may be selected to bat next, roster first.
    pub fn available_batsmen(&self) -> Vec<Participant> {
        let side = self.current_innings().batting_side;
        self.team(side)
            .players
            .iter()
            .chain(&self.commons)
            .filter(|p| self.can_bat(p))
            .cloned()
            .collect()
    }

    /// Everyone who may bowl the current over.
    pub fn available_bowlers(&self) -> Vec<Participant> {
        let innings = self.current_innings();
        let previous = innings.previous_bowler();
        self.team(innings.bowling_side())
            .players
            .iter()
            .chain(&self.commons)
            .filter(|p| Some(*p) != previous)
            .cloned()
            .collect()
    }

    /// Index of the first innings of the stage currently in play.
    fn stage_opener(&self) -> usize {
        let stage = self.current_innings().stage;
        self.innings
            .iter()
            .position(|i| i.stage == stage)
            .unwrap_or(self.innings.len() - 1)
    }

    /// Whether the innings in play is the second of its pair.
    pub fn is_chase(&self) -> bool {
        self.stage_opener() < self.innings.len() - 1
    }

    /// Runs the chasing side needs to win, while a chase is in play.
    pub fn target(&self) -> Option<u32> {
        self.is_chase()
            .then(|| self.innings[self.stage_opener()].score + 1)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        let innings = self.current_innings();
        let target = self.target();
        Scoreboard {
            innings_number: self.innings.len(),
            batting_side: innings.batting_side,
            score: innings.score,
            wickets: innings.wickets,
            overs: innings.overs_display(),
            target,
            runs_required: target.map(|t| t.saturating_sub(innings.score)),
        }
    }
}
