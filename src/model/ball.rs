use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::error::{Result, ScoringError};

/// Identifier of a registered player (a user with the PLAYER role).
pub type PlayerId = String;

/// Someone who can bat or bowl in a match.
///
/// Anonymous participants fill the numbered "other" slots of a match setup.
/// They play like anyone else but never receive statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Participant {
    Roster { id: PlayerId },
    Anonymous { slot: u8 },
}

impl Participant {
    /// A registered player.
    pub fn roster(id: impl Into<PlayerId>) -> Self {
        Participant::Roster { id: id.into() }
    }

    /// The anonymous player filling "other" slot `slot`.
    pub fn anonymous(slot: u8) -> Self {
        Participant::Anonymous { slot }
    }

    /// The registered player behind this participant, if any.
    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            Participant::Roster { id } => Some(id),
            Participant::Anonymous { .. } => None,
        }
    }
}

impl Display for Participant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Participant::Roster { id } => write!(f, "{id}"),
            Participant::Anonymous { slot } => write!(f, "OTHER_{slot}"),
        }
    }
}

/// What happened on a single delivery.
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryKind {
    Dot,
    Runs,
    Wide,
    NoBall,
    Wicket,
}

impl DeliveryKind {
    /// Wides and no-balls do not use up one of the six balls of an over.
    pub fn is_legal(self) -> bool {
        !matches!(self, DeliveryKind::Wide | DeliveryKind::NoBall)
    }
}

/// The bat-credited outcome carried by a no-ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoBallOutcome {
    Runs(u32),
    Wicket,
    Wide,
}

/// One recorded delivery. Immutable once appended to an over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub batsman: Participant,
    pub bowler: Participant,
    pub kind: DeliveryKind,
    pub runs: u32,
    pub no_ball: Option<NoBallOutcome>,
}

impl BallEvent {
    pub fn is_legal(&self) -> bool {
        self.kind.is_legal()
    }

    /// A batsman is out on a WICKET delivery or a no-ball whose outcome is a wicket.
    pub fn is_dismissal(&self) -> bool {
        self.kind == DeliveryKind::Wicket || self.no_ball == Some(NoBallOutcome::Wicket)
    }
}

/// Umpire input for a delivery, before the batsman and bowler are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub kind: DeliveryKind,
    pub runs: u32,
    pub no_ball: Option<NoBallOutcome>,
}

impl Delivery {
    pub fn dot() -> Self {
        Self {
            kind: DeliveryKind::Dot,
            runs: 0,
            no_ball: None,
        }
    }

    /// Runs off the bat on a legal ball. Zero is allowed and counts as a dot.
    pub fn runs(runs: u32) -> Self {
        Self {
            kind: DeliveryKind::Runs,
            runs,
            no_ball: None,
        }
    }

    /// A wide, with any extra runs completed on it.
    pub fn wide(extras: u32) -> Self {
        Self {
            kind: DeliveryKind::Wide,
            runs: extras,
            no_ball: None,
        }
    }

    /// A no-ball. Only bat runs are scored; there is no penalty run.
    pub fn no_ball(outcome: NoBallOutcome) -> Self {
        let runs = match outcome {
            NoBallOutcome::Runs(runs) => runs,
            NoBallOutcome::Wicket | NoBallOutcome::Wide => 0,
        };
        Self {
            kind: DeliveryKind::NoBall,
            runs,
            no_ball: Some(outcome),
        }
    }

    pub fn wicket() -> Self {
        Self {
            kind: DeliveryKind::Wicket,
            runs: 0,
            no_ball: None,
        }
    }

    /// Reject field combinations no umpire button can produce.
    pub fn validate(&self) -> Result<()> {
        let reason = match (self.kind, self.no_ball) {
            (DeliveryKind::NoBall, None) => Some("a no-ball needs an outcome"),
            (DeliveryKind::NoBall, Some(NoBallOutcome::Runs(runs))) if runs != self.runs => {
                Some("no-ball runs disagree with its outcome")
            }
            (DeliveryKind::NoBall, Some(NoBallOutcome::Wicket | NoBallOutcome::Wide))
                if self.runs != 0 =>
            {
                Some("a no-ball wicket or wide carries no runs")
            }
            (DeliveryKind::NoBall, Some(_)) => None,
            (_, Some(_)) => Some("only a no-ball carries an outcome"),
            (DeliveryKind::Dot, None) if self.runs != 0 => Some("a dot ball scores no runs"),
            (DeliveryKind::Wicket, None) if self.runs != 0 => Some("a wicket ball scores no runs"),
            _ => None,
        };
        match reason {
            Some(reason) => Err(ScoringError::InvalidDelivery { reason }),
            None => Ok(()),
        }
    }

    pub(crate) fn into_event(self, batsman: Participant, bowler: Participant) -> BallEvent {
        BallEvent {
            batsman,
            bowler,
            kind: self.kind,
            runs: self.runs,
            no_ball: self.no_ball,
        }
    }
}
