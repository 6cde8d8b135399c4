use std::path::PathBuf;

use crate::model::{Participant, PlayerId};

/// All errors that can occur while scoring or aggregating a match.
///
/// Every variant is a rejection: the state the command was applied to is
/// left untouched.
#[derive(thiserror::Error, Debug)]
pub enum ScoringError {
    /// A command needs a live match but the live slot is empty.
    #[error("no live match")]
    NoLiveMatch,

    /// A new match was started while another one is still live.
    #[error("match {id} is still live")]
    MatchInProgress { id: String },

    /// Scoring was attempted after the result was decided.
    #[error("match is finished")]
    MatchFinished,

    /// The match must be finished before it can be finalized.
    #[error("match is not finished yet")]
    MatchNotFinished,

    /// Scoring was attempted while an innings-transition or tie decision is pending.
    #[error("awaiting {0} decision")]
    AwaitingDecision(crate::model::PendingDecision),

    /// The command answers a decision that is not being asked.
    #[error("no {0} decision is pending")]
    NoPendingDecision(crate::model::PendingDecision),

    /// A ball was recorded before a batsman was selected.
    #[error("select a batsman first")]
    MissingBatsman,

    /// A ball was recorded before a bowler was selected.
    #[error("select a bowler first")]
    MissingBowler,

    /// The participant cannot bat for the side currently batting.
    #[error("{0} cannot bat now")]
    IneligibleBatsman(Participant),

    /// The participant cannot bowl for the side currently fielding.
    #[error("{0} cannot bowl now")]
    IneligibleBowler(Participant),

    /// The same bowler may not bowl two overs in a row.
    #[error("{0} bowled the previous over")]
    ConsecutiveOvers(Participant),

    /// The delivery fields contradict each other.
    #[error("invalid delivery: {reason}")]
    InvalidDelivery { reason: &'static str },

    /// The match setup violates a roster or format rule.
    #[error("invalid match setup: {reason}")]
    InvalidSetup { reason: String },

    /// A player appears in more than one of teams, commons and anonymous slots.
    #[error("player {0} is assigned more than once")]
    DuplicateAssignment(PlayerId),

    /// Loading or saving the state document failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a [`StateStore`](crate::StateStore) implementation.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Reading or writing the document file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document could not be encoded or decoded as JSON.
    #[error("malformed state document: {0}")]
    Json(#[from] serde_json::Error),

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("state store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, ScoringError>;
