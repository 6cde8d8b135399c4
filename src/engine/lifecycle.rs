use tracing::{info, instrument};

use super::over::ensure_scoring;
use crate::error::{Result, ScoringError};
use crate::model::{
    Innings, Match, MatchSetup, MatchStatus, PendingDecision, Selection, Stage, Winner,
};

/// Overs in each innings of a super over.
pub(crate) const SUPER_OVER_OVERS: u32 = 1;

#[instrument(skip(setup), fields(match_id = %setup.id))]
pub(crate) fn start_match(setup: MatchSetup) -> Result<Match> {
    setup.validate()?;
    let batting_side = setup.toss.batting_side();
    info!(%batting_side, max_overs = setup.max_overs, "match started");
    Ok(Match {
        id: setup.id,
        date: setup.date,
        max_overs: setup.max_overs,
        team_a: setup.team_a,
        team_b: setup.team_b,
        commons: setup.commons,
        others: setup.others,
        toss: setup.toss,
        innings: vec![Innings::new(batting_side, Stage::Main, setup.max_overs)],
        status: MatchStatus::Live,
        winner: None,
        pending: None,
        selection: Selection::default(),
    })
}

/// End-of-innings and end-of-match checks, run after every recorded ball.
pub(crate) fn after_ball(m: Match) -> Match {
    let innings = m.current_innings();
    if let Some(target) = m.target() {
        if innings.score >= target {
            let side = innings.batting_side;
            return finish(m, Winner::Team(side));
        }
    }
    let all_dismissed = innings.wickets as usize >= m.eligible_batsmen(innings.batting_side);
    if all_dismissed || innings.all_out {
        return close_innings(m);
    }
    m
}

/// The innings in play is over: ask for the chase, or settle the result.
fn close_innings(mut m: Match) -> Match {
    let Some(target) = m.target() else {
        info!(
            score = m.current_innings().score,
            "innings ended, awaiting confirmation"
        );
        m.pending = Some(PendingDecision::SecondInnings);
        return m;
    };

    let innings = m.current_innings();
    let chasing = innings.batting_side;
    if innings.score >= target {
        finish(m, Winner::Team(chasing))
    } else if innings.score + 1 == target {
        info!(score = innings.score, "scores level, awaiting tie-break");
        m.pending = Some(PendingDecision::TieBreak);
        m
    } else {
        finish(m, Winner::Team(chasing.opponent()))
    }
}

fn finish(mut m: Match, winner: Winner) -> Match {
    info!(?winner, "match finished");
    m.status = MatchStatus::Finished;
    m.winner = Some(winner);
    m.pending = None;
    m
}

fn take_decision(m: &mut Match, decision: PendingDecision) -> Result<()> {
    if m.status == MatchStatus::Finished || m.pending != Some(decision) {
        return Err(ScoringError::NoPendingDecision(decision));
    }
    m.pending = None;
    Ok(())
}

#[instrument(skip(m), fields(match_id = %m.id))]
pub(crate) fn end_inning_manually(mut m: Match) -> Result<Match> {
    ensure_scoring(&m)?;
    m.current_innings_mut().all_out = true;
    Ok(close_innings(m))
}

/// Start the chase once the umpire confirms the first innings of a pair is over.
#[instrument(skip(m), fields(match_id = %m.id))]
pub(crate) fn confirm_second_innings(mut m: Match) -> Result<Match> {
    take_decision(&mut m, PendingDecision::SecondInnings)?;
    let previous = m.current_innings();
    let chase = Innings::new(
        previous.batting_side.opponent(),
        previous.stage,
        previous.max_overs,
    );
    info!(batting_side = %chase.batting_side, "second innings started");
    m.innings.push(chase);
    m.selection = Selection::default();
    Ok(m)
}

#[instrument(skip(m), fields(match_id = %m.id))]
pub(crate) fn declare_draw(mut m: Match) -> Result<Match> {
    take_decision(&mut m, PendingDecision::TieBreak)?;
    Ok(finish(m, Winner::Draw))
}

/// Settle a tie with a one-over shootout; the toss decides who bats first.
#[instrument(skip(m), fields(match_id = %m.id))]
pub(crate) fn start_super_over(mut m: Match) -> Result<Match> {
    take_decision(&mut m, PendingDecision::TieBreak)?;
    let round = match m.current_innings().stage {
        Stage::Main => 1,
        Stage::SuperOver(round) => round + 1,
    };
    let batting_side = m.toss.batting_side();
    info!(round, %batting_side, "super over started");
    m.innings.push(Innings::new(
        batting_side,
        Stage::SuperOver(round),
        SUPER_OVER_OVERS,
    ));
    m.status = MatchStatus::Live;
    m.winner = None;
    m.selection = Selection::default();
    Ok(m)
}
