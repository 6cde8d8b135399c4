use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{aggregate, lifecycle, over};
use crate::error::{Result, ScoringError};
use crate::model::{AppState, Delivery, Match, MatchSetup, MatchStatus, Participant};

/// An umpire or admin action against the state document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    StartMatch(Box<MatchSetup>),
    SelectBatsman(Participant),
    SelectBowler(Participant),
    /// Bowl a delivery to the selected batsman by the selected bowler.
    RecordBall(Delivery),
    UndoLastBall,
    ConfirmSecondInnings,
    EndInningManually,
    DeclareDraw,
    StartSuperOver,
    /// Fold the finished live match into statistics and archive it.
    FinalizeMatch,
    /// Drop the live match without touching history or statistics.
    DiscardLiveMatch,
}

/// Compute the document that results from applying `command` to `state`.
///
/// `state` is never modified; on error nothing changes and the caller keeps
/// the snapshot it already has.
pub fn apply(state: &AppState, command: Command) -> Result<AppState> {
    let label = format!("{command:?}");
    transition(state, command).inspect_err(|error| warn!(command = %label, %error, "rejected"))
}

fn transition(state: &AppState, command: Command) -> Result<AppState> {
    match command {
        Command::StartMatch(setup) => {
            if let Some(live) = &state.live_match {
                return Err(ScoringError::MatchInProgress {
                    id: live.id.clone(),
                });
            }
            let m = lifecycle::start_match(*setup)?;
            Ok(with_live(state, Some(m)))
        }
        Command::SelectBatsman(batsman) => {
            update_live(state, |m| over::select_batsman(m, batsman))
        }
        Command::SelectBowler(bowler) => update_live(state, |m| over::select_bowler(m, bowler)),
        Command::RecordBall(delivery) => update_live(state, |m| over::record_ball(m, delivery)),
        Command::UndoLastBall => update_live(state, over::undo_last_ball),
        Command::ConfirmSecondInnings => update_live(state, lifecycle::confirm_second_innings),
        Command::EndInningManually => update_live(state, lifecycle::end_inning_manually),
        Command::DeclareDraw => update_live(state, lifecycle::declare_draw),
        Command::StartSuperOver => update_live(state, lifecycle::start_super_over),
        Command::FinalizeMatch => finalize_match(state),
        Command::DiscardLiveMatch => {
            let live = state.live_match.as_ref().ok_or(ScoringError::NoLiveMatch)?;
            info!(match_id = %live.id, "live match discarded");
            Ok(with_live(state, None))
        }
    }
}

fn with_live(state: &AppState, live_match: Option<Match>) -> AppState {
    AppState {
        live_match,
        ..state.clone()
    }
}

fn update_live(state: &AppState, f: impl FnOnce(Match) -> Result<Match>) -> Result<AppState> {
    let live = state.live_match.clone().ok_or(ScoringError::NoLiveMatch)?;
    Ok(with_live(state, Some(f(live)?)))
}

fn finalize_match(state: &AppState) -> Result<AppState> {
    let live = state.live_match.clone().ok_or(ScoringError::NoLiveMatch)?;
    if live.status != MatchStatus::Finished {
        return Err(ScoringError::MatchNotFinished);
    }
    let (player_stats, common_stats) = aggregate::fold_match(
        &live,
        state.player_stats.clone(),
        state.common_stats.clone(),
    );
    info!(match_id = %live.id, winner = ?live.winner, "match archived");

    let mut history = state.history.clone();
    history.push(live);
    Ok(AppState {
        player_stats,
        common_stats,
        history,
        live_match: None,
        ..state.clone()
    })
}
