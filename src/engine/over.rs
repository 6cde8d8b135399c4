use tracing::{debug, instrument};

use super::lifecycle;
use crate::error::{Result, ScoringError};
use crate::model::{
    Delivery, Match, MatchStatus, Over, Participant, Selection, BALLS_PER_OVER,
};

/// Scoring input is only accepted while the match is live and no decision is pending.
pub(crate) fn ensure_scoring(m: &Match) -> Result<()> {
    if m.status == MatchStatus::Finished {
        return Err(ScoringError::MatchFinished);
    }
    match m.pending {
        Some(decision) => Err(ScoringError::AwaitingDecision(decision)),
        None => Ok(()),
    }
}

/// Pick the next batsman from those still able to bat.
pub(crate) fn select_batsman(mut m: Match, batsman: Participant) -> Result<Match> {
    ensure_scoring(&m)?;
    if !m.can_bat(&batsman) {
        return Err(ScoringError::IneligibleBatsman(batsman));
    }
    m.selection.batsman = Some(batsman);
    Ok(m)
}

/// Pick the bowler; the bowler of the previous over is refused.
pub(crate) fn select_bowler(mut m: Match, bowler: Participant) -> Result<Match> {
    ensure_scoring(&m)?;
    if !m.can_bowl(&bowler) {
        return Err(ScoringError::IneligibleBowler(bowler));
    }
    if m.current_innings().previous_bowler() == Some(&bowler) {
        return Err(ScoringError::ConsecutiveOvers(bowler));
    }
    m.selection.bowler = Some(bowler);
    Ok(m)
}

/// Append a delivery to the current over and apply its consequences.
#[instrument(skip(m), fields(match_id = %m.id))]
pub(crate) fn record_ball(mut m: Match, delivery: Delivery) -> Result<Match> {
    ensure_scoring(&m)?;
    delivery.validate()?;
    let batsman = m.selection.batsman.clone().ok_or(ScoringError::MissingBatsman)?;
    let bowler = m.selection.bowler.clone().ok_or(ScoringError::MissingBowler)?;

    let event = delivery.into_event(batsman.clone(), bowler.clone());
    let dismissal = event.is_dismissal();

    let innings = m.current_innings_mut();
    innings.score += event.runs;
    let over = innings.over_mut();
    over.bowler = Some(bowler);
    over.balls.push(event);

    if dismissal {
        innings.wickets += 1;
        innings.dismissed.insert(batsman);
    }

    let mut over_closed = false;
    if innings.over().legal_balls() == BALLS_PER_OVER {
        innings.over_mut().completed = true;
        if innings.current_over + 1 < innings.max_overs as usize {
            innings.overs.push(Over::default());
            innings.current_over += 1;
            over_closed = true;
        } else {
            innings.all_out = true;
        }
        debug!(
            over = innings.current_over,
            score = innings.score,
            "over completed"
        );
    }

    debug!(
        score = m.current_innings().score,
        wickets = m.current_innings().wickets,
        "recorded ball"
    );

    if dismissal {
        m.selection.batsman = None;
    }
    if over_closed {
        m.selection.bowler = None;
    }
    Ok(lifecycle::after_ball(m))
}

/// Take back the most recent delivery of the innings in play.
///
/// Everything the ball changed is restored, including the selection it was
/// bowled with and any result or pending decision it triggered. With no
/// balls in the innings this is a no-op.
#[instrument(skip(m), fields(match_id = %m.id))]
pub(crate) fn undo_last_ball(mut m: Match) -> Result<Match> {
    let innings = m.current_innings_mut();
    if innings.ball_count() == 0 {
        debug!("nothing to undo");
        return Ok(m);
    }

    if innings.over().balls.is_empty() && innings.current_over > 0 {
        innings.overs.pop();
        innings.current_over -= 1;
    }

    let over = innings.over_mut();
    let Some(ball) = over.balls.pop() else {
        return Ok(m);
    };
    over.completed = over.legal_balls() == BALLS_PER_OVER;
    over.bowler = over.balls.last().map(|b| b.bowler.clone());

    innings.score -= ball.runs;
    if ball.is_dismissal() {
        innings.wickets -= 1;
        innings.dismissed.remove(&ball.batsman);
    }
    innings.all_out = false;

    debug!(score = innings.score, wickets = innings.wickets, "undid ball");

    m.selection = Selection {
        batsman: Some(ball.batsman),
        bowler: Some(ball.bowler),
    };
    m.status = MatchStatus::Live;
    m.winner = None;
    m.pending = None;
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{bowl, bowl_many, p, started};
    use crate::model::{NoBallOutcome, PendingDecision};

    #[test]
    fn test_record_requires_selection() {
        let m = started(2);
        assert!(matches!(
            record_ball(m.clone(), Delivery::dot()),
            Err(ScoringError::MissingBatsman)
        ));
        let m = select_batsman(m, p("a1")).unwrap();
        assert!(matches!(
            record_ball(m, Delivery::dot()),
            Err(ScoringError::MissingBowler)
        ));
    }

    #[test]
    fn test_selection_eligibility() {
        let m = started(2);
        assert!(matches!(
            select_batsman(m.clone(), p("b1")),
            Err(ScoringError::IneligibleBatsman(_))
        ));
        assert!(matches!(
            select_bowler(m.clone(), p("a1")),
            Err(ScoringError::IneligibleBowler(_))
        ));
        let m = bowl(m, "a1", "b1", Delivery::wicket());
        assert!(matches!(
            select_batsman(m, p("a1")),
            Err(ScoringError::IneligibleBatsman(_))
        ));
    }

    #[test]
    fn test_score_tracks_every_ball() {
        let deliveries = [
            Delivery::runs(4),
            Delivery::wide(1),
            Delivery::no_ball(NoBallOutcome::Runs(6)),
            Delivery::runs(3),
            Delivery::dot(),
            Delivery::runs(2),
            Delivery::runs(1),
            Delivery::no_ball(NoBallOutcome::Wide),
        ];
        let mut m = started(5);
        for delivery in deliveries {
            m = bowl(m, "a1", "b1", delivery);
            let innings = m.current_innings();
            let sum: u32 = innings.balls().map(|b| b.runs).sum();
            assert_eq!(innings.score, sum);
        }
        assert_eq!(m.current_innings().score, 17);
    }

    #[test]
    fn test_no_ball_scores_only_bat_runs() {
        let m = bowl(
            started(2),
            "a1",
            "b1",
            Delivery::no_ball(NoBallOutcome::Runs(4)),
        );
        assert_eq!(m.current_innings().score, 4);
        assert_eq!(m.current_innings().over().legal_balls(), 0);
    }

    #[test]
    fn test_wicket_dismisses_and_clears_batsman() {
        let m = bowl(started(2), "a1", "b1", Delivery::wicket());
        let innings = m.current_innings();
        assert_eq!(innings.wickets, 1);
        assert!(innings.dismissed.contains(&p("a1")));
        assert_eq!(m.selection.batsman, None);
        assert_eq!(m.selection.bowler, Some(p("b1")));

        let m = bowl(m, "a2", "b1", Delivery::no_ball(NoBallOutcome::Wicket));
        assert_eq!(m.current_innings().wickets, 2);
    }

    #[test]
    fn test_over_completes_at_six_legal_balls() {
        let mut m = started(2);
        m = bowl(m, "a1", "b1", Delivery::wide(0));
        m = bowl(m, "a1", "b1", Delivery::no_ball(NoBallOutcome::Runs(0)));
        for n in 1..=5 {
            m = bowl(m, "a1", "b1", Delivery::dot());
            assert_eq!(m.current_innings().current_over, 0);
            assert!(!m.current_innings().over().completed, "closed after {n}");
        }
        m = bowl(m, "a1", "b1", Delivery::dot());
        let innings = m.current_innings();
        assert!(innings.overs[0].completed);
        assert_eq!(innings.overs[0].balls.len(), 8);
        assert_eq!(innings.current_over, 1);
        assert!(innings.over().balls.is_empty());
        assert_eq!(m.selection.bowler, None);
    }

    #[test]
    fn test_same_bowler_cannot_bowl_consecutive_overs() {
        let m = bowl_many(started(3), 6, "a1", "b1", Delivery::dot());
        assert!(matches!(
            select_bowler(m.clone(), p("b1")),
            Err(ScoringError::ConsecutiveOvers(_))
        ));
        assert_eq!(m.available_bowlers(), vec![p("b2")]);
        let m = bowl_many(m, 6, "a1", "b2", Delivery::dot());
        assert!(select_bowler(m, p("b1")).is_ok());
    }

    #[test]
    fn test_last_over_exhausts_innings() {
        let m = bowl_many(started(1), 6, "a1", "b1", Delivery::runs(1));
        let innings = &m.innings[0];
        assert!(innings.all_out);
        assert_eq!(innings.overs.len(), 1);
        assert_eq!(m.pending, Some(PendingDecision::SecondInnings));
        assert!(matches!(
            record_ball(m, Delivery::dot()),
            Err(ScoringError::AwaitingDecision(PendingDecision::SecondInnings))
        ));
    }

    #[test]
    fn test_undo_restores_previous_state_exactly() {
        let deliveries = [
            Delivery::runs(1),
            Delivery::wide(2),
            Delivery::dot(),
            Delivery::wicket(),
            Delivery::no_ball(NoBallOutcome::Runs(4)),
            Delivery::runs(6),
            Delivery::dot(),
            Delivery::runs(2),
            Delivery::dot(),
        ];
        let batsmen = ["a1", "a1", "a1", "a1", "a2", "a2", "a2", "a2", "a2"];
        let bowlers = ["b1", "b1", "b1", "b1", "b1", "b1", "b1", "b1", "b2"];

        let mut snapshots = vec![started(2)];
        for i in 0..deliveries.len() {
            let m = snapshots[i].clone();
            let m = select_batsman(m, p(batsmen[i])).unwrap();
            let m = select_bowler(m, p(bowlers[i])).unwrap();
            snapshots[i] = m.clone();
            snapshots.push(record_ball(m, deliveries[i]).unwrap());
        }

        let mut m = snapshots.pop().unwrap();
        while let Some(before) = snapshots.pop() {
            m = undo_last_ball(m).unwrap();
            assert_eq!(m, before);
        }
    }

    #[test]
    fn test_undo_steps_back_over_boundary() {
        let m = bowl_many(started(2), 6, "a1", "b1", Delivery::dot());
        assert_eq!(m.current_innings().overs.len(), 2);
        let m = undo_last_ball(m).unwrap();
        let innings = m.current_innings();
        assert_eq!(innings.overs.len(), 1);
        assert_eq!(innings.current_over, 0);
        assert!(!innings.over().completed);
        assert_eq!(innings.over().balls.len(), 5);
        assert_eq!(m.selection.bowler, Some(p("b1")));
    }

    #[test]
    fn test_undo_without_balls_is_noop() {
        let m = started(2);
        assert_eq!(undo_last_ball(m.clone()).unwrap(), m);
    }

    #[test]
    fn test_undo_retracts_pending_confirmation() {
        let m = bowl_many(started(1), 6, "a1", "b1", Delivery::dot());
        assert_eq!(m.pending, Some(PendingDecision::SecondInnings));
        let m = undo_last_ball(m).unwrap();
        assert_eq!(m.pending, None);
        assert!(!m.current_innings().all_out);
        assert!(record_ball(m, Delivery::dot()).is_ok());
    }
}
