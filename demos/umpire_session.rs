use gully_cricket::{
    leaderboard, Delivery, JsonFileStore, MatchSetup, Metric, NoBallOutcome, Participant, Role,
    Scorer, Side, StateStore, Team, Toss, TossChoice, User,
};

fn player(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        username: name.to_string(),
        password: None,
        role: Role::Player,
    }
}

fn main() {
    let store = JsonFileStore::from_env();
    println!("Using state file {}", store.path().display());
    let scorer = Scorer::with_users(
        store,
        vec![
            player("player1", "rohit"),
            player("player2", "virat"),
            player("player3", "jasprit"),
            player("player4", "hardik"),
        ],
    );
    if scorer.state().unwrap().live_match.is_some() {
        println!("Discarding unfinished match");
        scorer.discard_live_match().unwrap();
    }

    let p = |id: &str| Participant::roster(id);
    let setup = MatchSetup::new(
        1,
        Team::new(vec![p("player1"), p("player2")]),
        Team::new(vec![p("player3"), p("player4")]),
        Toss {
            winner: Side::A,
            choice: TossChoice::Bat,
        },
    );
    scorer.start_match(setup).unwrap();

    let innings = [
        ("player1", "player3", Delivery::runs(4)),
        ("player1", "player3", Delivery::wide(1)),
        ("player1", "player3", Delivery::dot()),
        ("player1", "player3", Delivery::wicket()),
        ("player2", "player3", Delivery::runs(2)),
        ("player2", "player3", Delivery::runs(6)),
        ("player2", "player3", Delivery::dot()),
    ];
    for (batsman, bowler, delivery) in innings {
        scorer.select_batsman(p(batsman)).unwrap();
        scorer.select_bowler(p(bowler)).unwrap();
        let state = scorer.record_ball(delivery).unwrap();
        if let Some(live) = &state.live_match {
            println!("{:?}", live.scoreboard());
        }
    }

    println!("First innings over, starting the chase");
    scorer.confirm_second_innings().unwrap();
    let chase = [
        ("player4", "player1", Delivery::runs(6)),
        ("player4", "player1", Delivery::no_ball(NoBallOutcome::Runs(4))),
        ("player4", "player1", Delivery::runs(4)),
    ];
    for (batsman, bowler, delivery) in chase {
        scorer.select_batsman(p(batsman)).unwrap();
        scorer.select_bowler(p(bowler)).unwrap();
        let state = scorer.record_ball(delivery).unwrap();
        if let Some(live) = &state.live_match {
            println!("{:?}", live.scoreboard());
            println!("Winner: {:?}", live.winner);
        }
    }

    let state = scorer.finalize_match().unwrap();
    println!("Archived {} matches", state.history.len());
    for metric in [Metric::Runs, Metric::Economy] {
        println!("Leaderboard by {metric}");
        for entry in leaderboard(&state.player_stats, &state.users, metric) {
            println!("  {} {:?}", entry.username, entry.value);
        }
    }
    serde_json::to_writer_pretty(std::io::stdout(), &scorer.store().load().unwrap()).unwrap();
}
