use tracing::instrument;

use crate::command::{self, Command};
use crate::error::Result;
use crate::model::*;
use crate::store::StateStore;

/// The entry point for an umpire session.
///
/// `Scorer` reads the current document from its [`StateStore`], applies one
/// action and writes the resulting document back before returning it. A
/// rejected action writes nothing.
///
/// # Examples
///
/// ```
/// # fn example() -> gully_cricket::Result<()> {
/// use gully_cricket::{
///     Delivery, MatchSetup, MemoryStore, Participant, Scorer, Side, Team, Toss, TossChoice,
/// };
///
/// let scorer = Scorer::new(MemoryStore::new());
/// let setup = MatchSetup::new(
///     2,
///     Team::new(vec![Participant::roster("player1"), Participant::roster("player2")]),
///     Team::new(vec![Participant::roster("player3"), Participant::roster("player4")]),
///     Toss { winner: Side::A, choice: TossChoice::Bat },
/// );
/// scorer.start_match(setup)?;
/// scorer.select_batsman(Participant::roster("player1"))?;
/// scorer.select_bowler(Participant::roster("player3"))?;
/// let state = scorer.record_ball(Delivery::runs(4))?;
/// assert_eq!(state.live_match.unwrap().scoreboard().score, 4);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Scorer<S> {
    store: S,
    seed_users: Vec<User>,
}

impl<S: StateStore> Scorer<S> {
    /// Create a scorer; an empty store starts from an empty document.
    pub fn new(store: S) -> Self {
        Self {
            store,
            seed_users: Vec::new(),
        }
    }

    /// Create a scorer whose empty store starts from a document seeded with `users`.
    pub fn with_users(store: S, users: Vec<User>) -> Self {
        Self {
            store,
            seed_users: users,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The last saved document, or the seed document before the first save.
    pub fn state(&self) -> Result<AppState> {
        Ok(self
            .store
            .load()?
            .unwrap_or_else(|| AppState::seeded(self.seed_users.clone())))
    }

    /// Load, apply, save.
    pub fn execute(&self, command: Command) -> Result<AppState> {
        let state = self.state()?;
        let next = command::apply(&state, command)?;
        self.store.save(&next)?;
        Ok(next)
    }

    #[instrument(skip(self))]
    pub fn start_match(&self, setup: MatchSetup) -> Result<AppState> {
        self.execute(Command::StartMatch(Box::new(setup)))
    }

    #[instrument(skip(self))]
    pub fn select_batsman(&self, batsman: Participant) -> Result<AppState> {
        self.execute(Command::SelectBatsman(batsman))
    }

    #[instrument(skip(self))]
    pub fn select_bowler(&self, bowler: Participant) -> Result<AppState> {
        self.execute(Command::SelectBowler(bowler))
    }

    #[instrument(skip(self))]
    pub fn record_ball(&self, delivery: Delivery) -> Result<AppState> {
        self.execute(Command::RecordBall(delivery))
    }

    #[instrument(skip(self))]
    pub fn undo_last_ball(&self) -> Result<AppState> {
        self.execute(Command::UndoLastBall)
    }

    #[instrument(skip(self))]
    pub fn confirm_second_innings(&self) -> Result<AppState> {
        self.execute(Command::ConfirmSecondInnings)
    }

    #[instrument(skip(self))]
    pub fn end_inning_manually(&self) -> Result<AppState> {
        self.execute(Command::EndInningManually)
    }

    #[instrument(skip(self))]
    pub fn declare_draw(&self) -> Result<AppState> {
        self.execute(Command::DeclareDraw)
    }

    #[instrument(skip(self))]
    pub fn start_super_over(&self) -> Result<AppState> {
        self.execute(Command::StartSuperOver)
    }

    /// Fold the finished live match into statistics and move it to history.
    #[instrument(skip(self))]
    pub fn finalize_match(&self) -> Result<AppState> {
        self.execute(Command::FinalizeMatch)
    }

    #[instrument(skip(self))]
    pub fn discard_live_match(&self) -> Result<AppState> {
        self.execute(Command::DiscardLiveMatch)
    }
}
