//! A game session: the turn engine plus the automated seat, a presenter, and
//! a single pending continuation.
//!
//! Nothing here sleeps. After a transition the session schedules at most one
//! continuation (opponent reply or draw-up) due `action_delay` later; the
//! caller fires it with [`Session::tick`]. While one is pending, human moves
//! are rejected with [`Rejection::Busy`].

use crate::agents::{Action, Decision, PlayerAgent};
use crate::cards::{Card, Suit};
use crate::game::{ActionError, Game, GameConfig, Opening, Outcome, Phase, Seat};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::time::{Duration, Instant};

/// Delay the reference presentation waits before each automated step.
pub const DEFAULT_ACTION_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SessionConfig {
    pub action_delay: Duration,
    pub seed: Option<u64>,
    pub game: GameConfig,
}

impl SessionConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.action_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_opening(mut self, opening: Opening) -> Self {
        self.game = self.game.with_opening(opening);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { action_delay: DEFAULT_ACTION_DELAY, seed: None, game: GameConfig::default() }
    }
}

/// Engine state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle { phase: Phase, actor: Seat },
    AwaitingOpponentMove,
    RoundResolving,
    GameOver(Outcome),
    /// The automated seat could not be made to move; only a new game recovers.
    Stalled,
}

/// Why a human move was not applied.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rejection {
    #[error("previous action still resolving")]
    Busy,
    #[error("opponent stalled; start a new game")]
    Stalled,
    #[error(transparent)]
    Illegal(#[from] ActionError),
}

/// What a presenter gets after every transition.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub human_hand: &'a [Card],
    pub automated_hand: &'a [Card],
    pub table: &'a [Card],
    pub trump: Suit,
    pub deck_remaining: usize,
    pub attacker: Seat,
    pub to_act: Seat,
    pub state: EngineState,
}

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            EngineState::GameOver(Outcome::Winner(Seat::Human)) => write!(f, "Player Wins!"),
            EngineState::GameOver(Outcome::Winner(Seat::Automated)) => {
                write!(f, "AI Wins! You are the Fool!")
            }
            EngineState::GameOver(Outcome::Draw) => write!(f, "Draw!"),
            EngineState::Stalled => write!(f, "AI is stuck. Start a new game."),
            _ => {
                let turn = if self.to_act.is_human() { "Your Turn" } else { "AI's Turn" };
                let role = if self.attacker.is_human() { "Attack" } else { "Defend" };
                write!(
                    f,
                    "Trump: {}\nDeck: {}\n{turn}\n{role}",
                    self.trump.name(),
                    self.deck_remaining
                )
            }
        }
    }
}

/// Receives state after every transition. Rendering is never waited on.
pub trait Presenter {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// Writes the status text through `log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let table: Vec<String> = snapshot.table.iter().map(Card::to_string).collect();
        log::info!(
            "{} | table [{}] | hand {}",
            snapshot.to_string().replace('\n', " | "),
            table.join(" "),
            snapshot.human_hand.len()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    OpponentReply,
    DrawUp,
}

#[derive(Debug, Clone, Copy)]
struct Continuation {
    due: Instant,
    step: Step,
}

pub struct Session<P: Presenter = NullPresenter> {
    config: SessionConfig,
    rng: ChaCha8Rng,
    game: Game,
    opponent: Box<dyn PlayerAgent>,
    presenter: P,
    pending: Option<Continuation>,
    last_decision: Option<Decision>,
    stalled: bool,
}

impl<P: Presenter> fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("pending", &self.pending)
            .field("stalled", &self.stalled)
            .finish()
    }
}

fn session_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(v) => ChaCha8Rng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            ChaCha8Rng::from_seed(seed)
        }
    }
}

impl<P: Presenter> Session<P> {
    /// Shuffle, deal and start a game.
    pub fn new(
        config: SessionConfig,
        opponent: Box<dyn PlayerAgent>,
        presenter: P,
        now: Instant,
    ) -> Self {
        let mut rng = session_rng(config.seed);
        let game = Game::with_config(config.game.clone(), &mut rng);
        Self::start(config, rng, game, opponent, presenter, now)
    }

    /// Start from a prepared game, e.g. a scripted position.
    pub fn with_game(
        config: SessionConfig,
        game: Game,
        opponent: Box<dyn PlayerAgent>,
        presenter: P,
        now: Instant,
    ) -> Self {
        let rng = session_rng(config.seed);
        Self::start(config, rng, game, opponent, presenter, now)
    }

    fn start(
        config: SessionConfig,
        rng: ChaCha8Rng,
        game: Game,
        opponent: Box<dyn PlayerAgent>,
        presenter: P,
        now: Instant,
    ) -> Self {
        let mut session = Self {
            config,
            rng,
            game,
            opponent,
            presenter,
            pending: None,
            last_decision: None,
            stalled: false,
        };
        session.after_transition(now);
        session
    }

    /// Abandon the current game, cancel any pending continuation and deal again.
    pub fn new_game(&mut self, opponent: Box<dyn PlayerAgent>, now: Instant) {
        if let Some(c) = self.pending.take() {
            log::debug!("cancelled pending {:?}", c.step);
        }
        if !self.game.is_over() {
            self.opponent.on_game_over();
        }
        self.opponent = opponent;
        self.last_decision = None;
        self.stalled = false;
        self.game = Game::with_config(self.config.game.clone(), &mut self.rng);
        self.after_transition(now);
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn last_decision(&self) -> Option<&Decision> {
        self.last_decision.as_ref()
    }

    /// True while a continuation is pending; human moves are refused.
    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.map(|c| c.due)
    }

    pub fn state(&self) -> EngineState {
        state_of(&self.game, self.stalled)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        snapshot_of(&self.game, self.stalled)
    }

    /// Apply a human move now; the automated reply is scheduled, not run.
    pub fn submit(&mut self, action: Action, now: Instant) -> Result<(), Rejection> {
        if self.is_processing() {
            return Err(Rejection::Busy);
        }
        if self.stalled {
            return Err(Rejection::Stalled);
        }
        self.game.apply(Seat::Human, action).inspect_err(|e| {
            log::debug!("rejected human {action:?}: {e}");
        })?;
        self.after_transition(now);
        Ok(())
    }

    /// Fire the pending continuation if it is due. Returns whether a step ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(c) if now >= c.due => {
                self.pending = None;
                self.run(c.step, now);
                true
            }
            _ => false,
        }
    }

    /// Fire continuations back to back, ignoring their due times, until the
    /// human has to move or the game ends. Returns the number of steps run.
    pub fn settle(&mut self, now: Instant) -> usize {
        let mut steps = 0;
        while let Some(c) = self.pending {
            if !self.tick(c.due.max(now)) {
                break;
            }
            steps += 1;
        }
        steps
    }

    fn run(&mut self, step: Step, now: Instant) {
        match step {
            Step::DrawUp => {
                if let Err(e) = self.game.draw_up() {
                    log::error!("draw-up failed: {e}");
                    return;
                }
            }
            Step::OpponentReply => {
                if !self.reply() {
                    self.stalled = true;
                    self.render();
                    return;
                }
            }
        }
        self.after_transition(now);
    }

    /// Ask the automated seat for one action and apply it.
    fn reply(&mut self) -> bool {
        let decision = self.opponent.decide(&self.game.view(Seat::Automated));
        log::debug!(
            "opponent chose {:?} via {:?} ({})",
            decision.action,
            decision.source,
            decision.reason
        );
        let result = self.game.apply(Seat::Automated, decision.action);
        self.last_decision = Some(decision);
        let Err(e) = result else {
            return true;
        };
        let Some(forced) = self.forced_action() else {
            log::error!("opponent move rejected ({e}) and no legal move remains; opponent stalled");
            return false;
        };
        log::error!("opponent move rejected ({e}); forcing {forced:?}");
        match self.game.apply(Seat::Automated, forced) {
            Ok(()) => true,
            Err(e) => {
                log::error!("forced {forced:?} rejected too ({e}); opponent stalled");
                false
            }
        }
    }

    /// Concede the exchange, or open it with any legal card when there is
    /// nothing on the table to pass.
    fn forced_action(&self) -> Option<Action> {
        match self.game.phase() {
            Phase::Defending => Some(Action::Take),
            Phase::Attacking if self.game.table().is_empty() => {
                self.game.legal_attacks(Seat::Automated).first().copied().map(Action::Attack)
            }
            Phase::Attacking => Some(Action::Pass),
        }
    }

    fn after_transition(&mut self, now: Instant) {
        self.render();
        let step = if self.game.is_over() {
            self.opponent.on_game_over();
            None
        } else if self.game.is_resolving() {
            Some(Step::DrawUp)
        } else if self.game.to_act() == Seat::Automated {
            Some(Step::OpponentReply)
        } else {
            None
        };
        self.pending = step.map(|step| Continuation { due: now + self.config.action_delay, step });
    }

    fn render(&mut self) {
        let snapshot = snapshot_of(&self.game, self.stalled);
        self.presenter.render(&snapshot);
    }
}

fn state_of(game: &Game, stalled: bool) -> EngineState {
    if let Some(outcome) = game.outcome() {
        return EngineState::GameOver(outcome);
    }
    if stalled {
        return EngineState::Stalled;
    }
    if game.is_resolving() {
        return EngineState::RoundResolving;
    }
    if game.to_act() == Seat::Automated {
        return EngineState::AwaitingOpponentMove;
    }
    EngineState::Idle { phase: game.phase(), actor: game.to_act() }
}

fn snapshot_of(game: &Game, stalled: bool) -> Snapshot<'_> {
    Snapshot {
        human_hand: game.hand(Seat::Human).as_slice(),
        automated_hand: game.hand(Seat::Automated).as_slice(),
        table: game.table().as_slice(),
        trump: game.trump(),
        deck_remaining: game.deck_remaining(),
        attacker: game.attacker(),
        to_act: game.to_act(),
        state: state_of(game, stalled),
    }
}
