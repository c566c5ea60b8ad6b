//! Agents: pluggable deciders for a seat.
//!
//! An agent receives a read-only [`GameView`] and returns exactly one
//! [`Decision`]. It never touches the game itself; the session applies the
//! chosen action the same way it applies a human move.

use crate::cards::Card;
use crate::game::{GameView, Phase};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

mod opponent;

pub use opponent::{OpponentProfile, PolicyAgent};

/// A move for the side to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Attack(Card),
    Defend(Card),
    Pass,
    Take,
}

/// Which rung of the decision ladder produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecisionSource {
    /// Arg-max index was already inside the legal candidate list.
    Policy,
    /// Arg-max index was past the end of the candidate list and clamped.
    Clamped,
    /// Uniform pick among legal candidates.
    RandomFallback,
    /// Take or pass without consulting the policy.
    Heuristic,
    /// Nothing else applied; forced pass.
    LastResort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub source: DecisionSource,
    pub reason: &'static str,
}

impl Decision {
    pub(crate) fn new(action: Action, source: DecisionSource, reason: &'static str) -> Self {
        Self { action, source, reason }
    }

    /// Take when defending, pass when attacking.
    pub(crate) fn concede(role: Phase, source: DecisionSource, reason: &'static str) -> Self {
        let action = match role {
            Phase::Attacking => Action::Pass,
            Phase::Defending => Action::Take,
        };
        Self::new(action, source, reason)
    }
}

/// A seat controller.
pub trait PlayerAgent {
    /// Choose one action for the viewing seat.
    fn decide(&mut self, view: &GameView<'_>) -> Decision;

    /// Called once when the game ends; release anything held for the game.
    fn on_game_over(&mut self) {}
}

/// Build an RNG from an optional seed, falling back to OS entropy.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(v) => StdRng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

/// Plays a uniformly random legal card, otherwise passes or takes.
///
/// While attacking with cards already on the table it keeps attacking with
/// probability `pile_on`.
#[derive(Debug)]
pub struct RandomAgent {
    rng: StdRng,
    pile_on: f64,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed), pile_on: 0.5 }
    }

    pub fn with_pile_on(mut self, pile_on: f64) -> Self {
        self.pile_on = pile_on.clamp(0.0, 1.0);
        self
    }
}

impl PlayerAgent for RandomAgent {
    fn decide(&mut self, view: &GameView<'_>) -> Decision {
        let role = view.role();
        let candidates = view.candidates();
        if candidates.is_empty() {
            return Decision::concede(role, DecisionSource::Heuristic, "no_candidates");
        }
        if role == Phase::Attacking
            && !view.table.is_empty()
            && !self.rng.random_bool(self.pile_on)
        {
            return Decision::new(Action::Pass, DecisionSource::Heuristic, "enough");
        }
        let card = candidates[self.rng.random_range(0..candidates.len())];
        let action = match role {
            Phase::Attacking => Action::Attack(card),
            Phase::Defending => Action::Defend(card),
        };
        Decision::new(action, DecisionSource::RandomFallback, "random")
    }
}
