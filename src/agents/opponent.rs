use crate::cards::Card;
use crate::features::encode;
use crate::game::{GameView, Phase};
use crate::policy::{argmax, PolicyError, ScoringPolicy};
use rand::{rngs::StdRng, Rng};

use super::{seeded_rng, Action, Decision, DecisionSource, PlayerAgent};

/// Settings for the automated opponent.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct OpponentProfile {
    pub rng_seed: Option<u64>,
}

impl OpponentProfile {
    /// Set a deterministic RNG seed for the random fallback.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// The automated side: asks a scoring policy for an index, maps it onto the
/// legal candidates, and falls back when the policy is missing or unusable.
///
/// Fallback order:
/// 1. policy missing or failing: take when defending; when attacking, pass
///    if nothing is legal, otherwise pick a random legal card;
/// 2. policy answered without a usable index: random legal card;
/// 3. no legal candidates: take when defending, pass when attacking;
/// 4. anything else: forced pass.
#[derive(Debug)]
pub struct PolicyAgent {
    policy: Option<Box<dyn ScoringPolicy>>,
    rng: StdRng,
}

impl PolicyAgent {
    pub fn new(profile: OpponentProfile, policy: Option<Box<dyn ScoringPolicy>>) -> Self {
        match &policy {
            Some(p) => log::info!("scoring policy '{}' loaded", p.name()),
            None => log::warn!("no scoring policy; opponent uses fallbacks only"),
        }
        Self { policy, rng: seeded_rng(profile.rng_seed) }
    }

    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    /// Drop the policy; later decisions use the fallbacks.
    pub fn release_policy(&mut self) {
        if let Some(p) = self.policy.take() {
            log::info!("scoring policy '{}' released", p.name());
        }
    }

    fn score(&mut self, view: &GameView<'_>) -> Result<Vec<f32>, PolicyError> {
        let policy = self.policy.as_mut().ok_or(PolicyError::Unavailable)?;
        let features = encode(view);
        log::debug!("features: {features:.2?}");
        let scores = policy.score(&features)?;
        log::debug!("scores from '{}': {scores:.4?}", policy.name());
        Ok(scores)
    }

    fn random_pick(&mut self, role: Phase, candidates: &[Card]) -> Decision {
        let card = candidates[self.rng.random_range(0..candidates.len())];
        Decision::new(play(role, card), DecisionSource::RandomFallback, "random_legal")
    }
}

fn play(role: Phase, card: Card) -> Action {
    match role {
        Phase::Attacking => Action::Attack(card),
        Phase::Defending => Action::Defend(card),
    }
}

impl PlayerAgent for PolicyAgent {
    fn decide(&mut self, view: &GameView<'_>) -> Decision {
        let role = view.role();
        if !view.is_my_turn() || (role == Phase::Defending && view.table.pending_attack().is_none())
        {
            log::error!("opponent asked to act out of turn; forcing pass");
            return Decision::new(Action::Pass, DecisionSource::LastResort, "last_resort");
        }

        let candidates = view.candidates().to_vec();
        let scores = match self.score(view) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("decision unavailable: {e}");
                if role == Phase::Defending || candidates.is_empty() {
                    return Decision::concede(role, DecisionSource::Heuristic, "policy_failed");
                }
                return self.random_pick(role, &candidates);
            }
        };

        if candidates.is_empty() {
            log::debug!("no legal candidates while {role:?}");
            return Decision::concede(role, DecisionSource::Heuristic, "no_candidates");
        }

        let Some(index) = argmax(&scores) else {
            log::warn!("policy gave no usable index; picking at random");
            return self.random_pick(role, &candidates);
        };
        let clamped = index.min(candidates.len() - 1);
        let card = candidates[clamped];
        if !view.own_hand.contains(&card) {
            log::warn!("clamped pick {card} not held; picking at random");
            return self.random_pick(role, &candidates);
        }
        let source =
            if clamped == index { DecisionSource::Policy } else { DecisionSource::Clamped };
        log::debug!("policy index {index} -> candidate {clamped} ({card})");
        Decision::new(play(role, card), source, "policy")
    }

    fn on_game_over(&mut self) {
        self.release_policy();
    }
}
