use durak_rs::agents::{OpponentProfile, PlayerAgent, PolicyAgent, RandomAgent};
use durak_rs::deck::{Deck, DECK_SIZE};
use durak_rs::game::{Game, GameConfig, Opening, Seat, Stage};
use durak_rs::policy::UniformPolicy;
use proptest::prelude::*;

const STEP_CAP: usize = 2_000;

fn opening() -> impl Strategy<Value = Opening> {
    prop_oneof![Just(Opening::Human), Just(Opening::Automated), Just(Opening::LowestTrump)]
}

/// Play a whole game with two agents, auditing after every transition.
fn self_play(
    seed: u64,
    opening: Opening,
    human: &mut dyn PlayerAgent,
    automated: &mut dyn PlayerAgent,
) -> Result<Game, TestCaseError> {
    let mut game = Game::from_deck(GameConfig::default().with_opening(opening), Deck::seeded(seed));
    game.audit().map_err(|e| TestCaseError::fail(e.to_string()))?;
    for _ in 0..STEP_CAP {
        match game.stage() {
            Stage::Over(_) => return Ok(game),
            Stage::Resolving(_) => {
                game.draw_up().map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            Stage::Playing => {
                let seat = game.to_act();
                let agent: &mut dyn PlayerAgent =
                    if seat == Seat::Human { &mut *human } else { &mut *automated };
                let decision = agent.decide(&game.view(seat));
                let before = game.clone();
                if let Err(e) = game.apply(seat, decision.action) {
                    prop_assert_eq!(game.history_len(), before.history_len(), "rejected move mutated");
                    return Err(TestCaseError::fail(format!(
                        "{seat} chose illegal {:?}: {e}",
                        decision.action
                    )));
                }
            }
        }
        game.audit().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let table = game.table();
        prop_assert!(table.len() % 2 == 0 || table.pending_attack().is_some());
    }
    Err(TestCaseError::fail("game did not finish"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_games_conserve_cards_and_finish(seed in any::<u64>(), opening in opening()) {
        let mut human = RandomAgent::new(Some(seed));
        let mut automated = RandomAgent::new(Some(seed.rotate_left(17)));
        let game = self_play(seed, opening, &mut human, &mut automated)?;
        prop_assert!(game.is_over());
        prop_assert_eq!(game.deck_remaining(), 0);
        let held = game.hand(Seat::Human).len() + game.hand(Seat::Automated).len();
        prop_assert_eq!(held + game.table().len() + game.discard_len(), DECK_SIZE);
    }

    #[test]
    fn policy_opponent_only_plays_legal_moves(seed in any::<u64>()) {
        let mut human = RandomAgent::new(Some(seed));
        let mut automated = PolicyAgent::new(
            OpponentProfile::default().with_seed(seed),
            Some(Box::new(UniformPolicy)),
        );
        let game = self_play(seed, Opening::Human, &mut human, &mut automated)?;
        prop_assert!(game.outcome().is_some());
    }

    #[test]
    fn fallback_only_opponent_still_finishes(seed in any::<u64>()) {
        let mut human = RandomAgent::new(Some(seed));
        let mut automated = PolicyAgent::new(OpponentProfile::default().with_seed(seed), None);
        let game = self_play(seed, Opening::LowestTrump, &mut human, &mut automated)?;
        prop_assert!(game.is_over());
    }
}
