use crate::agents::Action;
use crate::cards::{Card, Suit};
use crate::deck::Deck;
use crate::hand::{Hand, Table};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

/// Cards each side is topped up to after a round.
pub const HAND_SIZE: usize = 6;

/// The two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    Human,
    Automated,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::Human, Seat::Automated];

    pub const fn other(self) -> Seat {
        match self {
            Seat::Human => Seat::Automated,
            Seat::Automated => Seat::Human,
        }
    }

    pub const fn is_human(self) -> bool {
        matches!(self, Seat::Human)
    }

    const fn index(self) -> usize {
        match self {
            Seat::Human => 0,
            Seat::Automated => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Human => write!(f, "human"),
            Seat::Automated => write!(f, "automated"),
        }
    }
}

/// What the side to act is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Attacking,
    Defending,
}

/// Who attacks first after the deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Opening {
    #[default]
    Human,
    Automated,
    /// Holder of the lowest trump; the human when nobody holds one.
    LowestTrump,
}

/// How a round ended before the draw-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    Discard,
    Take,
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Seat),
    Draw,
}

impl Outcome {
    /// The side left holding cards.
    pub fn fool(self) -> Option<Seat> {
        match self {
            Outcome::Winner(s) => Some(s.other()),
            Outcome::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Playing,
    /// Table settled; waiting for the draw-up.
    Resolving(RoundEnd),
    Over(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveVerb {
    Attack,
    Defend,
    Pass,
    Take,
    Draw,
}

impl MoveVerb {
    pub fn label(self) -> &'static str {
        match self {
            MoveVerb::Attack => "Attack",
            MoveVerb::Defend => "Defend",
            MoveVerb::Pass => "Pass",
            MoveVerb::Take => "Take",
            MoveVerb::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct MoveRecord {
    pub seat: Seat,
    pub verb: MoveVerb,
    pub card: Option<Card>,
}

/// Reasons a move is rejected. A rejected move never changes the game.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("game is over")]
    GameOver,
    #[error("round is resolving; draw-up pending")]
    RoundResolving,
    #[error("no draw-up pending")]
    NotResolving,
    #[error("not your turn: {expected} to act, got {got}")]
    OutOfTurn { expected: Seat, got: Seat },
    #[error("action not allowed while {phase:?}")]
    WrongPhase { phase: Phase },
    #[error("card not in hand: {0}")]
    CardNotInHand(Card),
    #[error("rank of {0} is not on the table")]
    RankNotOnTable(Card),
    #[error("attack limit reached: {limit}")]
    AttackLimit { limit: usize },
    #[error("{defense} cannot beat {attack}")]
    CannotBeat { attack: Card, defense: Card },
    #[error("no attack to beat")]
    NothingToBeat,
    #[error("nothing on the table to pass")]
    NothingToPass,
}

/// Broken engine invariants. Reported and resolved, never fatal.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("card count changed: expected {expected}, found {found}")]
    CardCount { expected: usize, found: usize },
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
    #[error("both hands emptied at the same time")]
    SimultaneousEmptyHands,
    #[error("more than one undefended attack on the table")]
    UndefendedOverflow,
}

/// Engine settings.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GameConfig {
    pub hand_size: usize,
    pub opening: Opening,
}

impl GameConfig {
    pub fn with_opening(mut self, opening: Opening) -> Self {
        self.opening = opening;
        self
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { hand_size: HAND_SIZE, opening: Opening::Human }
    }
}

/// Read-only snapshot handed to agents. Legal candidates are derived fresh
/// every time a view is taken.
#[derive(Debug, Clone)]
pub struct GameView<'a> {
    pub seat: Seat,
    pub own_hand: &'a [Card],
    pub opponent_hand: &'a [Card],
    pub table: &'a Table,
    pub deck_remaining: usize,
    pub trump: Suit,
    pub attacker: Seat,
    pub to_act: Seat,
    pub legal_attacks: Vec<Card>,
    pub legal_defenses: Vec<Card>,
}

impl GameView<'_> {
    pub fn is_my_turn(&self) -> bool {
        self.to_act == self.seat
    }

    /// The role of the viewing side in the current exchange.
    pub fn role(&self) -> Phase {
        if self.attacker == self.seat {
            Phase::Attacking
        } else {
            Phase::Defending
        }
    }

    /// Legal cards for the viewing side's role.
    pub fn candidates(&self) -> &[Card] {
        match self.role() {
            Phase::Attacking => &self.legal_attacks,
            Phase::Defending => &self.legal_defenses,
        }
    }
}

/// The turn engine: owns the deck, both hands, the table and the round state.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) deck: Deck,
    pub(crate) hands: [Hand; 2],
    pub(crate) table: Table,
    pub(crate) discard: Vec<Card>,
    pub(crate) attacker: Seat,
    pub(crate) to_act: Seat,
    pub(crate) stage: Stage,
    total_cards: usize,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Shuffle a fresh deck with `rng` and deal with default settings.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_config(GameConfig::default(), rng)
    }

    pub fn with_config<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        Self::from_deck(config, Deck::new(rng))
    }

    /// Deal from a prepared deck.
    pub fn from_deck(config: GameConfig, deck: Deck) -> Self {
        let total_cards = deck.remaining();
        let mut game = Self {
            config,
            deck,
            hands: [Hand::default(), Hand::default()],
            table: Table::new(),
            discard: Vec::new(),
            attacker: Seat::Human,
            to_act: Seat::Human,
            stage: Stage::Playing,
            total_cards,
            history: Vec::new(),
        };
        game.deal();
        game.attacker = game.opening_attacker();
        game.to_act = game.attacker;
        log::info!(
            "game start: trump={}, deck={}, attacker={}",
            game.trump().name(),
            game.deck.remaining(),
            game.attacker
        );
        game
    }

    /// Scripted position: given hands, an empty table and `attacker` to act.
    pub fn from_parts(deck: Deck, human: Hand, automated: Hand, attacker: Seat) -> Self {
        let total_cards = deck.remaining() + human.len() + automated.len();
        Self {
            config: GameConfig::default(),
            deck,
            hands: [human, automated],
            table: Table::new(),
            discard: Vec::new(),
            attacker,
            to_act: attacker,
            stage: Stage::Playing,
            total_cards,
            history: Vec::new(),
        }
    }

    fn deal(&mut self) {
        for i in 0..self.config.hand_size {
            for seat in Seat::BOTH {
                match self.deck.draw() {
                    Some(card) => self.hands[seat.index()].push(card),
                    None => {
                        log::warn!(
                            "deck ran out while dealing at index {i}; remaining {}",
                            self.deck.remaining()
                        );
                        return;
                    }
                }
            }
        }
    }

    fn opening_attacker(&self) -> Seat {
        match self.config.opening {
            Opening::Human => Seat::Human,
            Opening::Automated => Seat::Automated,
            Opening::LowestTrump => {
                let trump = self.trump();
                let human = self.hand(Seat::Human).lowest_trump(trump);
                let automated = self.hand(Seat::Automated).lowest_trump(trump);
                match (human, automated) {
                    (Some(h), Some(a)) if a.rank() < h.rank() => Seat::Automated,
                    (None, Some(_)) => Seat::Automated,
                    _ => Seat::Human,
                }
            }
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn trump(&self) -> Suit {
        self.deck.trump_suit()
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn attacker(&self) -> Seat {
        self.attacker
    }

    pub fn defender(&self) -> Seat {
        self.attacker.other()
    }

    pub fn to_act(&self) -> Seat {
        self.to_act
    }

    pub fn attacker_is_human(&self) -> bool {
        self.attacker.is_human()
    }

    pub fn active_turn_is_human(&self) -> bool {
        self.to_act.is_human()
    }

    /// Attacking when the side to act is the attacker, Defending otherwise.
    pub fn phase(&self) -> Phase {
        if self.to_act == self.attacker {
            Phase::Attacking
        } else {
            Phase::Defending
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.stage {
            Stage::Over(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.stage, Stage::Over(_))
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.stage, Stage::Resolving(_))
    }

    pub fn history_recent(&self, n: usize) -> Vec<MoveRecord> {
        let start = self.history.len().saturating_sub(n);
        self.history[start..].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most attacks allowed this round: the defender's hand size at the start
    /// of the exchange.
    pub fn attack_limit(&self) -> usize {
        self.hand(self.defender()).len() + self.table.defenses().count()
    }

    /// Cards `seat` may attack with right now; empty when it may not attack.
    pub fn legal_attacks(&self, seat: Seat) -> Vec<Card> {
        if self.ensure_turn(seat, Phase::Attacking).is_err()
            || self.table.attack_count() >= self.attack_limit()
        {
            return Vec::new();
        }
        self.hand(seat)
            .as_slice()
            .iter()
            .copied()
            .filter(|c| self.table.is_empty() || self.table.has_rank(c.rank()))
            .collect()
    }

    /// Cards `seat` may beat the pending attack with; empty when it may not defend.
    pub fn legal_defenses(&self, seat: Seat) -> Vec<Card> {
        if self.ensure_turn(seat, Phase::Defending).is_err() {
            return Vec::new();
        }
        let Some(attack) = self.table.pending_attack() else {
            return Vec::new();
        };
        let trump = self.trump();
        self.hand(seat).as_slice().iter().copied().filter(|c| c.beats(attack, trump)).collect()
    }

    pub fn view(&self, seat: Seat) -> GameView<'_> {
        GameView {
            seat,
            own_hand: self.hand(seat).as_slice(),
            opponent_hand: self.hand(seat.other()).as_slice(),
            table: &self.table,
            deck_remaining: self.deck.remaining(),
            trump: self.trump(),
            attacker: self.attacker,
            to_act: self.to_act,
            legal_attacks: self.legal_attacks(seat),
            legal_defenses: self.legal_defenses(seat),
        }
    }

    fn ensure_turn(&self, seat: Seat, phase: Phase) -> Result<(), ActionError> {
        match self.stage {
            Stage::Over(_) => return Err(ActionError::GameOver),
            Stage::Resolving(_) => return Err(ActionError::RoundResolving),
            Stage::Playing => {}
        }
        if seat != self.to_act {
            return Err(ActionError::OutOfTurn { expected: self.to_act, got: seat });
        }
        let current = self.phase();
        if current != phase {
            return Err(ActionError::WrongPhase { phase: current });
        }
        Ok(())
    }

    /// Dispatch an action for `seat`.
    pub fn apply(&mut self, seat: Seat, action: Action) -> Result<(), ActionError> {
        match action {
            Action::Attack(card) => self.attack(seat, card),
            Action::Defend(card) => self.defend(seat, card),
            Action::Pass => self.pass(seat),
            Action::Take => self.take(seat),
        }
    }

    pub fn attack(&mut self, seat: Seat, card: Card) -> Result<(), ActionError> {
        self.ensure_turn(seat, Phase::Attacking)?;
        if !self.hand(seat).contains(card) {
            return Err(ActionError::CardNotInHand(card));
        }
        if !self.table.is_empty() && !self.table.has_rank(card.rank()) {
            return Err(ActionError::RankNotOnTable(card));
        }
        let limit = self.attack_limit();
        if self.table.attack_count() >= limit {
            return Err(ActionError::AttackLimit { limit });
        }
        let removed = self.hands[seat.index()].remove(card);
        debug_assert!(removed, "{card} checked as held but missing");
        self.table.push(card);
        self.to_act = seat.other();
        self.record(seat, MoveVerb::Attack, Some(card));
        log::debug!("{seat} attacked with {}", card.describe(self.trump()));
        Ok(())
    }

    pub fn defend(&mut self, seat: Seat, card: Card) -> Result<(), ActionError> {
        self.ensure_turn(seat, Phase::Defending)?;
        let attack = self.table.pending_attack().ok_or(ActionError::NothingToBeat)?;
        if !self.hand(seat).contains(card) {
            return Err(ActionError::CardNotInHand(card));
        }
        if !card.beats(attack, self.trump()) {
            return Err(ActionError::CannotBeat { attack, defense: card });
        }
        let removed = self.hands[seat.index()].remove(card);
        debug_assert!(removed, "{card} checked as held but missing");
        self.table.push(card);
        self.to_act = seat.other();
        self.record(seat, MoveVerb::Defend, Some(card));
        log::debug!("{seat} defended with {}", card.describe(self.trump()));
        Ok(())
    }

    /// Attacker ends the exchange: table discarded, roles swap.
    pub fn pass(&mut self, seat: Seat) -> Result<(), ActionError> {
        self.ensure_turn(seat, Phase::Attacking)?;
        if self.table.is_empty() {
            return Err(ActionError::NothingToPass);
        }
        let cards = self.table.take_all();
        self.discard.extend(cards);
        self.attacker = self.attacker.other();
        self.to_act = self.attacker;
        self.stage = Stage::Resolving(RoundEnd::Discard);
        self.record(seat, MoveVerb::Pass, None);
        log::info!("{seat} passed; {} now attacks", self.attacker);
        Ok(())
    }

    /// Defender picks up the whole table; the attacker keeps attacking.
    pub fn take(&mut self, seat: Seat) -> Result<(), ActionError> {
        self.ensure_turn(seat, Phase::Defending)?;
        let cards = self.table.take_all();
        let n = cards.len();
        self.hands[seat.index()].extend(cards);
        self.to_act = self.attacker;
        self.stage = Stage::Resolving(RoundEnd::Take);
        self.record(seat, MoveVerb::Take, None);
        log::info!("{seat} took {n} cards");
        Ok(())
    }

    /// Top both hands up (attacker first) and check for a winner.
    ///
    /// An empty deck simply draws fewer cards.
    pub fn draw_up(&mut self) -> Result<Option<Outcome>, ActionError> {
        match self.stage {
            Stage::Resolving(_) => {}
            Stage::Over(_) => return Err(ActionError::GameOver),
            Stage::Playing => return Err(ActionError::NotResolving),
        }
        for seat in [self.attacker, self.defender()] {
            while self.hand(seat).len() < self.config.hand_size {
                let Some(card) = self.deck.draw() else {
                    log::debug!("deck exhausted during draw-up for {seat}");
                    break;
                };
                self.hands[seat.index()].push(card);
                self.record(seat, MoveVerb::Draw, Some(card));
            }
        }
        let outcome = self.check_winner();
        self.stage = match outcome {
            Some(o) => Stage::Over(o),
            None => Stage::Playing,
        };
        Ok(outcome)
    }

    fn check_winner(&self) -> Option<Outcome> {
        if !self.deck.is_empty() {
            return None;
        }
        let human_out = self.hand(Seat::Human).is_empty();
        let automated_out = self.hand(Seat::Automated).is_empty();
        let outcome = match (human_out, automated_out) {
            (true, true) => {
                log::error!("{}; declaring a draw", InvariantViolation::SimultaneousEmptyHands);
                Outcome::Draw
            }
            (true, false) => Outcome::Winner(Seat::Human),
            (false, true) => Outcome::Winner(Seat::Automated),
            (false, false) => return None,
        };
        match outcome.fool() {
            Some(fool) => log::info!("game over: {fool} is the fool"),
            None => log::info!("game over: draw"),
        }
        Some(outcome)
    }

    /// Check card conservation and table shape.
    pub fn audit(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::with_capacity(self.total_cards);
        let all = self.hands[0]
            .as_slice()
            .iter()
            .chain(self.hands[1].as_slice())
            .chain(self.table.as_slice())
            .chain(self.deck.as_slice())
            .chain(&self.discard);
        for &card in all {
            if !seen.insert(card) {
                return Err(InvariantViolation::DuplicateCard(card));
            }
        }
        if seen.len() != self.total_cards {
            return Err(InvariantViolation::CardCount {
                expected: self.total_cards,
                found: seen.len(),
            });
        }
        let pending = self.table.len() % 2;
        let expect_pending =
            usize::from(self.stage == Stage::Playing && self.phase() == Phase::Defending);
        if pending != expect_pending {
            return Err(InvariantViolation::UndefendedOverflow);
        }
        Ok(())
    }

    fn record(&mut self, seat: Seat, verb: MoveVerb, card: Option<Card>) {
        self.history.push(MoveRecord { seat, verb, card });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, Rank};
    use crate::deck::DECK_SIZE;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn hand(s: &str) -> Hand {
        s.parse().unwrap()
    }

    fn scripted(deck: &str, human: &str, automated: &str, attacker: Seat) -> Game {
        let deck = Deck::with_trump(parse_cards(deck).unwrap(), Suit::Clubs);
        Game::from_parts(deck, hand(human), hand(automated), attacker)
    }

    #[test]
    fn deal_gives_six_each_and_leaves_24() {
        let g = Game::from_deck(GameConfig::default(), Deck::seeded(11));
        assert_eq!(g.hand(Seat::Human).len(), 6);
        assert_eq!(g.hand(Seat::Automated).len(), 6);
        assert_eq!(g.deck_remaining(), 24);
        assert_eq!(g.attacker(), Seat::Human);
        g.audit().unwrap();
    }

    #[test]
    fn attack_then_defend_flips_turn() {
        let mut g = scripted("6c", "7h 9d", "8h Ad", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        assert_eq!(g.to_act(), Seat::Automated);
        assert_eq!(g.phase(), Phase::Defending);
        assert_eq!(g.attacker(), Seat::Human);
        g.defend(Seat::Automated, card("8h")).unwrap();
        assert_eq!(g.to_act(), Seat::Human);
        assert_eq!(g.phase(), Phase::Attacking);
        assert_eq!(g.table().len(), 2);
    }

    #[test]
    fn follow_up_attack_must_match_table_rank() {
        let mut g = scripted("6c", "7h 9d 8s", "8h Ad 6d", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.defend(Seat::Automated, card("8h")).unwrap();
        let err = g.attack(Seat::Human, card("9d")).unwrap_err();
        assert_eq!(err, ActionError::RankNotOnTable(card("9d")));
        assert_eq!(g.legal_attacks(Seat::Human), vec![card("8s")]);
        g.attack(Seat::Human, card("8s")).unwrap();
    }

    #[test]
    fn illegal_moves_do_not_mutate() {
        let mut g = scripted("6c", "7h", "8d", Seat::Human);
        let before = g.hand(Seat::Automated).clone();
        assert!(matches!(
            g.attack(Seat::Automated, card("8d")),
            Err(ActionError::OutOfTurn { expected: Seat::Human, got: Seat::Automated })
        ));
        assert_eq!(g.take(Seat::Human), Err(ActionError::WrongPhase { phase: Phase::Attacking }));
        assert_eq!(g.pass(Seat::Human), Err(ActionError::NothingToPass));
        assert_eq!(g.attack(Seat::Human, card("Ah")), Err(ActionError::CardNotInHand(card("Ah"))));
        g.attack(Seat::Human, card("7h")).unwrap();
        assert_eq!(
            g.defend(Seat::Automated, card("8d")),
            Err(ActionError::CannotBeat { attack: card("7h"), defense: card("8d") })
        );
        assert_eq!(g.hand(Seat::Automated), &before);
        assert_eq!(g.table().len(), 1);
    }

    #[test]
    fn played_cards_move_from_hand_to_table() {
        let mut g = scripted("6c", "7h 7d", "8h 9h", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        assert_eq!(g.hand(Seat::Human).as_slice(), &[card("7d")]);
        g.defend(Seat::Automated, card("9h")).unwrap();
        assert_eq!(g.hand(Seat::Automated).as_slice(), &[card("8h")]);
        assert_eq!(g.table().as_slice(), &[card("7h"), card("9h")]);
    }

    #[test]
    fn pass_discards_and_swaps_roles() {
        let mut g = scripted("6c 6s 7s 8s 9s Ts Js Qs Ks As 6d 7d", "7h", "8h", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.defend(Seat::Automated, card("8h")).unwrap();
        g.pass(Seat::Human).unwrap();
        assert!(g.table().is_empty());
        assert_eq!(g.discard_len(), 2);
        assert_eq!(g.attacker(), Seat::Automated);
        assert_eq!(g.stage(), Stage::Resolving(RoundEnd::Discard));
        assert_eq!(g.attack(Seat::Automated, card("6c")), Err(ActionError::RoundResolving));
        assert_eq!(g.draw_up().unwrap(), None);
        // new attacker draws first, starting from the top card
        assert!(g.hand(Seat::Automated).contains(card("7d")));
        assert_eq!(g.hand(Seat::Automated).len(), 6);
        assert_eq!(g.hand(Seat::Human).len(), 6);
        assert_eq!(g.deck_remaining(), 0);
        g.audit().unwrap();
    }

    #[test]
    fn take_moves_table_to_defender_and_attacker_keeps_role() {
        let mut g = scripted("6c", "7h 7d", "8s", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.take(Seat::Automated).unwrap();
        assert!(g.table().is_empty());
        assert!(g.hand(Seat::Automated).contains(card("7h")));
        assert_eq!(g.attacker(), Seat::Human);
        assert_eq!(g.to_act(), Seat::Human);
        g.draw_up().unwrap();
        assert_eq!(g.stage(), Stage::Playing);
        g.audit().unwrap();
    }

    #[test]
    fn attack_limit_follows_defender_hand() {
        let mut g = scripted("6c", "7h 7d 7s", "8h", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.defend(Seat::Automated, card("8h")).unwrap();
        assert!(g.legal_attacks(Seat::Human).is_empty());
        assert_eq!(g.attack(Seat::Human, card("7d")), Err(ActionError::AttackLimit { limit: 1 }));
    }

    #[test]
    fn empty_hand_with_empty_deck_wins_after_discard() {
        let mut g = scripted("", "7h", "8h 9h", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.defend(Seat::Automated, card("8h")).unwrap();
        g.pass(Seat::Human).unwrap();
        assert_eq!(g.draw_up().unwrap(), Some(Outcome::Winner(Seat::Human)));
        assert!(g.is_over());
        assert_eq!(g.outcome().and_then(Outcome::fool), Some(Seat::Automated));
        assert_eq!(g.attack(Seat::Automated, card("9h")), Err(ActionError::GameOver));
    }

    #[test]
    fn both_hands_empty_is_a_draw() {
        let mut g = scripted("", "7h", "8h", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.defend(Seat::Automated, card("8h")).unwrap();
        g.pass(Seat::Human).unwrap();
        assert_eq!(g.draw_up().unwrap(), Some(Outcome::Draw));
        assert_eq!(Outcome::Draw.fool(), None);
    }

    #[test]
    fn lowest_trump_opens() {
        let deck: Vec<Card> = Rank::ALL.iter().map(|&r| Card::new(r, Suit::Spades)).collect();
        // bottom is 6s so spades are trump; top of deck is As, dealt first to human
        let g = Game::from_deck(
            GameConfig::default().with_opening(Opening::LowestTrump).with_hand_size(3),
            Deck::from_cards(deck).unwrap(),
        );
        // human: A, Q, T; automated: K, J, 9
        assert_eq!(g.attacker(), Seat::Automated);
    }

    #[test]
    fn dealt_game_conserves_all_cards() {
        let g = Game::from_deck(GameConfig::default(), Deck::seeded(5));
        assert_eq!(g.total_cards, DECK_SIZE);
        g.audit().unwrap();
    }

    #[test]
    fn history_records_moves() {
        let mut g = scripted("6c", "7h", "8h", Seat::Human);
        g.attack(Seat::Human, card("7h")).unwrap();
        g.take(Seat::Automated).unwrap();
        let recent = g.history_recent(2);
        assert_eq!(recent[0].verb, MoveVerb::Attack);
        assert_eq!(recent[1].verb.label(), "Take");
        assert_eq!(g.history_len(), 2);
    }
}
