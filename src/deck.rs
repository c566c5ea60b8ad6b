use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of cards in a Durak deck.
pub const DECK_SIZE: usize = 36;

/// A 36-card Durak deck with its trump suit.
///
/// Cards are stored bottom first. `draw` takes from the top, so the card that
/// fixed the trump suit is the last one drawn.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    trump: Suit,
}

impl Deck {
    /// Build all 36 suit x rank cards and shuffle them with `rng`.
    ///
    /// ```
    /// use durak_rs::deck::Deck;
    ///
    /// let mut rng = rand::rng();
    /// let deck = Deck::new(&mut rng);
    /// assert_eq!(deck.remaining(), 36);
    /// ```
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = Self::ordered();
        cards.shuffle(rng);
        let trump = cards[0].suit();
        Self { cards, trump }
    }

    /// Shuffle with a seeded ChaCha RNG for reproducibility.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(&mut rng)
    }

    /// Build a deck from an explicit order, bottom card first.
    ///
    /// Returns `None` for an empty list since there is no card to fix trump.
    pub fn from_cards(cards: Vec<Card>) -> Option<Self> {
        let trump = cards.first()?.suit();
        Some(Self { cards, trump })
    }

    /// Build a deck with an explicit trump suit, e.g. an already exhausted one.
    pub fn with_trump(cards: Vec<Card>, trump: Suit) -> Self {
        Self { cards, trump }
    }

    fn ordered() -> Vec<Card> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        cards
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump
    }

    /// The bottom card, shown face up, while it is still in the deck.
    pub fn trump_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw up to `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).map_while(|_| self.draw()).collect()
    }

    pub(crate) fn as_slice(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deck_has_36_unique_cards() {
        let d = Deck::seeded(1);
        assert_eq!(d.remaining(), DECK_SIZE);
        let set: HashSet<Card> = d.cards.iter().copied().collect();
        assert_eq!(set.len(), DECK_SIZE);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let d1 = Deck::seeded(42);
        let d2 = Deck::seeded(42);
        assert_eq!(d1.cards, d2.cards);
        assert_eq!(d1.trump_suit(), d2.trump_suit());
    }

    #[test]
    fn trump_card_is_drawn_last() {
        let mut d = Deck::seeded(7);
        let trump = d.trump_suit();
        let bottom = d.trump_card().unwrap();
        let mut last = None;
        while let Some(c) = d.draw() {
            last = Some(c);
        }
        assert_eq!(last, Some(bottom));
        assert_eq!(bottom.suit(), trump);
        assert_eq!(d.trump_suit(), trump, "trump survives an empty deck");
    }

    #[test]
    fn draw_on_empty_returns_none() {
        let mut d = Deck::seeded(3);
        let all = d.draw_n(40);
        assert_eq!(all.len(), DECK_SIZE);
        assert!(d.is_empty());
        assert_eq!(d.draw(), None);
    }

    #[test]
    fn from_cards_uses_bottom_card_for_trump() {
        let cards = crate::cards::parse_cards("7c Ah 9d").unwrap();
        let mut d = Deck::from_cards(cards).unwrap();
        assert_eq!(d.trump_suit(), Suit::Clubs);
        assert_eq!(d.draw().unwrap().to_string(), "9d");
        assert!(Deck::from_cards(Vec::new()).is_none());
    }
}
