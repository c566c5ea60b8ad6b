use crate::cards::{parse_cards, Card, Rank, Suit};
use std::str::FromStr;

/// Cards held by one side. Order is the order cards were received in.
///
/// ```
/// use durak_rs::hand::Hand;
///
/// let hand: Hand = "6h 7h Ks".parse().unwrap();
/// assert_eq!(hand.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Lowest trump held, used for the opening-attacker rule.
    pub fn lowest_trump(&self, trump: Suit) -> Option<Card> {
        self.cards.iter().copied().filter(|c| c.is_trump(trump)).min_by_key(|c| c.rank())
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn extend<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.cards.extend(cards);
    }

    /// Remove one copy of `card`; returns false when it is not held.
    pub(crate) fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(i) => {
                self.cards.remove(i);
                true
            }
            None => false,
        }
    }
}

impl FromStr for Hand {
    type Err = crate::cards::CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cards(s).map(Hand::new)
    }
}

/// Cards in play for the current exchange.
///
/// Even positions are attacks and odd positions are the defenses that beat
/// them. An odd length means the last attack is still undefended; there is
/// never more than one undefended attack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    cards: Vec<Card>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// The undefended attack card, if any.
    pub fn pending_attack(&self) -> Option<Card> {
        if self.cards.len() % 2 == 1 {
            self.cards.last().copied()
        } else {
            None
        }
    }

    pub fn attack_count(&self) -> usize {
        self.cards.len().div_ceil(2)
    }

    pub fn attacks(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().step_by(2).copied()
    }

    pub fn defenses(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().skip(1).step_by(2).copied()
    }

    /// Whether a card of `rank` is already in play (attack or defense).
    pub fn has_rank(&self, rank: Rank) -> bool {
        self.cards.iter().any(|c| c.rank() == rank)
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    #[test]
    fn hand_remove_only_removes_held_cards() {
        let mut h: Hand = "6h 7h".parse().unwrap();
        assert!(h.remove(Card::new(Rank::Six, Suit::Hearts)));
        assert!(!h.remove(Card::new(Rank::Six, Suit::Hearts)));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn lowest_trump_ignores_plain_cards() {
        let h: Hand = "6h Ks 9s".parse().unwrap();
        assert_eq!(h.lowest_trump(Suit::Spades), Some(Card::new(Rank::Nine, Suit::Spades)));
        assert_eq!(h.lowest_trump(Suit::Clubs), None);
    }

    #[test]
    fn table_tracks_pending_attack() {
        let mut t = Table::new();
        assert_eq!(t.pending_attack(), None);
        t.push(Card::new(Rank::Seven, Suit::Hearts));
        assert_eq!(t.pending_attack(), Some(Card::new(Rank::Seven, Suit::Hearts)));
        assert_eq!(t.attack_count(), 1);
        t.push(Card::new(Rank::Nine, Suit::Hearts));
        assert_eq!(t.pending_attack(), None);
        assert_eq!(t.attack_count(), 1);
        assert_eq!(t.defenses().count(), 1);
    }

    #[test]
    fn table_ranks_cover_attacks_and_defenses() {
        let mut t = Table::new();
        t.push(Card::new(Rank::Seven, Suit::Hearts));
        t.push(Card::new(Rank::Nine, Suit::Hearts));
        assert!(t.has_rank(Rank::Seven));
        assert!(t.has_rank(Rank::Nine));
        assert!(!t.has_rank(Rank::Ace));
        assert_eq!(t.take_all().len(), 2);
        assert!(t.is_empty());
    }
}
