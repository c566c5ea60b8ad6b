//! Fixed-length numeric encoding of what one seat can see.
//!
//! Layout (79 floats):
//!
//! | offset | width | block |
//! |---|---|---|
//! | 0  | 24 | human hand: 6 slots x (rank, suit, trump, slot position) |
//! | 24 | 24 | automated hand: same shape |
//! | 48 | 18 | table: 6 slots x (rank, suit, trump) |
//! | 66 | 6  | human to act, human attacking, deck remaining, trump suit, table size, human hand size |
//! | 72 | 7  | zero |
//!
//! Seat order is fixed: the layout does not depend on which seat is viewing,
//! so a policy always sees the human in the first block and the human's
//! turn and attack flags. Unused slots stay zero. Only the first six cards of
//! a hand or table are encoded.

use crate::cards::{Card, Suit};
use crate::deck::DECK_SIZE;
use crate::game::{GameView, Seat};

pub const FEATURE_LEN: usize = 79;
pub const SLOTS: usize = 6;

pub const HUMAN_HAND_OFFSET: usize = 0;
pub const AUTOMATED_HAND_OFFSET: usize = 24;
pub const TABLE_OFFSET: usize = 48;
pub const SCALAR_OFFSET: usize = 66;

pub type Features = [f32; FEATURE_LEN];

const RANK_SCALE: f32 = 13.0;

pub fn suit_code(suit: Suit) -> f32 {
    match suit {
        Suit::Spades => 0.0,
        Suit::Clubs => 0.33,
        Suit::Diamonds => 0.67,
        Suit::Hearts => 1.0,
    }
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn encode_hand(out: &mut [f32], cards: &[Card], trump: Suit) {
    for (i, (slot, card)) in out.chunks_exact_mut(4).zip(cards).enumerate() {
        slot[0] = f32::from(card.rank().value()) / RANK_SCALE;
        slot[1] = suit_code(card.suit());
        slot[2] = flag(card.is_trump(trump));
        slot[3] = i as f32 / (SLOTS - 1) as f32;
    }
}

fn encode_table(out: &mut [f32], cards: &[Card], trump: Suit) {
    for (slot, card) in out.chunks_exact_mut(3).zip(cards) {
        slot[0] = f32::from(card.rank().value()) / RANK_SCALE;
        slot[1] = suit_code(card.suit());
        slot[2] = flag(card.is_trump(trump));
    }
}

/// Encode `view` in fixed seat order, whichever seat it was taken for.
pub fn encode(view: &GameView<'_>) -> Features {
    let (human, automated) = match view.seat {
        Seat::Human => (view.own_hand, view.opponent_hand),
        Seat::Automated => (view.opponent_hand, view.own_hand),
    };
    let mut out = [0.0; FEATURE_LEN];
    let trump = view.trump;
    encode_hand(&mut out[HUMAN_HAND_OFFSET..AUTOMATED_HAND_OFFSET], human, trump);
    encode_hand(&mut out[AUTOMATED_HAND_OFFSET..TABLE_OFFSET], automated, trump);
    encode_table(&mut out[TABLE_OFFSET..SCALAR_OFFSET], view.table.as_slice(), trump);

    let scalars = &mut out[SCALAR_OFFSET..SCALAR_OFFSET + 6];
    scalars[0] = flag(view.to_act.is_human());
    scalars[1] = flag(view.attacker.is_human());
    scalars[2] = view.deck_remaining as f32 / DECK_SIZE as f32;
    scalars[3] = suit_code(trump);
    scalars[4] = view.table.len().min(SLOTS) as f32 / SLOTS as f32;
    scalars[5] = human.len() as f32 / SLOTS as f32;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, Card, Rank};
    use crate::deck::Deck;
    use crate::game::Game;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn suit_codes_are_fixed() {
        assert_eq!(suit_code(Suit::Spades), 0.0);
        assert_eq!(suit_code(Suit::Clubs), 0.33);
        assert_eq!(suit_code(Suit::Diamonds), 0.67);
        assert_eq!(suit_code(Suit::Hearts), 1.0);
    }

    fn attacked_position() -> Game {
        let deck = Deck::with_trump(parse_cards("6c 7c").unwrap(), Suit::Clubs);
        let mut g = Game::from_parts(
            deck,
            "7h Ks".parse().unwrap(),
            "Ac 9d 8d".parse().unwrap(),
            Seat::Human,
        );
        g.attack(Seat::Human, Card::new(Rank::Seven, Suit::Hearts)).unwrap();
        g
    }

    #[test]
    fn encodes_hands_in_seat_order_table_and_scalars() {
        let g = attacked_position();
        let f = encode(&g.view(Seat::Automated));

        // human hand slot 0: Ks, the only card left
        assert!(approx(f[0], 7.0 / 13.0));
        assert_eq!(f[1], 0.0);
        assert_eq!(f[2], 0.0);
        assert_eq!(f[3], 0.0);
        assert!(f[4..24].iter().all(|&x| x == 0.0));
        // automated hand slot 0: Ac (trump)
        assert!(approx(f[24], 8.0 / 13.0));
        assert!(approx(f[25], 0.33));
        assert_eq!(f[26], 1.0);
        assert_eq!(f[27], 0.0);
        // automated slot 2 position
        assert!(approx(f[35], 0.4));
        assert!(f[36..48].iter().all(|&x| x == 0.0));
        // table: 7h
        assert!(approx(f[48], 1.0 / 13.0));
        assert_eq!(f[49], 1.0);
        assert_eq!(f[50], 0.0);
        assert!(f[51..66].iter().all(|&x| x == 0.0));
        // scalars
        assert_eq!(f[66], 0.0, "automated to act, not the human");
        assert_eq!(f[67], 1.0, "human attacking");
        assert!(approx(f[68], 2.0 / 36.0));
        assert!(approx(f[69], 0.33));
        assert!(approx(f[70], 1.0 / 6.0));
        assert!(approx(f[71], 1.0 / 6.0), "human hand size");
        assert!(f[72..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn layout_does_not_depend_on_viewing_seat() {
        let g = attacked_position();
        assert_eq!(encode(&g.view(Seat::Human)), encode(&g.view(Seat::Automated)));
    }

    #[test]
    fn only_first_six_hand_cards_are_encoded() {
        let g = Game::from_deck(Default::default(), Deck::seeded(9));
        let f = encode(&g.view(Seat::Human));
        assert_eq!(f.len(), FEATURE_LEN);
        assert!(approx(f[23], 1.0), "sixth slot position is 5/5");
    }
}
