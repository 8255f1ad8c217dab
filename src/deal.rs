use std::iter;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, Suit};
use crate::seed::Seed;

pub const DECK_SIZE: usize = 40;

/// The 40 cards in construction order: for each suit its nine ranks then four dragons,
/// and the flower last.
pub fn create_deck() -> Vec<Card> {
    let mut deck: Vec<Card> = Suit::ALL.iter()
        .flat_map(|&suit| {
            (1..10).map(move |rank| Card::NumberCard{suit, rank})
                .chain(iter::repeat(Card::DragonCard{suit}).take(4))
        })
        .collect();
    deck.push(Card::FlowerCard);
    deck
}

pub fn shuffled_deck(seed: Seed) -> Vec<Card> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
    let mut deck = create_deck();
    deck.shuffle(&mut rng);
    deck
}

/// Splits `items` over `n` piles. Every pile gets `len / n` consecutive items, then the
/// first `len % n` piles each get one more, taken from the back.
pub fn distribute<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
    if n == 0 {
        return Vec::new();
    }
    let base = items.len() / n;
    let mut piles: Vec<Vec<T>> = (0..n)
        .map(|i| items[i * base..(i + 1) * base].to_vec())
        .collect();
    for (i, item) in items.iter().rev().take(items.len() % n).enumerate() {
        piles[i].push(item.clone());
    }
    piles
}
