//! Deck module - builds the shuffled set of paired cards for a grid.

use crate::rng::{shuffle, RandomSource};
use crate::types::{Card, ConfigurationError, GridSize, SYMBOLS};

/// Build a shuffled deck for `grid`.
///
/// Takes the first `grid.pairs()` symbols, deals each as two cards with ids
/// `<symbol>-<pair>-A` and `<symbol>-<pair>-B`, then shuffles.
pub fn build_deck<R: RandomSource + ?Sized>(grid: GridSize, rng: &mut R) -> Vec<Card> {
    let mut cards = ordered_deck(grid);
    shuffle(&mut cards, rng);
    cards
}

/// Build a deck from a raw side length.
///
/// Fails with [`ConfigurationError`] when the side length is unsupported or
/// the deck-building preconditions do not hold.
pub fn build_deck_for_side<R: RandomSource + ?Sized>(
    side: u8,
    rng: &mut R,
) -> Result<Vec<Card>, ConfigurationError> {
    let grid = GridSize::new(side)?;
    Ok(build_deck(grid, rng))
}

/// Unshuffled deck: pair `i` sits at indices `2i` and `2i + 1`.
pub fn ordered_deck(grid: GridSize) -> Vec<Card> {
    ordered_pairs(grid.pairs())
}

fn ordered_pairs(pairs: usize) -> Vec<Card> {
    SYMBOLS
        .iter()
        .take(pairs)
        .enumerate()
        .flat_map(|(i, symbol)| {
            ["A", "B"].into_iter().map(move |half| Card {
                id: format!("{symbol}-{i}-{half}"),
                symbol: (*symbol).to_string(),
            })
        })
        .collect()
}
