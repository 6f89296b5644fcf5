//! Deck file loader (.in format)
//!
//! Plain text, one `<count> <card name>` per line. Blank lines and
//! lines starting with `#` are skipped; a trailing `#...` is a comment.

use crate::core::Card;
use crate::{GoldfishError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;

/// Deck loader for .in files
pub struct DeckLoader;

impl DeckLoader {
    /// Load and expand a deck from a file.
    pub fn load_from_file(path: &Path) -> Result<Vec<Card>> {
        let content = fs::read_to_string(path).map_err(GoldfishError::IoError)?;
        Self::parse(&content)
    }

    /// Parse deck text into the expanded card list, in file order.
    /// Card names are resolved against the catalog here, so a deck
    /// referencing an unknown card fails before any simulation runs.
    pub fn parse(content: &str) -> Result<Vec<Card>> {
        let mut cards = Vec::new();

        for (number, raw) in content.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((count_str, name)) = line.split_once(char::is_whitespace) else {
                return Err(GoldfishError::InvalidDeckFormat(format!(
                    "line {}: expected \"<count> <card name>\", got {:?}",
                    number + 1,
                    raw
                )));
            };
            let count: usize = count_str.parse().map_err(|_| {
                GoldfishError::InvalidDeckFormat(format!(
                    "line {}: bad count {:?}",
                    number + 1,
                    count_str
                ))
            })?;

            let card = Card::named(name.trim())?;
            cards.extend(std::iter::repeat(card).take(count));
        }

        if cards.is_empty() {
            return Err(GoldfishError::InvalidDeckFormat("empty deck".to_string()));
        }

        Ok(cards)
    }
}

/// A fresh random permutation of the deck list.
pub fn shuffled(cards: &[Card], rng: &mut impl Rng) -> Vec<Card> {
    let mut deck = cards.to_vec();
    deck.shuffle(rng);
    deck
}
