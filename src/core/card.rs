//! Card handles and card multisets
//!
//! A `Card` is a copyable handle into the global catalog. Everything a
//! card knows about itself (types, cost, what it taps for) lives in the
//! catalog entry; the handle just makes equality, hashing and copies
//! cheap, which matters when millions of game states get cloned.

use crate::core::catalog::{self, CardData, EntersTapped};
use crate::core::mana::{Color, Mana};
use crate::Result;
use std::cmp::Ordering;
use std::fmt;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    Basic,
    Land,
    Creature,
    Artifact,
    Enchantment,
    Instant,
    Sorcery,
}

/// Well-known card names the engine itself cares about.
pub mod names {
    pub const AMULET_OF_VIGOR: &str = "Amulet of Vigor";
    pub const AZUSA: &str = "Azusa, Lost but Seeking";
    pub const FOREST: &str = "Forest";
    pub const GEMSTONE_CAVERNS: &str = "Gemstone Caverns";
    pub const PRIMEVAL_TITAN: &str = "Primeval Titan";
    pub const SAKURA_TRIBE_SCOUT: &str = "Sakura-Tribe Scout";
}

/// Interned handle to a catalog entry. Compares and hashes by card
/// identity; orders by card name so sorted sequences are canonical.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card(pub(crate) u16);

impl Card {
    /// Look up a card by its full name. Unknown names are fatal.
    pub fn named(name: &str) -> Result<Card> {
        catalog::global().lookup(name)
    }

    fn data(self) -> &'static CardData {
        catalog::global().entry(self)
    }

    pub fn name(self) -> &'static str {
        &self.data().name
    }

    /// Compact form for transcripts: "SakuraTribeScout".
    pub fn show(self) -> &'static str {
        &self.data().show
    }

    /// Handler-dispatch key: "sakura_tribe_scout".
    pub fn slug(self) -> &'static str {
        &self.data().slug
    }

    pub fn cost(self) -> Option<Mana> {
        self.data().cost
    }

    /// Converted mana cost; uncastable cards count as zero.
    pub fn cmc(self) -> u8 {
        self.data().cost.map_or(0, |cost| cost.total)
    }

    pub fn taps_for(self) -> Option<&'static [Mana]> {
        self.data().taps_for.as_deref()
    }

    pub fn enters_tapped(self) -> EntersTapped {
        self.data().enters_tapped
    }

    pub fn cycle_cost(self) -> Option<Mana> {
        self.data().cycle_cost
    }

    pub fn cycle_verb(self) -> &'static str {
        self.data().cycle_verb.as_deref().unwrap_or("Cycle")
    }

    pub fn sacrifice_cost(self) -> Option<Mana> {
        self.data().sacrifice_cost
    }

    pub fn has_type(self, card_type: CardType) -> bool {
        self.data().types.contains(&card_type)
    }

    pub fn is_land(self) -> bool {
        self.has_type(CardType::Land)
    }

    pub fn is_basic_land(self) -> bool {
        self.has_type(CardType::Basic) && self.has_type(CardType::Land)
    }

    pub fn is_creature(self) -> bool {
        self.has_type(CardType::Creature)
    }

    pub fn is_artifact(self) -> bool {
        self.has_type(CardType::Artifact)
    }

    pub fn is_permanent(self) -> bool {
        self.has_type(CardType::Artifact)
            || self.has_type(CardType::Creature)
            || self.has_type(CardType::Enchantment)
            || self.has_type(CardType::Land)
    }

    pub fn is_colorless(self) -> bool {
        self.data().colors.is_empty()
    }

    pub fn is_green(self) -> bool {
        self.data().colors.contains(&Color::Green)
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Card) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Card) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({:?})", self.name())
    }
}

/// An ordered multiset of cards, kept sorted by name so that two sets
/// with the same contents compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cards(Vec<Card>);

impl Cards {
    pub fn new() -> Cards {
        Cards(Vec::new())
    }

    pub fn add(&mut self, card: Card) {
        let at = self.0.partition_point(|c| *c <= card);
        self.0.insert(at, card);
    }

    /// Remove one occurrence. Returns false if the card is absent.
    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(at) = self.0.iter().position(|c| *c == card) {
            self.0.remove(at);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0.contains(&card)
    }

    pub fn contains_named(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.name() == name)
    }

    pub fn count(&self, card: Card) -> usize {
        self.0.iter().filter(|c| **c == card).count()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.0.iter().filter(|c| c.name() == name).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.0.iter().copied()
    }

    /// Each card once, in name order.
    pub fn distinct(&self) -> Vec<Card> {
        let mut cards = self.0.clone();
        cards.dedup();
        cards
    }

    fn filter(&self, keep: impl Fn(Card) -> bool) -> Vec<Card> {
        let mut cards: Vec<Card> = self.0.iter().copied().filter(|c| keep(*c)).collect();
        cards.dedup();
        cards
    }

    pub fn lands(&self) -> Vec<Card> {
        self.filter(Card::is_land)
    }

    pub fn basic_lands(&self) -> Vec<Card> {
        self.filter(Card::is_basic_land)
    }

    pub fn creatures(&self) -> Vec<Card> {
        self.filter(Card::is_creature)
    }

    pub fn creatures_lands(&self) -> Vec<Card> {
        self.filter(|c| c.is_creature() || c.is_land())
    }

    pub fn green_creatures(&self) -> Vec<Card> {
        self.filter(|c| c.is_green() && c.is_creature())
    }

    pub fn permanents(&self) -> Vec<Card> {
        self.filter(Card::is_permanent)
    }

    pub fn colorless(&self) -> Vec<Card> {
        self.filter(Card::is_colorless)
    }

    /// Cheap artifacts a trinket tutor can fetch.
    pub fn trinkets(&self) -> Vec<Card> {
        self.filter(|c| c.is_artifact() && c.cmc() < 2)
    }

    /// Zero-cost cards; uncastable cards (lands) count as zero.
    pub fn zeros(&self) -> Vec<Card> {
        self.filter(|c| c.cmc() == 0)
    }
}

impl FromIterator<Card> for Cards {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Cards {
        let mut cards: Vec<Card> = iter.into_iter().collect();
        cards.sort();
        Cards(cards)
    }
}

impl fmt::Display for Cards {
    /// Grouped display: "AmuletofVigor 2*Forest PrimevalTitan".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in self.distinct() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            let n = self.count(card);
            if n > 1 {
                write!(f, "{n}*{card}")?;
            } else {
                write!(f, "{card}")?;
            }
        }
        Ok(())
    }
}

/// Hand-curated dominance table for tutor and reveal choices: when the
/// first card is among the options, the listed cards are strictly worse
/// and need not be considered. Kneecaps the exponential fan-out on
/// reveal effects. Must be re-reviewed whenever the deck list changes;
/// a relationship that fails in some board state will cost wins.
const DOMINANCE: &[(&str, &[&str])] = &[
    ("Gemstone Mine", &["Forest", "Island", "Radiant Fountain"]),
    ("Forest", &["Island", "Radiant Fountain"]),
    ("Island", &["Radiant Fountain"]),
    ("Khalni Garden", &["Bojuka Bog"]),
    ("Simic Growth Chamber", &["Selesnya Sanctuary", "Boros Garrison"]),
    ("Selesnya Sanctuary", &["Boros Garrison"]),
];

/// Drop strictly dominated cards from a set of candidates.
///
/// Only for spots where the engine is choosing which card to take.
/// Never applied to the hand or battlefield: bouncing a utility land
/// can beat bouncing a basic, so those choices stay complete.
pub fn best_options(mut cards: Vec<Card>) -> Vec<Card> {
    for (winner, losers) in DOMINANCE {
        if cards.iter().any(|c| c.name() == *winner) {
            cards.retain(|c| !losers.contains(&c.name()));
        }
    }
    cards
}
