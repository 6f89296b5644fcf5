//! The static card catalog
//!
//! Loaded once before any simulation starts and shared read-only from
//! then on. Simulations running in parallel all point at the same
//! catalog; nothing in it ever changes.

use crate::core::card::{Card, CardType};
use crate::core::mana::{Color, Mana};
use crate::{GoldfishError, Result};
use deunicode::deunicode;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::OnceLock;

/// Whether a land arrives tapped. `Check` defers to a per-card
/// predicate over the game state (e.g. a castle that arrives untapped
/// when a Forest is already down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntersTapped {
    #[default]
    No,
    Yes,
    Check,
}

/// One catalog entry. Built by the catalog file parser.
#[derive(Debug, Clone)]
pub struct CardData {
    pub name: String,
    /// Transcript form: name with punctuation and spaces stripped.
    pub show: String,
    /// Dispatch key: ASCII lowercase, separators collapsed to '_'.
    pub slug: String,
    pub types: SmallVec<[CardType; 2]>,
    pub colors: SmallVec<[Color; 1]>,
    pub cost: Option<Mana>,
    pub taps_for: Option<SmallVec<[Mana; 2]>>,
    pub enters_tapped: EntersTapped,
    pub cycle_cost: Option<Mana>,
    pub cycle_verb: Option<String>,
    pub sacrifice_cost: Option<Mana>,
}

impl CardData {
    pub fn new(name: impl Into<String>) -> CardData {
        let name = name.into();
        CardData {
            show: show_of(&name),
            slug: slug_of(&name),
            name,
            types: SmallVec::new(),
            colors: SmallVec::new(),
            cost: None,
            taps_for: None,
            enters_tapped: EntersTapped::No,
            cycle_cost: None,
            cycle_verb: None,
            sacrifice_cost: None,
        }
    }
}

/// "Azusa, Lost but Seeking" -> "AzusaLostbutSeeking"
fn show_of(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '\'' | ',' | '.'))
        .collect()
}

/// "Azusa, Lost but Seeking" -> "azusa_lost_but_seeking"
fn slug_of(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(|c| !matches!(c, '\'' | ',' | '.'))
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Read-only card table keyed by full card name.
pub struct Catalog {
    cards: Vec<CardData>,
    by_name: FxHashMap<String, u16>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CardData>) -> Catalog {
        let mut by_name = FxHashMap::default();
        for (index, entry) in entries.iter().enumerate() {
            by_name.insert(entry.name.clone(), index as u16);
        }
        Catalog {
            cards: entries,
            by_name,
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Card> {
        self.by_name
            .get(name)
            .map(|index| Card(*index))
            .ok_or_else(|| GoldfishError::UnknownCard(name.to_string()))
    }

    pub fn entry(&self, card: Card) -> &CardData {
        &self.cards[card.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// The process-wide catalog. Falls back to the embedded card table the
/// first time it is touched, so `install` must come first if a custom
/// catalog file is in play.
pub fn global() -> &'static Catalog {
    CATALOG.get_or_init(|| {
        crate::loader::catalog_file::parse(default_data())
            .expect("embedded card catalog must parse")
    })
}

/// Install a catalog loaded from elsewhere. Errors if the global
/// catalog was already initialized.
pub fn install(catalog: Catalog) -> Result<()> {
    CATALOG.set(catalog).map_err(|_| {
        GoldfishError::InvalidCardFormat("card catalog already initialized".to_string())
    })
}

/// The card table compiled into the binary.
pub fn default_data() -> &'static str {
    include_str!("../../data/cards.txt")
}
