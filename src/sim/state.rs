//! The immutable game state and its primitive operators
//!
//! A `GameState` is one frozen point in a solitaire game. Operators
//! never mutate the state they are called on; they return the set of
//! possible successor states, one per legal choice (which color a land
//! taps for, which land a bounce returns, which revealed card to take).
//! An operator whose precondition fails returns the empty set; illegal
//! branches simply do not exist.
//!
//! Two states are equal when every field except the transcript and the
//! shared deck list matches. The state set hashes on the same fields,
//! which collapses different play orders that reach the same position.

use crate::core::catalog::EntersTapped;
use crate::core::{names, Card, Cards, Mana};
use crate::sim::effects;
use crate::Result;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Mana owed by a pact at the next upkeep.
pub(crate) const PACT_DEBT: Mana = Mana {
    white: 0,
    blue: 0,
    black: 0,
    red: 0,
    green: 2,
    total: 4,
};

#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) battlefield: Cards,
    pub(crate) hand: Cards,
    /// The shuffled deck, shared by every descendant state and never
    /// permuted after construction.
    pub(crate) deck: Arc<[Card]>,
    /// Cards from here onward are the library, top down.
    pub(crate) deck_index: usize,
    pub(crate) pool: Mana,
    pub(crate) debt: Mana,
    pub(crate) land_drops: u32,
    pub(crate) spells_cast: u32,
    pub(crate) suspended: SmallVec<[(Card, u8); 2]>,
    pub(crate) turn: u32,
    pub(crate) on_the_play: bool,
    pub(crate) done: bool,
    pub(crate) overflowed: bool,
    /// Append-only transcript. Not part of equality or hashing.
    pub(crate) notes: String,
}

impl GameState {
    /// Start of game: draw seven from the top of the shuffled deck.
    pub fn new(deck: Arc<[Card]>, on_the_play: bool) -> GameState {
        let mut state = GameState {
            battlefield: Cards::new(),
            hand: Cards::new(),
            deck,
            deck_index: 0,
            pool: Mana::ZERO,
            debt: Mana::ZERO,
            land_drops: 0,
            spells_cast: 0,
            suspended: SmallVec::new(),
            turn: 0,
            on_the_play,
            done: false,
            overflowed: false,
            notes: String::new(),
        };
        let opening = state.deck.len().min(7);
        while state.deck_index < opening {
            let card = state.deck[state.deck_index];
            state.deck_index += 1;
            state.hand.add(card);
        }
        let drawn = state.hand.to_string();
        state.note(&format!("Draw {drawn}"));
        state
    }

    // --- read access -------------------------------------------------

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn on_the_play(&self) -> bool {
        self.on_the_play
    }

    pub fn battlefield(&self) -> &Cards {
        &self.battlefield
    }

    pub fn hand(&self) -> &Cards {
        &self.hand
    }

    pub fn mana_pool(&self) -> Mana {
        self.pool
    }

    pub fn mana_debt(&self) -> Mana {
        self.debt
    }

    pub fn land_drops(&self) -> u32 {
        self.land_drops
    }

    pub fn spells_cast(&self) -> u32 {
        self.spells_cast
    }

    pub fn deck_list(&self) -> Arc<[Card]> {
        Arc::clone(&self.deck)
    }

    pub fn transcript(&self) -> &str {
        &self.notes
    }

    /// The goal landed with an untap permanent down (or the haste
    /// shortcut planted one).
    pub fn fast(&self) -> bool {
        self.battlefield.contains_named(names::AMULET_OF_VIGOR)
    }

    /// Did this line ever play, cast or otherwise use the card?
    pub fn used(&self, card: Card) -> bool {
        let show = card.show();
        ["Cast", "Play", "Cycle", "Transmute", "Suspend", "Exile", "Sacrifice"]
            .iter()
            .any(|verb| self.notes.contains(&format!("{verb} {show}")))
    }

    pub(crate) fn mark_overflowed(&mut self) {
        self.overflowed = true;
    }

    pub(crate) fn mark_done(&mut self) {
        self.done = true;
    }

    // --- handler access ----------------------------------------------

    pub(crate) fn hand_add(&mut self, card: Card) {
        self.hand.add(card);
    }

    pub(crate) fn battlefield_add(&mut self, card: Card) {
        self.battlefield.add(card);
    }

    pub(crate) fn battlefield_remove(&mut self, card: Card) {
        self.battlefield.remove(card);
    }

    pub(crate) fn add_mana(&mut self, mana: Mana) {
        self.pool += mana;
    }

    pub(crate) fn add_debt(&mut self, mana: Mana) {
        self.debt += mana;
    }

    pub(crate) fn add_land_drops(&mut self, n: u32) {
        self.land_drops += n;
    }

    // --- transcript --------------------------------------------------

    /// Start a new transcript line.
    pub(crate) fn note(&mut self, text: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(text);
    }

    /// Append to the current transcript line.
    pub(crate) fn annotate(&mut self, text: &str) {
        self.notes.push_str(", ");
        self.notes.push_str(text);
    }

    pub(crate) fn annotate_pool(&mut self) {
        let pool = self.pool;
        self.annotate(&format!("{pool} in pool"));
    }

    // --- fan-out -----------------------------------------------------

    /// Every legal successor of this state: pass the turn, or play,
    /// cast, cycle or sacrifice any one card. The sole source of
    /// fan-out; card handlers compose only the primitives below.
    pub fn next_states(&self) -> Result<Vec<GameState>> {
        if self.done {
            return Ok(vec![self.clone()]);
        }
        let mut out = self.pass_turn()?;
        for card in self.hand.distinct() {
            out.extend(self.play(card));
            out.extend(self.cast(card)?);
            out.extend(self.cycle(card));
        }
        for card in self.battlefield.distinct() {
            out.extend(self.sacrifice(card));
        }
        Ok(out)
    }

    /// Advance to the next turn: recompute land drops, empty and refill
    /// the mana pool from the battlefield, tick the suspended queue,
    /// settle any pact debt, draw.
    fn pass_turn(&self) -> Result<Vec<GameState>> {
        // No battlefield after turn one is a lost cause, and a pact debt
        // cannot be settled off one land drop. Both branches are dead.
        if self.turn >= 1 && self.battlefield.is_empty() {
            return Ok(Vec::new());
        }
        if self.turn < 2 && !self.debt.is_empty() {
            return Ok(Vec::new());
        }

        let mut next = self.clone();
        next.note(&format!("---- turn {}", self.turn + 1));
        next.turn += 1;
        next.land_drops = 1
            + 2 * self.battlefield.count_named(names::AZUSA) as u32
            + self.battlefield.count_named(names::SAKURA_TRIBE_SCOUT) as u32;
        next.pool = Mana::ZERO;

        let mut ticked = Vec::new();
        for state in next.tap_out() {
            ticked.extend(state.tick_down()?);
        }

        let debt = self.debt;
        let settled = if debt.is_empty() {
            ticked
        } else {
            let mut settled = Vec::new();
            for mut state in ticked {
                state.annotate(&format!("pay {debt} for pact"));
                settled.extend(state.pay(debt));
            }
            settled
        };

        let mut out = Vec::new();
        for mut state in settled {
            state.debt = Mana::ZERO;
            if state.turn > 1 || !state.on_the_play {
                if !state.draw_one_noted() {
                    continue;
                }
            }
            out.push(state);
        }
        Ok(out)
    }

    /// Use a land drop. Routes through the tapped or untapped entry
    /// path and then the card's play handler.
    fn play(&self, card: Card) -> Vec<GameState> {
        if self.land_drops == 0 || !card.is_land() || !self.hand.contains(card) {
            return Vec::new();
        }
        let mut next = self.clone();
        next.note(&format!("Play {}", card.show()));
        next.land_drops -= 1;
        let tapped = match card.enters_tapped() {
            EntersTapped::Yes => true,
            EntersTapped::No => false,
            EntersTapped::Check => effects::enters_tapped_check(&next, card),
        };
        if tapped {
            next.play_tapped(card)
        } else {
            next.play_untapped(card)
        }
    }

    /// A land arriving tapped still gets tapped for mana once per untap
    /// permanent on the battlefield, each untap fanning out over the
    /// land's mana options independently.
    pub(crate) fn play_tapped(mut self, card: Card) -> Vec<GameState> {
        self.hand.remove(card);
        self.battlefield.add(card);
        let retaps = self.battlefield.count_named(names::AMULET_OF_VIGOR);
        let mut states = vec![self];
        for _ in 0..retaps {
            let mut untapped = Vec::new();
            for state in states {
                untapped.extend(state.tap(card));
            }
            for state in &mut untapped {
                state.annotate_pool();
            }
            states = untapped;
        }
        let mut out = Vec::new();
        for state in states {
            out.extend(effects::dispatch_play(state, card));
        }
        out
    }

    pub(crate) fn play_untapped(mut self, card: Card) -> Vec<GameState> {
        self.hand.remove(card);
        self.battlefield.add(card);
        let mut out = Vec::new();
        for state in self.tap(card) {
            out.extend(effects::dispatch_play(state, card));
        }
        for state in &mut out {
            state.annotate_pool();
        }
        out
    }

    /// Pay the casting cost (every way it can be paid) and hand off to
    /// the card's cast handler.
    fn cast(&self, card: Card) -> Result<Vec<GameState>> {
        let Some(cost) = self.cost_to_cast(card) else {
            return Ok(Vec::new());
        };
        if !self.hand.contains(card) || !self.can_pay(cost) {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for mut state in self.pay(cost) {
            state.note(&format!("Cast {}", card.show()));
            state.hand.remove(card);
            state.spells_cast += 1;
            out.extend(effects::dispatch_cast(state, card)?);
        }
        Ok(out)
    }

    fn cost_to_cast(&self, card: Card) -> Option<Mana> {
        match card.slug() {
            // free while it would be the game's first spell
            "once_upon_a_time" if self.spells_cast == 0 => Some(Mana::ZERO),
            _ => card.cost(),
        }
    }

    /// Discard from hand for the card's cycling cost and verb.
    fn cycle(&self, card: Card) -> Vec<GameState> {
        let Some(cost) = card.cycle_cost() else {
            return Vec::new();
        };
        if !self.hand.contains(card) || !self.can_pay(cost) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for mut state in self.pay(cost) {
            state.note(&format!("{} {}", card.cycle_verb(), card.show()));
            state.hand.remove(card);
            out.extend(effects::dispatch_cycle(state, card));
        }
        out
    }

    /// Activate a battlefield permanent by sacrificing it.
    fn sacrifice(&self, card: Card) -> Vec<GameState> {
        let Some(cost) = card.sacrifice_cost() else {
            return Vec::new();
        };
        if !self.battlefield.contains(card) || !self.can_pay(cost) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for mut state in self.pay(cost) {
            state.note(&format!("Sacrifice {}", card.show()));
            state.battlefield.remove(card);
            out.extend(effects::dispatch_sacrifice(state, card));
        }
        out
    }

    // --- mana --------------------------------------------------------

    /// One state per mana option the card can produce.
    pub(crate) fn tap(&self, card: Card) -> Vec<GameState> {
        match card.taps_for() {
            None => vec![self.clone()],
            Some(options) => options
                .iter()
                .map(|mana| {
                    let mut state = self.clone();
                    state.pool += *mana;
                    state
                })
                .collect(),
        }
    }

    /// Tap every land on the battlefield, fanning out over each land's
    /// options; the deduplicating state set collapses equivalent pools.
    fn tap_out(&self) -> Vec<GameState> {
        let lands: Vec<Card> = self.battlefield.iter().filter(|c| c.is_land()).collect();
        let mut states = vec![self.clone()];
        for land in lands {
            let mut tapped = Vec::new();
            for state in &states {
                tapped.extend(state.tap(land));
            }
            states = tapped;
        }
        for state in &mut states {
            state.annotate_pool();
        }
        states
    }

    pub(crate) fn can_pay(&self, cost: Mana) -> bool {
        cost <= self.pool
    }

    /// One state per distinct pool left after paying the cost.
    pub(crate) fn pay(&self, cost: Mana) -> Vec<GameState> {
        self.pool
            .minus(cost)
            .into_iter()
            .map(|left| {
                let mut state = self.clone();
                state.pool = left;
                state
            })
            .collect()
    }

    // --- suspend -----------------------------------------------------

    /// Count down the suspended queue; entries that reach zero are cast
    /// at once, for free, through the normal cast dispatch.
    fn tick_down(mut self) -> Result<Vec<GameState>> {
        if self.suspended.is_empty() {
            return Ok(vec![self]);
        }
        let mut due = Vec::new();
        let mut waiting: SmallVec<[(Card, u8); 2]> = SmallVec::new();
        for (card, ticks) in self.suspended.drain(..) {
            if ticks <= 1 {
                due.push(card);
            } else {
                waiting.push((card, ticks - 1));
            }
        }
        for (card, _) in &waiting {
            let show = card.show();
            self.annotate(&format!("{show} ticking down"));
        }
        self.suspended = waiting;

        let mut states = vec![self];
        for card in due {
            let mut resolved = Vec::new();
            for mut state in states {
                state.annotate(&format!("cast {} from exile", card.show()));
                resolved.extend(effects::dispatch_cast(state, card)?);
            }
            states = resolved;
        }
        Ok(states)
    }

    // --- library -----------------------------------------------------

    /// The remaining library, top down.
    pub(crate) fn library(&self) -> &[Card] {
        &self.deck[self.deck_index..]
    }

    pub(crate) fn library_has(&self, card: Card) -> bool {
        self.library().contains(&card)
    }

    /// Peek at the top `n` cards without moving the cursor.
    pub(crate) fn top(&self, n: usize) -> &[Card] {
        let end = (self.deck_index + n).min(self.deck.len());
        &self.deck[self.deck_index..end]
    }

    /// Send the top `n` cards away (reveal effects put them on the
    /// bottom, which the cursor never reaches again).
    pub(crate) fn mill(&mut self, n: usize) {
        self.deck_index = (self.deck_index + n).min(self.deck.len());
    }

    /// Draw one card, annotating the current line. False on an empty
    /// library, which kills the branch.
    pub(crate) fn draw_one_noted(&mut self) -> bool {
        if self.deck_index >= self.deck.len() {
            return false;
        }
        let card = self.deck[self.deck_index];
        self.annotate(&format!("draw {}", card.show()));
        self.deck_index += 1;
        self.hand.add(card);
        true
    }

    /// Two futures: top card stays, or goes to the bottom.
    pub(crate) fn scry1(&self) -> Vec<GameState> {
        if self.deck_index >= self.deck.len() {
            return vec![self.clone()];
        }
        let top = self.deck[self.deck_index];
        let mut keep = self.clone();
        keep.annotate(&format!("scry {} to top", top.show()));
        let mut bury = self.clone();
        bury.annotate(&format!("scry {} to bottom", top.show()));
        bury.deck_index += 1;
        vec![keep, bury]
    }

    // --- zone changes ------------------------------------------------

    /// One state per distinct land that could go back to hand.
    pub(crate) fn bounce_land(&self) -> Vec<GameState> {
        let mut out = Vec::new();
        for card in self.battlefield.lands() {
            let mut state = self.clone();
            state.annotate(&format!("bounce {}", card.show()));
            state.battlefield.remove(card);
            state.hand.add(card);
            out.push(state);
        }
        out
    }

    /// Put a copy of the named card from the library straight onto the
    /// battlefield via the normal entry paths. Callers check the card
    /// is actually in the remaining library.
    pub(crate) fn fetch(mut self, card: Card, tapped: bool) -> Vec<GameState> {
        self.hand.add(card);
        if tapped {
            self.play_tapped(card)
        } else {
            self.play_untapped(card)
        }
    }

    /// Every distinct way to discard `n` cards from hand.
    pub fn pitch(&self, n: usize) -> Vec<GameState> {
        combinations(&self.hand, n)
            .into_iter()
            .map(|combo| {
                let mut state = self.clone();
                for card in &combo {
                    state.hand.remove(*card);
                }
                let shed: Cards = combo.into_iter().collect();
                state.annotate(&format!("discard {shed}"));
                state
            })
            .collect()
    }

    // --- before turn one ---------------------------------------------

    /// Turn-zero decision point: a leyline-style land in the opening
    /// hand may start on the battlefield at the price of another card.
    pub fn pre_game_actions(&self) -> Vec<GameState> {
        let mut out = vec![self.clone()];
        if self.on_the_play {
            return out;
        }
        let Ok(caverns) = Card::named(names::GEMSTONE_CAVERNS) else {
            return out;
        };
        if !self.hand.contains(caverns) {
            return out;
        }
        for other in self.hand.distinct() {
            if other == caverns {
                continue;
            }
            let mut next = self.clone();
            next.note(&format!(
                "Set aside {}, start with {} in play",
                other.show(),
                caverns.show()
            ));
            next.hand.remove(caverns);
            next.hand.remove(other);
            next.battlefield.add(caverns);
            out.push(next);
        }
        out
    }

    pub(crate) fn suspend_push(&mut self, card: Card, ticks: u8) {
        self.suspended.push((card, ticks));
        self.suspended.sort();
    }
}

/// Every distinct multiset of `n` cards drawn from `cards`.
pub(crate) fn combinations(cards: &Cards, n: usize) -> Vec<Vec<Card>> {
    let groups: Vec<(Card, usize)> = cards
        .distinct()
        .into_iter()
        .map(|card| (card, cards.count(card)))
        .collect();
    let mut out = Vec::new();
    let mut current = Vec::new();
    pick(&groups, 0, n, &mut current, &mut out);
    out
}

fn pick(
    groups: &[(Card, usize)],
    index: usize,
    n: usize,
    current: &mut Vec<Card>,
    out: &mut Vec<Vec<Card>>,
) {
    if n == 0 {
        out.push(current.clone());
        return;
    }
    if index == groups.len() {
        return;
    }
    let (card, available) = groups[index];
    for take in 0..=available.min(n) {
        for _ in 0..take {
            current.push(card);
        }
        pick(groups, index + 1, n - take, current, out);
        for _ in 0..take {
            current.pop();
        }
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &GameState) -> bool {
        self.battlefield == other.battlefield
            && self.hand == other.hand
            && self.deck_index == other.deck_index
            && self.pool == other.pool
            && self.debt == other.debt
            && self.land_drops == other.land_drops
            && self.spells_cast == other.spells_cast
            && self.suspended == other.suspended
            && self.turn == other.turn
            && self.on_the_play == other.on_the_play
            && self.done == other.done
            && self.overflowed == other.overflowed
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.battlefield.hash(hasher);
        self.hand.hash(hasher);
        self.deck_index.hash(hasher);
        self.pool.hash(hasher);
        self.debt.hash(hasher);
        self.land_drops.hash(hasher);
        self.spells_cast.hash(hasher);
        self.suspended.hash(hasher);
        self.turn.hash(hasher);
        self.on_the_play.hash(hasher);
        self.done.hash(hasher);
        self.overflowed.hash(hasher);
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HAND: {}\nBOARD: {}", self.hand, self.battlefield)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn card(name: &str) -> Card {
        Card::named(name).unwrap()
    }

    fn deck_of(names: &[&str]) -> Arc<[Card]> {
        names.iter().map(|n| card(n)).collect()
    }

    /// A bare state for poking at individual operators.
    fn state_with(battlefield: &[&str], hand: &[&str], turn: u32) -> GameState {
        GameState {
            battlefield: battlefield.iter().map(|n| card(n)).collect(),
            hand: hand.iter().map(|n| card(n)).collect(),
            deck: deck_of(&["Forest"; 20]),
            deck_index: 0,
            pool: Mana::ZERO,
            debt: Mana::ZERO,
            land_drops: 1,
            spells_cast: 0,
            suspended: SmallVec::new(),
            turn,
            on_the_play: true,
            done: false,
            overflowed: false,
            notes: String::new(),
        }
    }

    fn hash_of(state: &GameState) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_ignores_transcript() {
        let a = state_with(&["Forest"], &["Primeval Titan"], 1);
        let mut b = a.clone();
        b.note("Play Forest");
        b.annotate("G in pool");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_ignores_deck_list_but_not_cursor() {
        let a = state_with(&["Forest"], &[], 1);
        let mut b = a.clone();
        b.deck = deck_of(&["Island"; 20]);
        assert_eq!(a, b);
        b.deck_index += 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_opening_hand() {
        let deck = deck_of(&[
            "Primeval Titan",
            "Forest",
            "Forest",
            "Forest",
            "Forest",
            "Amulet of Vigor",
            "Explore",
            "Island",
            "Island",
        ]);
        let state = GameState::new(deck, true);
        assert_eq!(state.hand.len(), 7);
        assert_eq!(state.deck_index, 7);
        assert_eq!(state.turn, 0);
        assert!(state.transcript().starts_with("Draw "));
    }

    #[test]
    fn test_fanout_monotonic_in_turn() {
        let deck = deck_of(&["Forest"; 30]);
        let state = GameState::new(deck, true);
        for next in state.next_states().unwrap() {
            assert!(next.turn >= state.turn);
            if next.turn != state.turn {
                assert_eq!(next.turn, state.turn + 1);
            }
        }
    }

    #[test]
    fn test_deck_shared_across_descendants() {
        let deck = deck_of(&["Forest"; 30]);
        let state = GameState::new(Arc::clone(&deck), true);
        for next in state.next_states().unwrap() {
            assert!(Arc::ptr_eq(&next.deck, &deck));
        }
    }

    #[test]
    fn test_done_state_is_absorbing() {
        let mut state = state_with(&["Forest"], &[], 2);
        state.done = true;
        let successors = state.next_states().unwrap();
        assert_eq!(successors.len(), 1);
        assert_eq!(successors[0], state);
    }

    #[test]
    fn test_pass_prunes_empty_battlefield() {
        let state = state_with(&[], &["Forest"], 1);
        assert!(state.pass_turn().unwrap().is_empty());
    }

    #[test]
    fn test_pass_prunes_early_debt() {
        let mut state = state_with(&["Forest"], &[], 1);
        state.debt = PACT_DEBT;
        assert!(state.pass_turn().unwrap().is_empty());
    }

    #[test]
    fn test_pass_resets_pool_and_drops() {
        let mut state = state_with(&["Forest", "Forest"], &[], 2);
        state.pool = Mana::parse("3GG").unwrap();
        let next = state.pass_turn().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].pool, Mana::parse("GG").unwrap());
        assert_eq!(next[0].land_drops, 1);
        assert_eq!(next[0].turn, 3);
    }

    #[test]
    fn test_extra_land_drops_from_enablers() {
        let state = state_with(
            &[
                "Forest",
                "Azusa, Lost but Seeking",
                "Sakura-Tribe Scout",
                "Sakura-Tribe Scout",
            ],
            &[],
            2,
        );
        let next = state.pass_turn().unwrap();
        assert_eq!(next[0].land_drops, 1 + 2 + 2);
    }

    #[test]
    fn test_pact_debt_paid_or_dead() {
        // Four Forests cover 2GG; three do not.
        let mut rich = state_with(&["Forest", "Forest", "Forest", "Forest"], &[], 2);
        rich.debt = PACT_DEBT;
        let paid = rich.pass_turn().unwrap();
        assert!(!paid.is_empty());
        for state in paid {
            assert!(state.debt.is_empty());
            assert_eq!(state.pool, Mana::ZERO);
        }

        let mut poor = state_with(&["Forest", "Forest", "Forest"], &[], 2);
        poor.debt = PACT_DEBT;
        assert!(poor.pass_turn().unwrap().is_empty());
    }

    #[test]
    fn test_on_the_play_skips_first_draw() {
        let deck = deck_of(&["Forest"; 30]);
        let play = GameState::new(Arc::clone(&deck), true);
        let next = play.pass_turn().unwrap();
        assert_eq!(next[0].hand.len(), 7);

        let draw = GameState::new(deck, false);
        let next = draw.pass_turn().unwrap();
        assert_eq!(next[0].hand.len(), 8);
    }

    #[test]
    fn test_play_requires_land_drop() {
        let mut state = state_with(&[], &["Forest"], 1);
        state.land_drops = 0;
        assert!(state.play(card("Forest")).is_empty());
        state.land_drops = 1;
        let played = state.play(card("Forest"));
        assert_eq!(played.len(), 1);
        assert!(played[0].battlefield.contains(card("Forest")));
        assert_eq!(played[0].pool, Mana::parse("G").unwrap());
    }

    #[test]
    fn test_tapped_land_stays_dry_without_untapper() {
        let state = state_with(&[], &["Khalni Garden"], 1);
        let played = state.play(card("Khalni Garden"));
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].pool, Mana::ZERO);
    }

    #[test]
    fn test_untap_permanent_retaps_tapped_land() {
        let state = state_with(&["Amulet of Vigor"], &["Khalni Garden"], 1);
        let played = state.play(card("Khalni Garden"));
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].pool, Mana::parse("G").unwrap());

        // Two untappers, two taps.
        let state = state_with(&["Amulet of Vigor", "Amulet of Vigor"], &["Khalni Garden"], 1);
        let played = state.play(card("Khalni Garden"));
        assert_eq!(played[0].pool, Mana::parse("GG").unwrap());
    }

    #[test]
    fn test_conditional_entry_checks_battlefield() {
        let cold = state_with(&[], &["Castle Garenbrig"], 1);
        let played = cold.play(card("Castle Garenbrig"));
        assert_eq!(played[0].pool, Mana::ZERO);

        let warm = state_with(&["Forest"], &["Castle Garenbrig"], 1);
        let played = warm.play(card("Castle Garenbrig"));
        assert_eq!(played[0].pool, Mana::parse("G").unwrap());
    }

    #[test]
    fn test_bounce_enumerates_distinct_lands() {
        let state = state_with(&["Forest", "Forest", "Island"], &[], 2);
        let bounced = state.bounce_land();
        assert_eq!(bounced.len(), 2);
        for state in &bounced {
            assert_eq!(state.battlefield.len(), 2);
            assert_eq!(state.hand.len(), 1);
        }
    }

    #[test]
    fn test_cast_fans_out_over_payments() {
        // GGGU paying 1G leaves GG or GU.
        let mut state = state_with(&[], &["Explore"], 2);
        state.pool = Mana::parse("GGGU").unwrap();
        let casts = state.cast(card("Explore")).unwrap();
        assert_eq!(casts.len(), 2);
        for next in &casts {
            assert_eq!(next.spells_cast, 1);
            assert!(!next.hand.contains(card("Explore")));
        }
    }

    #[test]
    fn test_cast_without_mana_is_no_branch() {
        let state = state_with(&[], &["Primeval Titan"], 2);
        assert!(state.cast(card("Primeval Titan")).unwrap().is_empty());
    }

    #[test]
    fn test_first_spell_discount() {
        let state = state_with(&[], &["Once Upon a Time"], 1);
        assert_eq!(state.cost_to_cast(card("Once Upon a Time")), Some(Mana::ZERO));
        let mut later = state.clone();
        later.spells_cast = 1;
        assert_eq!(
            later.cost_to_cast(card("Once Upon a Time")),
            Some(Mana::parse("1G").unwrap())
        );
    }

    #[test]
    fn test_suspend_ticks_then_resolves() {
        let mut state = state_with(&["Forest"], &[], 1);
        state.suspend_push(card("Search for Tomorrow"), 2);

        let after_one = state.pass_turn().unwrap();
        assert_eq!(after_one[0].suspended.len(), 1);
        assert_eq!(after_one[0].suspended[0].1, 1);

        // Second upkeep: resolves for free and puts a basic into play.
        let after_two = after_one[0].pass_turn().unwrap();
        assert!(!after_two.is_empty());
        for next in &after_two {
            assert!(next.suspended.is_empty());
            assert_eq!(next.battlefield.count_named("Forest"), 2);
        }
    }

    #[test]
    fn test_scry_offers_both_orders() {
        let state = state_with(&["Forest"], &[], 1);
        let scried = state.scry1();
        assert_eq!(scried.len(), 2);
        assert_eq!(scried[0].deck_index, state.deck_index);
        assert_eq!(scried[1].deck_index, state.deck_index + 1);
    }

    #[test]
    fn test_pitch_enumerates_multiset_choices() {
        let state = state_with(&[], &["Forest", "Forest", "Island"], 1);
        let pitched = state.pitch(2);
        // FF, FI, II is impossible with one Island: expect FF and FI.
        assert_eq!(pitched.len(), 2);
        for next in &pitched {
            assert_eq!(next.hand.len(), 1);
        }
    }

    #[test]
    fn test_pre_game_land_needs_the_draw() {
        let deck = deck_of(&[
            "Gemstone Caverns",
            "Forest",
            "Forest",
            "Forest",
            "Forest",
            "Forest",
            "Forest",
            "Forest",
        ]);
        let on_play = GameState::new(Arc::clone(&deck), true);
        assert_eq!(on_play.pre_game_actions().len(), 1);

        let on_draw = GameState::new(deck, false);
        let options = on_draw.pre_game_actions();
        // Decline, or lead with the caverns at the price of a Forest.
        assert_eq!(options.len(), 2);
        assert!(options[1].battlefield.contains_named("Gemstone Caverns"));
        assert_eq!(options[1].hand.len(), 5);
    }

    #[test]
    fn test_combinations_respect_multiplicity() {
        let cards: Cards = [card("Forest"), card("Forest"), card("Island")]
            .into_iter()
            .collect();
        let pairs = combinations(&cards, 2);
        assert_eq!(pairs.len(), 2);
        let singles = combinations(&cards, 1);
        assert_eq!(singles.len(), 2);
        assert!(combinations(&cards, 4).is_empty());
    }
}
