//! Deduplicating container of game states
//!
//! Different play orders frequently land on the same position; the set
//! collapses them so each position is explored once. Iteration order is
//! arbitrary and nothing may rely on it. When two states differ only in
//! their transcripts, whichever arrived first keeps its story.

use crate::sim::state::GameState;
use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct StateSet {
    states: FxHashSet<GameState>,
}

impl StateSet {
    pub fn new() -> StateSet {
        StateSet::default()
    }

    pub fn single(state: GameState) -> StateSet {
        let mut set = StateSet::new();
        set.insert(state);
        set
    }

    /// False if an equal state was already present.
    pub fn insert(&mut self, state: GameState) -> bool {
        self.states.insert(state)
    }

    /// Remove and return an arbitrary member.
    pub fn pop(&mut self) -> Option<GameState> {
        let state = self.states.iter().next()?.clone();
        self.states.remove(&state);
        Some(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameState> {
        self.states.iter()
    }

    pub fn find_done(&self) -> Option<&GameState> {
        self.states.iter().find(|state| state.done())
    }

    /// A longest transcript, for showing a representative line.
    pub fn best_story(&self) -> Option<&GameState> {
        self.states
            .iter()
            .max_by_key(|state| state.transcript().len())
    }
}

impl Extend<GameState> for StateSet {
    fn extend<I: IntoIterator<Item = GameState>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

impl FromIterator<GameState> for StateSet {
    fn from_iter<I: IntoIterator<Item = GameState>>(iter: I) -> StateSet {
        let mut set = StateSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for StateSet {
    type Item = GameState;
    type IntoIter = <FxHashSet<GameState> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}
