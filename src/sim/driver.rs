//! Turn driver and simulation entry
//!
//! The driver grows each turn's frontier until every reachable state
//! has moved past the current turn, short-circuiting the moment any
//! state reaches the goal. In-turn successors (an extra land drop, a
//! suspend resolution) go back onto the frontier rather than forward.
//!
//! Fan-out is bounded by a per-simulation state counter; past the limit
//! the turn raises an overflow, which the entry catches and reports
//! instead of an answer. Each simulation is hermetic: counter, clock
//! and RNG are all local, so trials can run in parallel freely.

use crate::core::Card;
use crate::loader;
use crate::results::SimRecord;
use crate::sim::state::GameState;
use crate::sim::state_set::StateSet;
use crate::{GoldfishError, Result};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_TURNS: u32 = 4;
pub const DEFAULT_STATE_LIMIT: usize = 100_000;

/// How one trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A line gets the goal onto the battlefield.
    Solved,
    /// The search space blew past the state limit.
    Overflowed,
    /// Exhausted every line without reaching the goal.
    Whiff,
}

/// Result of one simulation: the terminal (or initial) state plus some
/// bookkeeping for the trial loop.
#[derive(Debug)]
pub struct Outcome {
    pub state: GameState,
    pub verdict: Verdict,
    pub states_seen: usize,
    pub elapsed: Duration,
}

impl Outcome {
    pub fn record(&self) -> SimRecord {
        SimRecord {
            turn: if self.state.done() { self.state.turn() } else { 0 },
            on_the_play: self.state.on_the_play(),
            fast: self.state.done() && self.state.fast(),
            overflowed: self.state.overflowed(),
        }
    }
}

/// One exhaustive search over a fixed shuffled deck.
pub struct Simulation {
    max_turns: u32,
    state_limit: usize,
    states_seen: usize,
}

impl Simulation {
    pub fn new(max_turns: u32) -> Simulation {
        Simulation {
            max_turns,
            state_limit: DEFAULT_STATE_LIMIT,
            states_seen: 0,
        }
    }

    pub fn with_state_limit(mut self, limit: usize) -> Simulation {
        self.state_limit = limit;
        self
    }

    /// Drive the initial state through every turn, stopping early on a
    /// win or an overflow.
    ///
    /// Pass `n` of the loop plays out turn `n-1`'s main phase and
    /// advances survivors into turn `n`, so exploring the last turn's
    /// plays takes `max_turns + 1` passes from the turn-zero start.
    pub fn run(&mut self, initial: GameState) -> Result<Outcome> {
        let start_time = Instant::now();
        let mut states: StateSet = initial.pre_game_actions().into_iter().collect();

        for _ in 0..=self.max_turns {
            match self.next_turn(states) {
                Ok(next) => {
                    if let Some(winner) = next.find_done() {
                        let state = winner.clone();
                        return Ok(self.finish(state, Verdict::Solved, start_time));
                    }
                    states = next;
                }
                Err(GoldfishError::TooManyStates) => {
                    let mut state = initial;
                    state.mark_overflowed();
                    return Ok(self.finish(state, Verdict::Overflowed, start_time));
                }
                Err(other) => return Err(other),
            }
        }

        Ok(self.finish(initial, Verdict::Whiff, start_time))
    }

    fn finish(&self, state: GameState, verdict: Verdict, start_time: Instant) -> Outcome {
        Outcome {
            state,
            verdict,
            states_seen: self.states_seen,
            elapsed: start_time.elapsed(),
        }
    }

    /// Advance every state one turn. Same-turn successors re-enter the
    /// frontier; next-turn successors collect in the output set. A done
    /// successor short-circuits the whole turn.
    fn next_turn(&mut self, states: StateSet) -> Result<StateSet> {
        let mut frontier = states;
        let mut next = StateSet::new();
        while let Some(state) = frontier.pop() {
            for successor in state.next_states()? {
                self.states_seen += 1;
                if successor.done() {
                    return Ok(StateSet::single(successor));
                }
                if successor.turn() > state.turn() {
                    next.insert(successor);
                } else {
                    frontier.insert(successor);
                }
            }
            if self.states_seen > self.state_limit {
                return Err(GoldfishError::TooManyStates);
            }
        }
        Ok(next)
    }
}

/// Options for a full trial: shuffle, draw seven, search.
#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub max_turns: u32,
    pub state_limit: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            max_turns: DEFAULT_MAX_TURNS,
            state_limit: DEFAULT_STATE_LIMIT,
        }
    }
}

/// Run one goldfish trial over a fresh shuffle of the deck list.
pub fn simulate(deck: &[Card], rng: &mut impl Rng, options: SimOptions) -> Result<Outcome> {
    let on_the_play = rng.gen_bool(0.5);
    let shuffled: Arc<[Card]> = loader::shuffled(deck, rng).into();
    let initial = GameState::new(shuffled, on_the_play);
    Simulation::new(options.max_turns)
        .with_state_limit(options.state_limit)
        .run(initial)
}
