//! The state-space search engine

pub mod driver;
pub mod effects;
pub mod state;
pub mod state_set;

pub use driver::{simulate, Outcome, SimOptions, Simulation, Verdict};
pub use state::GameState;
pub use state_set::StateSet;
