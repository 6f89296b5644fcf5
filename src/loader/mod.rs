//! Loaders for the external inputs: deck lists and the card catalog

pub mod catalog_file;
pub mod deck;

pub use deck::{shuffled, DeckLoader};
