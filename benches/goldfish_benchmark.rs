//! Performance benchmarks for the goldfish search engine
//!
//! Measures whole-trial throughput on the shipped deck list with a
//! fixed seed, plus the hot inner pieces: turn fan-out and the
//! nondeterministic mana payment.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mtg_goldfish_rs::core::Mana;
use mtg_goldfish_rs::loader::DeckLoader;
use mtg_goldfish_rs::sim::{simulate, GameState, SimOptions, StateSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

const SEED: u64 = 42;

fn amulet_deck() -> Vec<mtg_goldfish_rs::core::Card> {
    DeckLoader::parse(include_str!("../decks/amulet.in")).expect("shipped deck parses")
}

fn bench_full_trial(c: &mut Criterion) {
    let deck = amulet_deck();
    let options = SimOptions {
        max_turns: 3,
        state_limit: 20_000,
    };
    c.bench_function("trial_turn3", |b| {
        let mut trial = 0u64;
        b.iter(|| {
            trial += 1;
            let mut rng = ChaCha8Rng::seed_from_u64(SEED.wrapping_add(trial));
            black_box(simulate(&deck, &mut rng, options).expect("trial runs"))
        })
    });
}

fn bench_turn_fanout(c: &mut Criterion) {
    let deck = amulet_deck();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let shuffled: Arc<[mtg_goldfish_rs::core::Card]> =
        mtg_goldfish_rs::loader::shuffled(&deck, &mut rng).into();
    let state = GameState::new(shuffled, true);

    c.bench_function("next_states", |b| {
        b.iter(|| {
            let successors = black_box(&state).next_states().expect("fan-out runs");
            black_box(StateSet::from_iter(successors).len())
        })
    });
}

fn bench_mana_payment(c: &mut Criterion) {
    let pool = Mana::parse("3GGGUU").expect("pool parses");
    let cost = Mana::parse("2GU").expect("cost parses");
    c.bench_function("mana_minus", |b| {
        b.iter(|| black_box(pool.minus(black_box(cost))))
    });
}

criterion_group!(benches, bench_full_trial, bench_turn_fanout, bench_mana_payment);
criterion_main!(benches);
