//! Goldfish simulator - Main Binary
//!
//! Runs brute-force goldfish trials over deck lists and aggregates the
//! per-turn win rates. An interrupt kills the trial loop between
//! simulations; partially finished trials are simply abandoned.

use anyhow::{bail, Context};
use clap::Parser;
use mtg_goldfish_rs::core::{catalog, Card};
use mtg_goldfish_rs::loader::{catalog_file, DeckLoader};
use mtg_goldfish_rs::results;
use mtg_goldfish_rs::sim::{simulate, Outcome, SimOptions, Verdict};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "goldfish")]
#[command(about = "Brute-force goldfish simulator for combo decks", long_about = None)]
struct Cli {
    /// Deck name(s) to run (default: every deck in the deck directory)
    decks: Vec<String>,

    /// Stop after this many trials (default: run until killed)
    #[arg(short = 'n', long)]
    ntrials: Option<usize>,

    /// Run this many simulations in parallel
    #[arg(short = 'j', long, default_value_t = 1)]
    jobs: usize,

    /// Run until a winning line is found, then print its transcript.
    /// With a card name, keep going until the line used that card.
    #[arg(short = 'd', long, value_name = "CARD", num_args = 0..=1, default_missing_value = "")]
    debug: Option<String>,

    /// Print the aggregate results instead of simulating
    #[arg(short = 'r', long)]
    results: bool,

    /// Latest turn worth searching
    #[arg(long, default_value_t = 4)]
    max_turns: u32,

    /// Abort a trial past this many explored states
    #[arg(long, default_value_t = 100_000)]
    state_limit: usize,

    /// Seed for deterministic shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Directory of deck lists (<name>.in)
    #[arg(long, default_value = "decks")]
    deck_dir: PathBuf,

    /// Directory for per-deck result records
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Card catalog file (default: the built-in table)
    #[arg(long)]
    cards: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.cards {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading card catalog {}", path.display()))?;
        catalog::install(catalog_file::parse(&content)?)?;
    }

    let deck_names = if cli.decks.is_empty() {
        all_decks(&cli.deck_dir)?
    } else {
        cli.decks.clone()
    };
    if deck_names.is_empty() {
        bail!("no decks found in {}", cli.deck_dir.display());
    }

    if cli.results {
        results::print_stats(&cli.out_dir, &deck_names)?;
        return Ok(());
    }

    // Load every deck up front so unknown cards fail before any trial.
    let mut decks = Vec::new();
    for name in &deck_names {
        let path = cli.deck_dir.join(format!("{name}.in"));
        let cards = DeckLoader::load_from_file(&path)
            .with_context(|| format!("loading deck {}", path.display()))?;
        if cards.len() != 60 {
            eprintln!("WARNING: {} cards in {name}", cards.len());
        }
        decks.push((name.clone(), cards));
    }

    let options = SimOptions {
        max_turns: cli.max_turns,
        state_limit: cli.state_limit,
    };

    if let Some(filter) = &cli.debug {
        return run_debug(&decks, filter, cli.seed, options);
    }
    run_trials(&cli, &decks, options)
}

/// Every `<name>.in` in the deck directory, sorted.
fn all_decks(deck_dir: &std::path::Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = std::fs::read_dir(deck_dir)
        .with_context(|| format!("reading deck directory {}", deck_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("in") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn rng_for(seed: Option<u64>, trial: usize) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// One line per trial, in the shape of the winning summary:
///   "turn 3 titan on the play (36121 states, 0.48s)"
fn verdict_line(outcome: &Outcome, max_turns: u32) -> String {
    let side = if outcome.state.on_the_play() {
        "on the play"
    } else {
        "on the draw"
    };
    let perf = format!(
        "({} states, {:.2}s)",
        outcome.states_seen,
        outcome.elapsed.as_secs_f64()
    );
    match outcome.verdict {
        Verdict::Solved => format!("turn {} titan {side} {perf}", outcome.state.turn()),
        Verdict::Overflowed => format!("OVERFLOW {side} {perf}"),
        Verdict::Whiff => format!("turn {max_turns} whiff {side} {perf}"),
    }
}

/// Sequential trials until a winning line (optionally one that used a
/// particular card) turns up, then print the play-by-play.
fn run_debug(
    decks: &[(String, Vec<Card>)],
    filter: &str,
    seed: Option<u64>,
    options: SimOptions,
) -> anyhow::Result<()> {
    let wanted = if filter.is_empty() {
        None
    } else {
        Some(Card::named(filter)?)
    };
    let name_width = decks.iter().map(|(n, _)| n.len()).max().unwrap_or(8);

    for trial in 1.. {
        let mut rng = rng_for(seed, trial);
        let pick = rng.gen_range(0..decks.len());
        let (name, cards) = &decks[pick];
        let outcome = simulate(cards, &mut rng, options)?;
        println!(
            "{:>5} {:<name_width$} {}",
            trial,
            name,
            verdict_line(&outcome, options.max_turns)
        );
        if outcome.verdict == Verdict::Solved {
            let converged = match wanted {
                Some(card) => outcome.state.used(card),
                None => true,
            };
            if converged {
                println!();
                println!("{}", outcome.state.transcript());
                return Ok(());
            }
        }
    }
    Ok(())
}

/// The main trial loop: batches of parallel, hermetic simulations,
/// each appending one record to its deck's results file.
fn run_trials(cli: &Cli, decks: &[(String, Vec<Card>)], options: SimOptions) -> anyhow::Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs.max(1))
        .build()
        .context("building worker pool")?;

    let name_width = decks.iter().map(|(n, _)| n.len()).max().unwrap_or(8);
    let write_lock = Mutex::new(());
    let failed = AtomicBool::new(false);
    let completed = AtomicUsize::new(0);
    let batch = (cli.jobs.max(1) * 32).min(cli.ntrials.unwrap_or(usize::MAX));

    loop {
        let start = completed.load(Ordering::SeqCst);
        if let Some(limit) = cli.ntrials {
            if start >= limit {
                break;
            }
        }
        let end = match cli.ntrials {
            Some(limit) => (start + batch).min(limit),
            None => start + batch,
        };

        pool.install(|| {
            (start..end).into_par_iter().for_each(|trial| {
                if failed.load(Ordering::SeqCst) {
                    return;
                }
                let mut rng = rng_for(cli.seed, trial);
                let pick = rng.gen_range(0..decks.len());
                let (name, cards) = &decks[pick];
                match simulate(cards, &mut rng, options) {
                    Ok(outcome) => {
                        let record = outcome.record();
                        let _guard = write_lock.lock();
                        if results::append_record(&cli.out_dir, name, &record).is_err() {
                            failed.store(true, Ordering::SeqCst);
                            return;
                        }
                        println!(
                            "{:>5} {:<name_width$} {}",
                            trial + 1,
                            name,
                            verdict_line(&outcome, options.max_turns)
                        );
                        completed.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(error) => {
                        eprintln!("trial {} failed: {error}", trial + 1);
                        failed.store(true, Ordering::SeqCst);
                    }
                }
            });
        });

        if failed.load(Ordering::SeqCst) {
            bail!("simulation failed");
        }
    }
    Ok(())
}
