//! Per-simulation records and the aggregate report
//!
//! Every trial appends one JSON line to `<out-dir>/<deck>.jsonl`. The
//! report reads those files back and prints, per deck, the cumulative
//! chance of a win by each turn with a normal-approximation interval,
//! plus how often the search overflowed instead of answering.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What one simulation contributes to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRecord {
    /// Turn the goal landed; 0 when it never did.
    pub turn: u32,
    pub on_the_play: bool,
    /// Goal landed with an untap permanent in play (or hasty).
    pub fast: bool,
    pub overflowed: bool,
}

fn record_path(out_dir: &Path, deck_name: &str) -> PathBuf {
    out_dir.join(format!("{deck_name}.jsonl"))
}

/// Append one record to the deck's results file.
pub fn append_record(out_dir: &Path, deck_name: &str, record: &SimRecord) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(record_path(out_dir, deck_name))?;
    let line = serde_json::to_string(record)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// All records for a deck; a missing file is just zero trials.
pub fn read_records(out_dir: &Path, deck_name: &str) -> Result<Vec<SimRecord>> {
    let content = match fs::read_to_string(record_path(out_dir, deck_name)) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(error.into()),
    };
    let mut records = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(serde_json::from_str(line)?);
    }
    Ok(records)
}

/// Print the cumulative per-turn success table for the given decks.
pub fn print_stats(out_dir: &Path, deck_names: &[String]) -> Result<()> {
    let name_width = deck_names
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(4)
        .max(4)
        + 1;
    let turns = [2u32, 3, 4];

    let mut header = format!("{:<name_width$}", "name");
    for turn in turns {
        header += &format!("   {:>9}", format!("turn {turn}"));
    }
    header += "  |   overflow";
    println!("{header}");

    for name in deck_names {
        let records = read_records(out_dir, name)?;
        let total = records.len().max(1);
        let mut row = format!("{name:<name_width$}");
        for turn in turns {
            let hits = records
                .iter()
                .filter(|r| r.turn != 0 && r.turn <= turn)
                .count();
            row += &format!("   {}", pcts(hits, total, 2.0));
        }
        let overflows = records.iter().filter(|r| r.overflowed).count();
        row += &format!("  |  {}", pcts(overflows, total, 2.0));
        println!("{row}");
    }
    Ok(())
}

/// Probability and spread from `m` hits in `n` trials, via the normal
/// approximation solved for the probability:
///   m = np ± z sqrt((1-p)np)
/// which inverts to a quadratic in p. For tiny samples the plain m/n
/// center keeps "never seen" reading as zero.
fn pcts(m: usize, n: usize, z: f64) -> String {
    let (m, n) = (m as f64, n as f64);
    let a = n * n + z * z * n;
    let b = -z * z * n - 2.0 * m * n;
    let c = m * m;
    let root = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let p_plus = (-b + root) / (2.0 * a);
    let p_minus = (-b - root) / (2.0 * a);
    let p = m / n;
    let dp = (p_plus - p_minus) / 2.0;
    format!("{} ± {}", pct(p), pct(dp))
}

fn pct(x: f64) -> String {
    format!("{:2.0}%", 100.0 * x)
}
