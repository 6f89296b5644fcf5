//! Mana values: pools, costs, and the ways to pay one from the other
//!
//! A single value type covers both costs and pools. Comparison is the
//! coordinate-wise partial order, and payment is nondeterministic: paying
//! a generic cost out of colored mana can leave several different pools,
//! and the engine has to consider all of them.

use crate::{GoldfishError, Result};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Mana colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
        }
    }
}

/// A multiset of mana symbols plus a total that includes generic.
///
/// Invariant: `total >= white + blue + black + red + green`. The slack
/// between the two is colorless/generic mana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mana {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub total: u8,
}

impl Mana {
    pub const ZERO: Mana = Mana {
        white: 0,
        blue: 0,
        black: 0,
        red: 0,
        green: 0,
        total: 0,
    };

    /// Parse a compact expression like "2GG", "UU", "" or "0".
    ///
    /// Color letters count one each; `C` is a single colorless mana;
    /// a number adds that much generic.
    pub fn parse(expr: &str) -> Result<Mana> {
        let mut mana = Mana::ZERO;
        let mut digits = String::new();
        for c in expr.chars() {
            match c {
                'W' => {
                    mana.white += 1;
                    mana.total += 1;
                }
                'U' => {
                    mana.blue += 1;
                    mana.total += 1;
                }
                'B' => {
                    mana.black += 1;
                    mana.total += 1;
                }
                'R' => {
                    mana.red += 1;
                    mana.total += 1;
                }
                'G' => {
                    mana.green += 1;
                    mana.total += 1;
                }
                'C' => mana.total += 1,
                '0'..='9' => digits.push(c),
                _ => return Err(GoldfishError::InvalidMana(expr.to_string())),
            }
        }
        if !digits.is_empty() {
            let generic: u8 = digits
                .parse()
                .map_err(|_| GoldfishError::InvalidMana(expr.to_string()))?;
            mana.total += generic;
        }
        Ok(mana)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Sum of the colored symbols.
    pub fn colored(&self) -> u8 {
        self.white + self.blue + self.black + self.red + self.green
    }

    /// Generic/colorless portion.
    pub fn colorless(&self) -> u8 {
        self.total - self.colored()
    }

    fn channels(&self) -> [u8; 5] {
        [self.white, self.blue, self.black, self.red, self.green]
    }

    fn from_channels(channels: [u8; 5], total: u8) -> Mana {
        Mana {
            white: channels[0],
            blue: channels[1],
            black: channels[2],
            red: channels[3],
            green: channels[4],
            total,
        }
    }

    /// All pools that can remain after paying `cost` from this pool.
    ///
    /// Empty when the cost is not covered. When the colorless surplus
    /// covers the generic portion of the cost there is exactly one
    /// answer; otherwise the generic shortfall is assigned to colored
    /// mana in every possible way. Paying 1G out of GGGU leaves GG or GU,
    /// and a later spell may care which.
    pub fn minus(&self, cost: Mana) -> Vec<Mana> {
        if !(cost <= *self) {
            return Vec::new();
        }
        let total = self.total - cost.total;
        let mut spare = [0u8; 5];
        let (own, owed) = (self.channels(), cost.channels());
        for i in 0..5 {
            spare[i] = own[i] - owed[i];
        }
        let shortfall = cost.colorless().saturating_sub(self.colorless());
        if shortfall == 0 {
            return vec![Mana::from_channels(spare, total)];
        }
        let mut pools = FxHashSet::default();
        assign_shortfall(&spare, 0, shortfall, [0u8; 5], &mut |spent| {
            let mut left = spare;
            for i in 0..5 {
                left[i] -= spent[i];
            }
            pools.insert(Mana::from_channels(left, total));
        });
        let mut pools: Vec<Mana> = pools.into_iter().collect();
        pools.sort_by_key(|m| m.channels());
        pools
    }
}

/// Enumerate every split of `remaining` generic units across the spare
/// colored mana, invoking `emit` once per complete assignment.
fn assign_shortfall(
    spare: &[u8; 5],
    index: usize,
    remaining: u8,
    spent: [u8; 5],
    emit: &mut impl FnMut([u8; 5]),
) {
    if index == 5 {
        if remaining == 0 {
            emit(spent);
        }
        return;
    }
    for take in 0..=spare[index].min(remaining) {
        let mut spent = spent;
        spent[index] = take;
        assign_shortfall(spare, index + 1, remaining - take, spent, emit);
    }
}

impl Add for Mana {
    type Output = Mana;

    fn add(self, other: Mana) -> Mana {
        Mana {
            white: self.white + other.white,
            blue: self.blue + other.blue,
            black: self.black + other.black,
            red: self.red + other.red,
            green: self.green + other.green,
            total: self.total + other.total,
        }
    }
}

impl AddAssign for Mana {
    fn add_assign(&mut self, other: Mana) {
        *self = *self + other;
    }
}

impl PartialOrd for Mana {
    /// Coordinate-wise comparison over every color count and the total.
    /// Pools like GG and UU are incomparable.
    fn partial_cmp(&self, other: &Mana) -> Option<Ordering> {
        let (a, b) = (self.channels(), other.channels());
        let le = a.iter().zip(&b).all(|(x, y)| x <= y) && self.total <= other.total;
        let ge = a.iter().zip(&b).all(|(x, y)| x >= y) && self.total >= other.total;
        match (le, ge) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Mana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colorless = self.colorless();
        if colorless > 0 || self.colored() == 0 {
            write!(f, "{colorless}")?;
        }
        for _ in 0..self.white {
            write!(f, "W")?;
        }
        for _ in 0..self.blue {
            write!(f, "U")?;
        }
        for _ in 0..self.black {
            write!(f, "B")?;
        }
        for _ in 0..self.red {
            write!(f, "R")?;
        }
        for _ in 0..self.green {
            write!(f, "G")?;
        }
        Ok(())
    }
}
