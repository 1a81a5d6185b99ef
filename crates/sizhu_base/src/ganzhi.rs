//! Sexagenary (ganzhi) pairs and single-character symbols.
//!
//! Stems and branches advance in lockstep, so only the 60 pairs whose stem and
//! branch share parity ever occur. Pair index 0 is 甲子, index 59 is 癸亥.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::branch::Branch;
use crate::error::BaseError;
use crate::stem::Stem;

/// Number of pairs in the sexagenary cycle.
pub const CYCLE_LEN: u8 = 60;

/// A (stem, branch) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SexagenaryPair {
    pub stem: Stem,
    pub branch: Branch,
}

impl SexagenaryPair {
    pub const fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// Pair at a cycle position, wrapping modulo 60.
    pub const fn from_cycle_index(i: i64) -> Self {
        let i = i.rem_euclid(CYCLE_LEN as i64);
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// Whether the pair occurs in the 60 cycle (stem and branch parity match).
    pub const fn is_valid(self) -> bool {
        self.stem.index() % 2 == self.branch.index() % 2
    }

    /// Position in the 60 cycle (0 = 甲子), or `None` for a parity-mismatched pair.
    pub const fn cycle_index(self) -> Option<u8> {
        if !self.is_valid() {
            return None;
        }
        let s = self.stem.index() as i16;
        let b = self.branch.index() as i16;
        // i ≡ s (mod 10), i ≡ b (mod 12)
        let k = ((s - b).rem_euclid(12)) / 2;
        Some(((s + 10 * k) % 60) as u8)
    }

    /// Pair `n` steps further along the cycle. Invalid pairs shift stem and branch independently.
    pub const fn offset(self, n: i64) -> Self {
        Self {
            stem: self.stem.offset(n),
            branch: self.branch.offset(n),
        }
    }

    /// First branch of the ten-day group this pair belongs to.
    pub const fn decade_start(self) -> Branch {
        self.branch.offset(-(self.stem.index() as i64))
    }

    /// The two branches left over by this pair's ten-day group (the void pair).
    pub const fn void_branches(self) -> (Branch, Branch) {
        let start = self.decade_start();
        (start.offset(10), start.offset(11))
    }
}

impl Display for SexagenaryPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl FromStr for SexagenaryPair {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(sc), Some(bc), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(BaseError::MalformedGanzhi(s.into()));
        };
        match (Stem::from_char(sc), Branch::from_char(bc)) {
            (Some(stem), Some(branch)) => Ok(Self { stem, branch }),
            _ => Err(BaseError::MalformedGanzhi(s.into())),
        }
    }
}

impl TryFrom<String> for SexagenaryPair {
    type Error = BaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SexagenaryPair> for String {
    fn from(p: SexagenaryPair) -> Self {
        p.to_string()
    }
}

/// Which half of a pillar a rule or lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Stem,
    Branch,
}

/// A stem or a branch, parsed from its single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbol {
    Stem(Stem),
    Branch(Branch),
}

impl Symbol {
    pub const fn facet(self) -> Facet {
        match self {
            Self::Stem(_) => Facet::Stem,
            Self::Branch(_) => Facet::Branch,
        }
    }

    /// The given facet of a pair as a symbol.
    pub const fn of(pair: SexagenaryPair, facet: Facet) -> Self {
        match facet {
            Facet::Stem => Self::Stem(pair.stem),
            Facet::Branch => Self::Branch(pair.branch),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stem(s) => s.fmt(f),
            Self::Branch(b) => b.fmt(f),
        }
    }
}

impl FromStr for Symbol {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Stem>()
            .map(Self::Stem)
            .or_else(|_| s.parse::<Branch>().map(Self::Branch))
    }
}

impl TryFrom<String> for Symbol {
    type Error = BaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.to_string()
    }
}
