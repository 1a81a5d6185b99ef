//! Earthly branches (dizhi).

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::{Element, Polarity};
use crate::error::BaseError;

/// The 12 earthly branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[allow(missing_docs)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// All 12 branches in cycle order (index 0 = Zi).
pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Zi,
    Branch::Chou,
    Branch::Yin,
    Branch::Mao,
    Branch::Chen,
    Branch::Si,
    Branch::Wu,
    Branch::Wei,
    Branch::Shen,
    Branch::You,
    Branch::Xu,
    Branch::Hai,
];

const BRANCH_CHARS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

/// The four storage (treasury) branches.
pub const STORAGE_BRANCHES: [Branch; 4] = [Branch::Chen, Branch::Xu, Branch::Chou, Branch::Wei];

impl Branch {
    /// 0-based index (Zi=0 .. Hai=11).
    pub const fn index(self) -> u8 {
        match self {
            Self::Zi => 0,
            Self::Chou => 1,
            Self::Yin => 2,
            Self::Mao => 3,
            Self::Chen => 4,
            Self::Si => 5,
            Self::Wu => 6,
            Self::Wei => 7,
            Self::Shen => 8,
            Self::You => 9,
            Self::Xu => 10,
            Self::Hai => 11,
        }
    }

    /// Branch from any integer index, wrapping modulo 12.
    pub const fn from_index(i: i64) -> Self {
        ALL_BRANCHES[i.rem_euclid(12) as usize]
    }

    /// Parse a single character.
    pub fn from_char(c: char) -> Option<Self> {
        BRANCH_CHARS
            .iter()
            .position(|&b| b == c)
            .map(|i| ALL_BRANCHES[i])
    }

    /// Chinese character.
    pub const fn as_char(self) -> char {
        BRANCH_CHARS[self.index() as usize]
    }

    /// Element of the branch's main qi.
    pub const fn element(self) -> Element {
        match self {
            Self::Zi | Self::Hai => Element::Water,
            Self::Yin | Self::Mao => Element::Wood,
            Self::Si | Self::Wu => Element::Fire,
            Self::Shen | Self::You => Element::Metal,
            Self::Chen | Self::Xu | Self::Chou | Self::Wei => Element::Earth,
        }
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }

    /// Branch `n` steps further along the cycle (negative goes back).
    pub const fn offset(self, n: i64) -> Self {
        Self::from_index(self.index() as i64 + n)
    }

    /// Whether this is one of the four storage branches.
    pub const fn is_storage(self) -> bool {
        matches!(self, Self::Chen | Self::Xu | Self::Chou | Self::Wei)
    }

    /// Branch between two branches two index steps apart (no wrap).
    pub const fn enclosed_between(self, other: Branch) -> Option<Branch> {
        let (a, b) = (self.index() as i64, other.index() as i64);
        if (a - b).abs() == 2 {
            Some(Self::from_index((a + b) / 2))
        } else {
            None
        }
    }

    /// Sandwiched branch of a fortune pair against a natal branch.
    ///
    /// Index distance 2 gives the midpoint; distance 10 gives the index sum
    /// taken modulo 12 (Xu against Zi yields Xu; Chou against Hai yields Zi).
    pub const fn sandwiched_with(self, other: Branch) -> Option<Branch> {
        let (a, b) = (self.index() as i64, other.index() as i64);
        match (a - b).abs() {
            2 => Some(Self::from_index((a + b) / 2)),
            10 => Some(Self::from_index(a + b)),
            _ => None,
        }
    }

    /// Three-harmony triad containing this branch, growth branch first.
    pub const fn triad(self) -> [Branch; 3] {
        match self.index() % 4 {
            0 => [Self::Shen, Self::Zi, Self::Chen],
            1 => [Self::Si, Self::You, Self::Chou],
            2 => [Self::Yin, Self::Wu, Self::Xu],
            _ => [Self::Hai, Self::Mao, Self::Wei],
        }
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Branch {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| BaseError::UnknownSymbol(s.into())),
            _ => Err(BaseError::UnknownSymbol(s.into())),
        }
    }
}

impl TryFrom<String> for Branch {
    type Error = BaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Branch> for String {
    fn from(b: Branch) -> Self {
        b.as_char().to_string()
    }
}
