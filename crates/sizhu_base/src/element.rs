//! Five elements (wuxing) and yin/yang polarity.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The five elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "木")]
    Wood,
    #[serde(rename = "火")]
    Fire,
    #[serde(rename = "土")]
    Earth,
    #[serde(rename = "金")]
    Metal,
    #[serde(rename = "水")]
    Water,
}

/// All elements in generating-cycle order (Wood produces Fire, ...).
pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

impl Element {
    /// Iteration order used by score tables. Arg-max/arg-min ties resolve to the
    /// earliest element in this order.
    pub const SCORE_ORDER: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    /// 0-based index in generating order (Wood=0 .. Water=4).
    pub const fn index(self) -> u8 {
        match self {
            Self::Wood => 0,
            Self::Fire => 1,
            Self::Earth => 2,
            Self::Metal => 3,
            Self::Water => 4,
        }
    }

    /// Chinese character for the element.
    pub const fn as_char(self) -> char {
        match self {
            Self::Wood => '木',
            Self::Fire => '火',
            Self::Earth => '土',
            Self::Metal => '金',
            Self::Water => '水',
        }
    }

    /// English name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "Wood",
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Metal => "Metal",
            Self::Water => "Water",
        }
    }

    /// The element this one produces.
    pub const fn produces(self) -> Element {
        ALL_ELEMENTS[((self.index() + 1) % 5) as usize]
    }

    /// The element this one controls.
    pub const fn controls(self) -> Element {
        ALL_ELEMENTS[((self.index() + 2) % 5) as usize]
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Yin/yang polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "陽")]
    Yang,
    #[serde(rename = "陰")]
    Yin,
}

impl Polarity {
    /// Polarity of the n-th symbol of a cycle (even = Yang).
    pub const fn from_index(i: u8) -> Self {
        if i % 2 == 0 { Self::Yang } else { Self::Yin }
    }

    /// Display label (陽 / 陰).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yang => "陽",
            Self::Yin => "陰",
        }
    }

    pub const fn is_yang(self) -> bool {
        matches!(self, Self::Yang)
    }
}
