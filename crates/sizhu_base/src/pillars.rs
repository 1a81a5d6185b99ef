//! Named four-pillar record (Year / Month / Day / Hour).

use serde::{Deserialize, Serialize};

use crate::branch::Branch;
use crate::ganzhi::{Facet, SexagenaryPair, Symbol};
use crate::stem::Stem;

/// One of the four chart positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarSlot {
    Year,
    Month,
    Day,
    Hour,
}

/// All slots in chart order.
pub const ALL_SLOTS: [PillarSlot; 4] = [
    PillarSlot::Year,
    PillarSlot::Month,
    PillarSlot::Day,
    PillarSlot::Hour,
];

impl PillarSlot {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        ALL_SLOTS.into_iter().find(|slot| slot.name() == s)
    }
}

/// A value per pillar, addressed by name rather than position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FourPillars<T> {
    pub year: T,
    pub month: T,
    pub day: T,
    pub hour: T,
}

impl<T> FourPillars<T> {
    pub const fn new(year: T, month: T, day: T, hour: T) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    pub const fn get(&self, slot: PillarSlot) -> &T {
        match slot {
            PillarSlot::Year => &self.year,
            PillarSlot::Month => &self.month,
            PillarSlot::Day => &self.day,
            PillarSlot::Hour => &self.hour,
        }
    }

    pub fn get_mut(&mut self, slot: PillarSlot) -> &mut T {
        match slot {
            PillarSlot::Year => &mut self.year,
            PillarSlot::Month => &mut self.month,
            PillarSlot::Day => &mut self.day,
            PillarSlot::Hour => &mut self.hour,
        }
    }

    /// Values in chart order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.year, &self.month, &self.day, &self.hour].into_iter()
    }

    /// (slot, value) in chart order.
    pub fn entries(&self) -> impl Iterator<Item = (PillarSlot, &T)> {
        ALL_SLOTS.into_iter().zip(self.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(PillarSlot, T) -> U) -> FourPillars<U> {
        FourPillars {
            year: f(PillarSlot::Year, self.year),
            month: f(PillarSlot::Month, self.month),
            day: f(PillarSlot::Day, self.day),
            hour: f(PillarSlot::Hour, self.hour),
        }
    }

    pub fn by_ref(&self) -> FourPillars<&T> {
        FourPillars {
            year: &self.year,
            month: &self.month,
            day: &self.day,
            hour: &self.hour,
        }
    }
}

impl FourPillars<SexagenaryPair> {
    /// The Day stem: reference point for every relation lookup.
    pub const fn day_master(&self) -> Stem {
        self.day.stem
    }

    pub fn stems(&self) -> [Stem; 4] {
        [self.year.stem, self.month.stem, self.day.stem, self.hour.stem]
    }

    pub fn branches(&self) -> [Branch; 4] {
        [
            self.year.branch,
            self.month.branch,
            self.day.branch,
            self.hour.branch,
        ]
    }

    /// The requested half of one pillar.
    pub const fn symbol(&self, slot: PillarSlot, facet: Facet) -> Symbol {
        Symbol::of(*self.get(slot), facet)
    }

    pub fn contains_pair(&self, pair: SexagenaryPair) -> bool {
        self.iter().any(|p| *p == pair)
    }
}
