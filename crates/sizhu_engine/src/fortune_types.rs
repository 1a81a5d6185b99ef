//! Types for annotated fortune periods (dayun) and fortune years (liunian).

use serde::Serialize;
use sizhu_base::{Branch, Polarity, SexagenaryPair, Stem};

use crate::pillar::HiddenStemDetail;

/// One calendar year inside a fortune period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FortuneYear {
    pub year: i32,
    pub age: i32,
    pub ganzhi: SexagenaryPair,
    pub stem_ten_deity: String,
    /// Relation of the branch's main hidden stem.
    pub branch_ten_deity: String,
    pub hidden_stems: Vec<HiddenStemDetail>,
    /// `"<relation>:<branch>"` against the natal and period branches.
    pub relationships: Vec<String>,
    pub is_empty: bool,
    /// Pair already present among the natal pillars.
    pub is_repeated: bool,
    pub nayin: String,
    pub special_combinations: Vec<String>,
    pub special_patterns: Vec<String>,
}

/// One ten-year fortune period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FortunePeriod {
    pub start_age: i32,
    pub start_year: i32,
    pub end_year: i32,
    pub ganzhi: SexagenaryPair,
    pub stem: Stem,
    pub branch: Branch,
    pub stem_ten_deity: String,
    pub branch_ten_deity: String,
    pub life_stage: String,
    pub stem_polarity: Polarity,
    pub branch_polarity: Polarity,
    pub hidden_stems: Vec<HiddenStemDetail>,
    /// `"<relation>:<branch>"` against the natal branches.
    pub relationships: Vec<String>,
    pub is_empty: bool,
    pub is_repeated: bool,
    pub nayin: String,
    /// `夾:<branch>` and `拱:<branch>` entries.
    pub special_combinations: Vec<String>,
    pub years: Vec<FortuneYear>,
}

impl FortunePeriod {
    /// Fortune year for a calendar year, if this period covers it.
    pub fn year(&self, year: i32) -> Option<&FortuneYear> {
        self.years.iter().find(|y| y.year == year)
    }
}

/// Minimal period kept when annotation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FortuneStub {
    pub start_age: i32,
    pub ganzhi: Option<SexagenaryPair>,
    pub error: String,
}

/// Fortune period and year covering one calendar year, with the general
/// shensha rules their pairs trigger against the natal chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentProgression {
    pub as_of_year: i32,
    pub age: i32,
    pub period: SexagenaryPair,
    pub period_start_age: i32,
    pub period_shensha: Vec<String>,
    pub year: SexagenaryPair,
    pub year_shensha: Vec<String>,
}
