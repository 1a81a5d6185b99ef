//! Types for chart analysis results.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use sizhu_base::{ALL_STEMS, Branch, Element, Stem, UNKNOWN_LABEL};
use sizhu_calendar::Gender;

/// Accumulated weight per element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementScores {
    scores: [u32; 5],
}

impl ElementScores {
    pub fn get(&self, element: Element) -> u32 {
        self.scores[element.index() as usize]
    }

    pub fn add(&mut self, element: Element, weight: u32) {
        self.scores[element.index() as usize] += weight;
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().sum()
    }

    /// `(element, score)` in [`Element::SCORE_ORDER`].
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::SCORE_ORDER.into_iter().map(|e| (e, self.get(e)))
    }

    /// Highest score; ties go to the earliest element in score order.
    pub fn strongest(&self) -> Element {
        let mut best = Element::SCORE_ORDER[0];
        for (e, s) in self.iter() {
            if s > self.get(best) {
                best = e;
            }
        }
        best
    }

    /// Lowest score; ties go to the earliest element in score order.
    pub fn weakest(&self) -> Element {
        let mut best = Element::SCORE_ORDER[0];
        for (e, s) in self.iter() {
            if s < self.get(best) {
                best = e;
            }
        }
        best
    }
}

impl Serialize for ElementScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for (e, s) in self.iter() {
            map.serialize_entry(&e, &s)?;
        }
        map.end()
    }
}

impl Display for ElementScores {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (e, s)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{e}: {s}")?;
        }
        f.write_str("}")
    }
}

/// Accumulated weight per stem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StemScores {
    scores: [u32; 10],
}

impl StemScores {
    pub fn get(&self, stem: Stem) -> u32 {
        self.scores[stem.index() as usize]
    }

    pub fn add(&mut self, stem: Stem, weight: u32) {
        self.scores[stem.index() as usize] += weight;
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().sum()
    }
}

impl Serialize for StemScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(10))?;
        for s in ALL_STEMS {
            map.serialize_entry(&s, &self.get(s))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementAnalysis {
    pub element_scores: ElementScores,
    pub stem_scores: StemScores,
    pub strongest_element: Element,
    pub weakest_element: Element,
    pub total_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthVerdict {
    pub is_strong: bool,
    /// 身強 or 身弱.
    pub description: String,
}

impl StrengthVerdict {
    pub fn from_strong(is_strong: bool) -> Self {
        Self {
            is_strong,
            description: if is_strong { "身強" } else { "身弱" }.to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            is_strong: false,
            description: UNKNOWN_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combinations {
    /// Sandwiched and arched branches between adjacent pillars.
    pub gong_combinations: Vec<Branch>,
    pub repeated_stems: BTreeMap<Stem, u8>,
    pub repeated_branches: BTreeMap<Branch, u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeityDistribution {
    /// Year, month, day, hour; the day entry is the day-master label.
    pub stem_deities: Vec<String>,
    /// Relation of each branch's dominant hidden stem.
    pub branch_deities: Vec<String>,
    /// Frequency of every label except the day-master label.
    pub deity_counts: BTreeMap<String, u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayMasterNature {
    pub stem: Stem,
    pub is_yang: bool,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialStar {
    pub branch: Branch,
    pub description: String,
}

/// Day-master-centred stars found during analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecialStars {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yang_blade: Option<SpecialStar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jiang_xing: Option<SpecialStar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hua_gai: Option<SpecialStar>,
}

impl SpecialStars {
    /// Present stars by key, in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SpecialStar)> {
        [
            ("yang_blade", self.yang_blade.as_ref()),
            ("jiang_xing", self.jiang_xing.as_ref()),
            ("hua_gai", self.hua_gai.as_ref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub lacking_element: Element,
    pub strong_element: Element,
    pub advice: String,
}

/// Full chart analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub wuxing_analysis: ElementAnalysis,
    pub root_analysis: String,
    pub day_master_strength: StrengthVerdict,
    pub combinations: Combinations,
    pub deity_distribution: DeityDistribution,
    pub day_master_nature: DayMasterNature,
    pub special_stars: SpecialStars,
    pub gender: Option<Gender>,
    pub recommendations: Recommendations,
}

/// Minimal analysis kept when the full analysis fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisFallback {
    pub root_analysis: String,
    pub day_master_strength: StrengthVerdict,
    pub day_master: Stem,
    pub gender: Option<Gender>,
}

impl AnalysisFallback {
    pub fn new(day_master: Stem, gender: Option<Gender>) -> Self {
        Self {
            root_analysis: UNKNOWN_LABEL.to_string(),
            day_master_strength: StrengthVerdict::unknown(),
            day_master,
            gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_resolve_in_score_order() {
        let s = ElementScores::default();
        assert_eq!(s.strongest(), Element::Metal);
        assert_eq!(s.weakest(), Element::Metal);

        let mut s = ElementScores::default();
        s.add(Element::Fire, 3);
        s.add(Element::Water, 3);
        assert_eq!(s.strongest(), Element::Water);
        assert_eq!(s.weakest(), Element::Metal);
    }

    #[test]
    fn display_lists_score_order() {
        let mut s = ElementScores::default();
        s.add(Element::Earth, 4);
        assert_eq!(s.to_string(), "{金: 0, 木: 0, 水: 0, 火: 0, 土: 4}");
    }

    #[test]
    fn special_star_iteration_order() {
        let star = |b| SpecialStar {
            branch: b,
            description: String::new(),
        };
        let stars = SpecialStars {
            yang_blade: None,
            jiang_xing: Some(star(Branch::Zi)),
            hua_gai: Some(star(Branch::Chen)),
        };
        let keys: Vec<_> = stars.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["jiang_xing", "hua_gai"]);
        assert!(SpecialStars::default().is_empty());
    }
}
