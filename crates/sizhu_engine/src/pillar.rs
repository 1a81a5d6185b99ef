//! Pillar Builder: one pillar annotated relative to the day master.

use serde::Serialize;
use sizhu_base::{
    Branch, DAY_MASTER_LABEL, Element, SexagenaryPair, Stem, UNKNOWN_LABEL,
};

use crate::error::EngineError;
use crate::outcome::Outcome;
use crate::relation::{RelationResolver, unknown_if_none};

/// Marker stored in [`Pillar::harmony`] when the stem combines with a hidden stem.
pub const HARMONY_MARKER: &str = "|";

/// One hidden stem annotated against the day master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenStemDetail {
    pub stem: Stem,
    pub element: Element,
    pub ten_deity: String,
    pub weight: u8,
}

/// A fully annotated pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pillar {
    pub ganzhi: SexagenaryPair,
    pub stem: Stem,
    pub branch: Branch,
    #[serde(serialize_with = "unknown_if_none")]
    pub stem_element: Option<Element>,
    /// Element of the branch's main hidden stem.
    #[serde(serialize_with = "unknown_if_none")]
    pub branch_element: Option<Element>,
    pub ten_deity: String,
    pub branch_ten_deity: String,
    pub life_stage: String,
    pub hidden_stems: Vec<HiddenStemDetail>,
    pub nayin: String,
    pub harmony: String,
    pub is_treasury: bool,
    pub shensha: Vec<String>,
}

impl Pillar {
    /// All-unknown pillar used when building fails.
    pub fn fallback(pair: SexagenaryPair) -> Self {
        Self {
            ganzhi: pair,
            stem: pair.stem,
            branch: pair.branch,
            stem_element: None,
            branch_element: None,
            ten_deity: UNKNOWN_LABEL.to_string(),
            branch_ten_deity: UNKNOWN_LABEL.to_string(),
            life_stage: UNKNOWN_LABEL.to_string(),
            hidden_stems: Vec::new(),
            nayin: UNKNOWN_LABEL.to_string(),
            harmony: String::new(),
            is_treasury: false,
            shensha: Vec::new(),
        }
    }
}

/// Hidden stems of `branch` with element, deity and weight.
pub fn hidden_stem_details(
    resolver: &RelationResolver<'_>,
    day_master: Stem,
    branch: Branch,
) -> Result<Vec<HiddenStemDetail>, EngineError> {
    Ok(resolver
        .hidden_stems(branch)?
        .iter()
        .map(|e| HiddenStemDetail {
            stem: e.stem,
            element: e.stem.element(),
            ten_deity: resolver.ten_deity(day_master, e.stem),
            weight: e.weight,
        })
        .collect())
}

/// Build one pillar, or fall back to [`Pillar::fallback`] with a diagnostic.
pub fn build_pillar(
    resolver: &RelationResolver<'_>,
    pair: SexagenaryPair,
    day_master: Stem,
    is_day_pillar: bool,
) -> Outcome<Pillar> {
    Outcome::from_result(
        "pillar",
        try_build_pillar(resolver, pair, day_master, is_day_pillar),
        |_| Pillar::fallback(pair),
    )
}

fn try_build_pillar(
    resolver: &RelationResolver<'_>,
    pair: SexagenaryPair,
    day_master: Stem,
    is_day_pillar: bool,
) -> Result<Pillar, EngineError> {
    let kb = resolver.kb();
    let SexagenaryPair { stem, branch } = pair;

    let hidden_stems = hidden_stem_details(resolver, day_master, branch)?;
    let main = hidden_stems
        .first()
        .ok_or_else(|| EngineError::missing("hidden-stem", branch))?;
    let partner = kb
        .combining_partner(stem)
        .ok_or_else(|| EngineError::missing("stem-combination", stem))?;

    let ten_deity = if is_day_pillar {
        DAY_MASTER_LABEL.to_string()
    } else {
        resolver.ten_deity(day_master, stem)
    };
    let harmony = if hidden_stems.iter().any(|h| h.stem == partner) {
        HARMONY_MARKER.to_string()
    } else {
        String::new()
    };

    Ok(Pillar {
        ganzhi: pair,
        stem,
        branch,
        stem_element: Some(stem.element()),
        branch_element: Some(main.element),
        ten_deity,
        branch_ten_deity: main.ten_deity.clone(),
        life_stage: resolver.life_stage(day_master, branch),
        nayin: resolver.nayin(pair),
        harmony,
        is_treasury: kb.is_storage(branch),
        hidden_stems,
        shensha: Vec::new(),
    })
}
