//! Relation Resolver: ten-deity and life-stage labels relative to the day master.
//!
//! Lookups never fail: a missing knowledge-base entry resolves to
//! [`UNKNOWN_LABEL`]. Raw codes go through the display-name remap.

use serde::Serializer;
use sizhu_base::{
    Branch, HiddenStemEntry, KnowledgeBase, LifeStage, SexagenaryPair, Stem, TenDeity,
    UNKNOWN_LABEL,
};

use crate::error::EngineError;

/// Label resolver bound to one knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct RelationResolver<'kb> {
    kb: &'kb KnowledgeBase,
}

impl<'kb> RelationResolver<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn kb(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    /// Public ten-deity label of `other` relative to `day_master`.
    ///
    /// `ten_deity(s, s)` is the peer label, not the day-master label; only the
    /// pillar builder substitutes [`DAY_MASTER_LABEL`](sizhu_base::DAY_MASTER_LABEL).
    pub fn ten_deity(&self, day_master: Stem, other: Stem) -> String {
        match self.kb.ten_deity(day_master, other) {
            Some(d) => self.kb.display_name(d.code()).to_string(),
            None => UNKNOWN_LABEL.to_string(),
        }
    }

    /// Ten-deity label of a branch: the relation of its main hidden stem.
    pub fn branch_ten_deity(&self, day_master: Stem, branch: Branch) -> String {
        match self.kb.hidden_stems(branch).and_then(|h| h.first()) {
            Some(main) => self.ten_deity(day_master, main.stem),
            None => UNKNOWN_LABEL.to_string(),
        }
    }

    /// Public life-stage label of `day_master` in `branch`.
    pub fn life_stage(&self, day_master: Stem, branch: Branch) -> String {
        match self.kb.life_stage(day_master, branch) {
            Some(s) => self.kb.display_name(s.code()).to_string(),
            None => UNKNOWN_LABEL.to_string(),
        }
    }

    /// Public nayin label of a pair.
    pub fn nayin(&self, pair: SexagenaryPair) -> String {
        match self.kb.nayin(pair) {
            Some(raw) => self.kb.display_name(raw).to_string(),
            None => UNKNOWN_LABEL.to_string(),
        }
    }

    pub fn raw_ten_deity(&self, day_master: Stem, other: Stem) -> Result<TenDeity, EngineError> {
        self.kb
            .ten_deity(day_master, other)
            .ok_or_else(|| EngineError::missing("ten-deity", format!("{day_master}{other}")))
    }

    pub fn raw_life_stage(&self, day_master: Stem, branch: Branch) -> Result<LifeStage, EngineError> {
        self.kb
            .life_stage(day_master, branch)
            .ok_or_else(|| EngineError::missing("life-stage", format!("{day_master}{branch}")))
    }

    /// Hidden stems of a branch; an empty or missing entry is an error.
    pub fn hidden_stems(&self, branch: Branch) -> Result<&'kb [HiddenStemEntry], EngineError> {
        self.kb
            .hidden_stems(branch)
            .ok_or_else(|| EngineError::missing("hidden-stem", branch))
    }

    pub fn dominant_hidden_stem(&self, branch: Branch) -> Result<Stem, EngineError> {
        self.kb
            .dominant_hidden_stem(branch)
            .ok_or_else(|| EngineError::missing("hidden-stem", branch))
    }

    /// Element-score contributions of a branch: `(stem, weight)` per hidden stem.
    pub fn element_contributions(
        &self,
        branch: Branch,
    ) -> Result<impl Iterator<Item = (Stem, u32)> + 'kb, EngineError> {
        Ok(self
            .hidden_stems(branch)?
            .iter()
            .map(|e| (e.stem, u32::from(e.weight))))
    }
}

/// Serialize `None` as the unknown label.
pub(crate) fn unknown_if_none<T, S>(value: &Option<T>, s: S) -> Result<S::Ok, S::Error>
where
    T: serde::Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(s),
        None => s.serialize_str(UNKNOWN_LABEL),
    }
}
