//! Read-only knowledge base queried by the chart engine.
//!
//! Built once with [`KnowledgeBase::standard`] and shared by reference. All
//! lookups return `Option` so a missing entry surfaces to the caller instead of
//! panicking; the `with_*` / `without_*` methods derive fixture tables for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::branch::{ALL_BRANCHES, Branch, STORAGE_BRANCHES};
use crate::error::BaseError;
use crate::ganzhi::SexagenaryPair;
use crate::knowledge_data::{
    ARCHES, BREAKS, DISPLAY_NAMES, HARMS, HIDDEN_COMBINATIONS, HIDDEN_STEMS, LONG_LIFE, MEETINGS,
    NAYIN, PUNISHMENTS, SIX_HARMONIES, STEM_COMBINATIONS,
};
use crate::relation_types::{BranchRelation, LifeStage, TenDeity};
use crate::shensha_rules::ShenshaRuleSet;
use crate::stem::{ALL_STEMS, Stem};

/// One hidden stem of a branch with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenStemEntry {
    pub stem: Stem,
    pub weight: u8,
}

/// Relationship targets of one branch, by category.
pub type RelationMap = BTreeMap<BranchRelation, Vec<Branch>>;

/// Immutable reference tables.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    hidden_stems: BTreeMap<Branch, Vec<HiddenStemEntry>>,
    ten_deities: HashMap<(Stem, Stem), TenDeity>,
    life_stages: HashMap<(Stem, Branch), LifeStage>,
    partners: BTreeMap<Stem, Stem>,
    nayin: BTreeMap<SexagenaryPair, String>,
    voids: BTreeMap<SexagenaryPair, (Branch, Branch)>,
    display_names: HashMap<String, String>,
    branch_relations: BTreeMap<Branch, RelationMap>,
    arches: BTreeMap<(Branch, Branch), Branch>,
    storage: BTreeSet<Branch>,
    shensha: ShenshaRuleSet,
}

impl KnowledgeBase {
    /// Standard tables with the bundled shensha rule set.
    pub fn standard() -> Result<Self, BaseError> {
        Ok(Self::with_rules(ShenshaRuleSet::bundled()?))
    }

    /// Standard tables with a caller-supplied shensha rule set.
    pub fn with_rules(shensha: ShenshaRuleSet) -> Self {
        let hidden_stems = ALL_BRANCHES
            .into_iter()
            .map(|b| {
                let entries = HIDDEN_STEMS[b.index() as usize]
                    .iter()
                    .map(|&(stem, weight)| HiddenStemEntry { stem, weight })
                    .collect();
                (b, entries)
            })
            .collect();

        let mut ten_deities = HashMap::with_capacity(100);
        let mut life_stages = HashMap::with_capacity(120);
        for dm in ALL_STEMS {
            let dm_ep = (dm.element(), dm.polarity());
            for other in ALL_STEMS {
                ten_deities.insert(
                    (dm, other),
                    TenDeity::classify(dm_ep, (other.element(), other.polarity())),
                );
            }
            let origin = LONG_LIFE[dm.index() as usize].index() as i64;
            for b in ALL_BRANCHES {
                let steps = b.index() as i64 - origin;
                let steps = if dm.polarity().is_yang() { steps } else { -steps };
                life_stages.insert((dm, b), LifeStage::from_index(steps));
            }
        }

        let mut partners = BTreeMap::new();
        for (a, b) in STEM_COMBINATIONS {
            partners.insert(a, b);
            partners.insert(b, a);
        }

        let mut nayin = BTreeMap::new();
        let mut voids = BTreeMap::new();
        for i in 0..60 {
            let pair = SexagenaryPair::from_cycle_index(i);
            nayin.insert(pair, NAYIN[(i / 2) as usize].to_string());
            voids.insert(pair, pair.void_branches());
        }

        let display_names = DISPLAY_NAMES
            .iter()
            .map(|&(raw, shown)| (raw.to_string(), shown.to_string()))
            .collect();

        let mut arches = BTreeMap::new();
        for (a, b, target) in ARCHES {
            arches.insert((a, b), target);
            arches.insert((b, a), target);
        }

        Self {
            hidden_stems,
            ten_deities,
            life_stages,
            partners,
            nayin,
            voids,
            display_names,
            branch_relations: standard_branch_relations(),
            arches,
            storage: STORAGE_BRANCHES.into_iter().collect(),
            shensha,
        }
    }

    /// Ordered hidden stems of a branch (main qi first).
    pub fn hidden_stems(&self, branch: Branch) -> Option<&[HiddenStemEntry]> {
        self.hidden_stems
            .get(&branch)
            .map(Vec::as_slice)
            .filter(|v| !v.is_empty())
    }

    /// Heaviest hidden stem; ties go to the earliest entry.
    pub fn dominant_hidden_stem(&self, branch: Branch) -> Option<Stem> {
        let entries = self.hidden_stems(branch)?;
        let mut best = entries.first()?;
        for e in entries {
            if e.weight > best.weight {
                best = e;
            }
        }
        Some(best.stem)
    }

    /// Raw ten-deity relation of `other` to the day master.
    pub fn ten_deity(&self, day_master: Stem, other: Stem) -> Option<TenDeity> {
        self.ten_deities.get(&(day_master, other)).copied()
    }

    /// Raw life stage of the day master in `branch`.
    pub fn life_stage(&self, day_master: Stem, branch: Branch) -> Option<LifeStage> {
        self.life_stages.get(&(day_master, branch)).copied()
    }

    /// Branch in which the day master reaches `stage`.
    pub fn stage_branch(&self, day_master: Stem, stage: LifeStage) -> Option<Branch> {
        ALL_BRANCHES
            .into_iter()
            .find(|&b| self.life_stage(day_master, b) == Some(stage))
    }

    /// Stem that combines with `stem` (甲己, 乙庚, ...).
    pub fn combining_partner(&self, stem: Stem) -> Option<Stem> {
        self.partners.get(&stem).copied()
    }

    /// Raw nayin name of a pair.
    pub fn nayin(&self, pair: SexagenaryPair) -> Option<&str> {
        self.nayin.get(&pair).map(String::as_str)
    }

    /// The two void branches for a day pair.
    pub fn void_pair(&self, pair: SexagenaryPair) -> Option<(Branch, Branch)> {
        self.voids.get(&pair).copied()
    }

    /// Public label for a raw code; unmapped codes pass through.
    pub fn display_name<'a>(&'a self, raw: &'a str) -> &'a str {
        self.display_names.get(raw).map_or(raw, String::as_str)
    }

    /// Relationship targets of a branch.
    pub fn relations_of(&self, branch: Branch) -> Option<&RelationMap> {
        self.branch_relations.get(&branch)
    }

    /// Arched branch for an ordered pair.
    pub fn arch(&self, first: Branch, second: Branch) -> Option<Branch> {
        self.arches.get(&(first, second)).copied()
    }

    pub fn is_storage(&self, branch: Branch) -> bool {
        self.storage.contains(&branch)
    }

    pub fn shensha(&self) -> &ShenshaRuleSet {
        &self.shensha
    }

    pub fn with_hidden_stems(mut self, branch: Branch, entries: Vec<HiddenStemEntry>) -> Self {
        self.hidden_stems.insert(branch, entries);
        self
    }

    pub fn without_hidden_stems(mut self, branch: Branch) -> Self {
        self.hidden_stems.remove(&branch);
        self
    }

    pub fn without_ten_deity(mut self, day_master: Stem, other: Stem) -> Self {
        self.ten_deities.remove(&(day_master, other));
        self
    }

    pub fn without_life_stage(mut self, day_master: Stem, branch: Branch) -> Self {
        self.life_stages.remove(&(day_master, branch));
        self
    }

    pub fn without_nayin(mut self, pair: SexagenaryPair) -> Self {
        self.nayin.remove(&pair);
        self
    }

    pub fn with_display_name(mut self, raw: &str, shown: &str) -> Self {
        self.display_names.insert(raw.to_string(), shown.to_string());
        self
    }

    pub fn with_shensha_rules(mut self, rules: ShenshaRuleSet) -> Self {
        self.shensha = rules;
        self
    }
}

fn standard_branch_relations() -> BTreeMap<Branch, RelationMap> {
    let mut table: BTreeMap<Branch, RelationMap> = BTreeMap::new();
    let mut add = |from: Branch, kind: BranchRelation, to: Branch| {
        let targets = table.entry(from).or_default().entry(kind).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    };

    for b in ALL_BRANCHES {
        add(b, BranchRelation::Clash, b.offset(6));
        for other in b.triad() {
            if other != b {
                add(b, BranchRelation::TripleHarmony, other);
            }
        }
    }
    for (punisher, punished) in PUNISHMENTS {
        add(punisher, BranchRelation::Punishes, punished);
        add(punished, BranchRelation::PunishedBy, punisher);
    }
    for group in MEETINGS {
        for a in group {
            for b in group {
                if a != b {
                    add(a, BranchRelation::Meeting, b);
                }
            }
        }
    }
    let symmetric = [
        (BranchRelation::Harm, &HARMS[..]),
        (BranchRelation::Break, &BREAKS[..]),
        (BranchRelation::SixHarmony, &SIX_HARMONIES[..]),
        (BranchRelation::HiddenCombination, &HIDDEN_COMBINATIONS[..]),
    ];
    for (kind, pairs) in symmetric {
        for &(a, b) in pairs {
            add(a, kind, b);
            add(b, kind, a);
        }
    }
    table
}
