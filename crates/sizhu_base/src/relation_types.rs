//! Relation categories: ten deities, life stages, branch relationships.
//!
//! Each category has a raw single-character code. Public labels are obtained by
//! passing the code through the knowledge base's display-name table.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::element::{Element, Polarity};

/// Relation of a stem to the day master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TenDeity {
    /// Same element, same polarity.
    Peer,
    /// Same element, opposite polarity.
    Rival,
    /// Produced by the day master, same polarity.
    Eating,
    /// Produced by the day master, opposite polarity.
    Hurting,
    /// Controlled by the day master, same polarity.
    IndirectWealth,
    /// Controlled by the day master, opposite polarity.
    DirectWealth,
    /// Controls the day master, same polarity.
    SevenKillings,
    /// Controls the day master, opposite polarity.
    DirectOfficer,
    /// Produces the day master, same polarity.
    IndirectSeal,
    /// Produces the day master, opposite polarity.
    DirectSeal,
}

pub const ALL_TEN_DEITIES: [TenDeity; 10] = [
    TenDeity::Peer,
    TenDeity::Rival,
    TenDeity::Eating,
    TenDeity::Hurting,
    TenDeity::IndirectWealth,
    TenDeity::DirectWealth,
    TenDeity::SevenKillings,
    TenDeity::DirectOfficer,
    TenDeity::IndirectSeal,
    TenDeity::DirectSeal,
];

impl TenDeity {
    /// Classify `other` (element, polarity) against the day master's.
    pub fn classify(dm: (Element, Polarity), other: (Element, Polarity)) -> Self {
        let same_polarity = matches!(
            (dm.1, other.1),
            (Polarity::Yang, Polarity::Yang) | (Polarity::Yin, Polarity::Yin)
        );
        let (de, oe) = (dm.0.index(), other.0.index());
        let pick = |same: TenDeity, diff: TenDeity| if same_polarity { same } else { diff };
        if de == oe {
            pick(Self::Peer, Self::Rival)
        } else if dm.0.produces().index() == oe {
            pick(Self::Eating, Self::Hurting)
        } else if dm.0.controls().index() == oe {
            pick(Self::IndirectWealth, Self::DirectWealth)
        } else if other.0.controls().index() == de {
            pick(Self::SevenKillings, Self::DirectOfficer)
        } else {
            pick(Self::IndirectSeal, Self::DirectSeal)
        }
    }

    /// Raw internal code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Peer => "比",
            Self::Rival => "劫",
            Self::Eating => "食",
            Self::Hurting => "伤",
            Self::IndirectWealth => "才",
            Self::DirectWealth => "财",
            Self::SevenKillings => "杀",
            Self::DirectOfficer => "官",
            Self::IndirectSeal => "枭",
            Self::DirectSeal => "印",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ALL_TEN_DEITIES.into_iter().find(|d| d.code() == code)
    }
}

impl Display for TenDeity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Twelve-stage life cycle of a stem through the branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum LifeStage {
    LongLife,
    Bathing,
    CapAndBelt,
    Established,
    Peak,
    Decline,
    Sickness,
    Death,
    Tomb,
    Extinction,
    Womb,
    Nurture,
}

/// Life stages in cycle order.
pub const ALL_LIFE_STAGES: [LifeStage; 12] = [
    LifeStage::LongLife,
    LifeStage::Bathing,
    LifeStage::CapAndBelt,
    LifeStage::Established,
    LifeStage::Peak,
    LifeStage::Decline,
    LifeStage::Sickness,
    LifeStage::Death,
    LifeStage::Tomb,
    LifeStage::Extinction,
    LifeStage::Womb,
    LifeStage::Nurture,
];

impl LifeStage {
    pub const fn index(self) -> u8 {
        match self {
            Self::LongLife => 0,
            Self::Bathing => 1,
            Self::CapAndBelt => 2,
            Self::Established => 3,
            Self::Peak => 4,
            Self::Decline => 5,
            Self::Sickness => 6,
            Self::Death => 7,
            Self::Tomb => 8,
            Self::Extinction => 9,
            Self::Womb => 10,
            Self::Nurture => 11,
        }
    }

    pub const fn from_index(i: i64) -> Self {
        ALL_LIFE_STAGES[i.rem_euclid(12) as usize]
    }

    /// Raw internal code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::LongLife => "长",
            Self::Bathing => "沐",
            Self::CapAndBelt => "冠",
            Self::Established => "建",
            Self::Peak => "帝",
            Self::Decline => "衰",
            Self::Sickness => "病",
            Self::Death => "死",
            Self::Tomb => "库",
            Self::Extinction => "绝",
            Self::Womb => "胎",
            Self::Nurture => "养",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ALL_LIFE_STAGES.into_iter().find(|s| s.code() == code)
    }

    /// Stages in which the day master counts as rooted.
    pub const fn is_rooted(self) -> bool {
        matches!(self, Self::LongLife | Self::Peak | Self::Established)
    }
}

impl Display for LifeStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Relationship between two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BranchRelation {
    #[serde(rename = "冲")]
    Clash,
    #[serde(rename = "刑")]
    Punishes,
    #[serde(rename = "被刑")]
    PunishedBy,
    #[serde(rename = "合")]
    TripleHarmony,
    #[serde(rename = "会")]
    Meeting,
    #[serde(rename = "害")]
    Harm,
    #[serde(rename = "破")]
    Break,
    #[serde(rename = "六")]
    SixHarmony,
    #[serde(rename = "暗")]
    HiddenCombination,
}

pub const ALL_BRANCH_RELATIONS: [BranchRelation; 9] = [
    BranchRelation::Clash,
    BranchRelation::Punishes,
    BranchRelation::PunishedBy,
    BranchRelation::TripleHarmony,
    BranchRelation::Meeting,
    BranchRelation::Harm,
    BranchRelation::Break,
    BranchRelation::SixHarmony,
    BranchRelation::HiddenCombination,
];

impl BranchRelation {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Clash => "冲",
            Self::Punishes => "刑",
            Self::PunishedBy => "被刑",
            Self::TripleHarmony => "合",
            Self::Meeting => "会",
            Self::Harm => "害",
            Self::Break => "破",
            Self::SixHarmony => "六",
            Self::HiddenCombination => "暗",
        }
    }
}

impl Display for BranchRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
