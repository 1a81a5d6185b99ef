//! Cyclic alphabet and reference tables for Four Pillars (sizhu / bazi) charts.
//!
//! This crate provides:
//! - Heavenly stems, earthly branches, elements and polarity
//! - Sexagenary pairs and the named four-pillar record
//! - Ten-deity, life-stage and branch-relationship categories
//! - The read-only [`KnowledgeBase`] and typed shensha rule families

pub mod branch;
pub mod element;
pub mod error;
pub mod ganzhi;
pub mod knowledge;
mod knowledge_data;
pub mod pillars;
pub mod relation_types;
pub mod shensha_rules;
pub mod stem;

pub use branch::{ALL_BRANCHES, Branch, STORAGE_BRANCHES};
pub use element::{ALL_ELEMENTS, Element, Polarity};
pub use error::BaseError;
pub use ganzhi::{CYCLE_LEN, Facet, SexagenaryPair, Symbol};
pub use knowledge::{HiddenStemEntry, KnowledgeBase, RelationMap};
pub use pillars::{ALL_SLOTS, FourPillars, PillarSlot};
pub use relation_types::{
    ALL_BRANCH_RELATIONS, ALL_LIFE_STAGES, ALL_TEN_DEITIES, BranchRelation, LifeStage, TenDeity,
};
pub use shensha_rules::{
    ChildRule, CompoundRule, GeneralRule, PillarRef, ShenshaRule, ShenshaRuleSet,
};
pub use stem::{ALL_STEMS, Stem};

/// Label used for the day pillar's own stem.
pub const DAY_MASTER_LABEL: &str = "日主";

/// Label returned when a knowledge-base lookup misses.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Root analysis label when no branch roots the day master.
pub const NO_ROOT_LABEL: &str = "無根";
