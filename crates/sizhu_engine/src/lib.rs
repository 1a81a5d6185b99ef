//! Four Pillars (BaZi) chart engine.
//!
//! Given a birth moment, [`ChartEngine`] produces the four natal pillars with
//! their derived attributes, the star (shensha) lists, the five-element
//! analysis and the fortune periods with their fortune years. A second entry
//! point analyses four ganzhi codes without any calendar work.
//!
//! Component failures never abort a chart: each section is wrapped in an
//! [`Outcome`] that is either complete or carries a fallback and a diagnostic.

pub mod analysis;
pub mod analysis_types;
pub mod chart;
pub mod chart_types;
pub mod config;
pub mod error;
pub mod fortune;
pub mod fortune_types;
pub mod outcome;
pub mod pillar;
pub mod relation;
pub mod shensha;
pub mod summary;

pub use analysis::analyze;
pub use analysis_types::{
    Analysis, AnalysisFallback, Combinations, DayMasterNature, DeityDistribution,
    ElementAnalysis, ElementScores, Recommendations, SpecialStar, SpecialStars, StemScores,
    StrengthVerdict,
};
pub use chart::ChartEngine;
pub use chart_types::{ChartResult, EmptyPositions, PillarsAnalysis};
pub use config::{DEFAULT_CHILD_AGE_LIMIT, EngineConfig};
pub use error::{ChartError, EngineError};
pub use fortune::build_fortune_periods;
pub use fortune_types::{CurrentProgression, FortunePeriod, FortuneStub, FortuneYear};
pub use outcome::Outcome;
pub use pillar::{HiddenStemDetail, Pillar, build_pillar};
pub use relation::RelationResolver;
pub use shensha::{ShenshaEngine, StarLists};
pub use summary::{ChartSummary, summary_text};
