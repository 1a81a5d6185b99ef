//! Result types of the two chart entry points.

use serde::Serialize;
use sizhu_base::{Branch, FourPillars};
use sizhu_calendar::Gender;

use crate::analysis_types::{Analysis, AnalysisFallback};
use crate::fortune_types::{CurrentProgression, FortunePeriod, FortuneStub};
use crate::outcome::Outcome;
use crate::pillar::Pillar;
use crate::shensha::StarLists;

/// Void branches of the day pair and where they occur in the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyPositions {
    pub empty_pair: Vec<Branch>,
    /// Natal branches in the void pair, in pillar order.
    pub empty_in_chart: Vec<Branch>,
    pub count: usize,
}

/// Full chart for a birth moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    /// `2003年1月15日`.
    pub solar_date: String,
    /// `2002年12月13日`; leap months carry a `閏` prefix.
    pub lunar_date: String,
    pub gender: Gender,
    pub pillars: FourPillars<Outcome<Pillar>>,
    pub nayin: FourPillars<String>,
    pub empty_positions: EmptyPositions,
    pub shensha: Outcome<StarLists>,
    pub analysis: Outcome<Analysis, AnalysisFallback>,
    pub fortune_periods: Outcome<Vec<FortunePeriod>, Vec<FortuneStub>>,
    /// Present when an evaluation year was supplied and a period covers it.
    pub current_progression: Option<CurrentProgression>,
}

/// Chart analysis for four supplied pillars, without calendar context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarsAnalysis {
    pub pillars: FourPillars<Outcome<Pillar>>,
    pub nayin: FourPillars<String>,
    pub empty_positions: EmptyPositions,
    pub shensha: Outcome<StarLists>,
    pub analysis: Outcome<Analysis, AnalysisFallback>,
    /// Always empty: no birth moment, no fortune periods.
    pub fortune_periods: Vec<FortunePeriod>,
    pub summary: String,
}
