//! Chart entry points.
//!
//! [`ChartEngine`] wires the calendar service and the knowledge base into the
//! engine components. Only calendar failures and malformed inputs abort a
//! computation; every component failure degrades its own section.

use sizhu_base::{FourPillars, KnowledgeBase, PillarSlot, SexagenaryPair};
use sizhu_calendar::{AstronomicalCalendar, BirthInput, CalendarService};
use tracing::debug;

use crate::analysis::analyze;
use crate::chart_types::{ChartResult, EmptyPositions, PillarsAnalysis};
use crate::config::EngineConfig;
use crate::error::ChartError;
use crate::fortune::{build_fortune_periods, current_progression};
use crate::outcome::Outcome;
use crate::pillar::{Pillar, build_pillar};
use crate::relation::RelationResolver;
use crate::shensha::{ShenshaEngine, StarLists};
use crate::summary::summary_text;

/// Sections shared by both entry points.
struct NatalSections {
    pillars: FourPillars<Outcome<Pillar>>,
    nayin: FourPillars<String>,
    empty_positions: EmptyPositions,
    shensha: Outcome<StarLists>,
}

/// Chart engine over a calendar service and a shared knowledge base.
#[derive(Debug, Clone)]
pub struct ChartEngine<'kb, C> {
    kb: &'kb KnowledgeBase,
    calendar: C,
    config: EngineConfig,
    as_of_year: Option<i32>,
}

impl<'kb> ChartEngine<'kb, AstronomicalCalendar> {
    /// Engine over the bundled astronomical calendar.
    pub fn astronomical(kb: &'kb KnowledgeBase, config: EngineConfig) -> Result<Self, ChartError> {
        let calendar = AstronomicalCalendar::new(config.calendar_config())?;
        Self::new(kb, calendar, config)
    }
}

impl<'kb, C: CalendarService> ChartEngine<'kb, C> {
    pub fn new(kb: &'kb KnowledgeBase, calendar: C, config: EngineConfig) -> Result<Self, ChartError> {
        config.validate()?;
        Ok(Self {
            kb,
            calendar,
            config,
            as_of_year: None,
        })
    }

    /// Evaluation year for the child rules and the current progression.
    pub fn with_as_of_year(mut self, year: i32) -> Self {
        self.as_of_year = Some(year);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Full chart for a birth moment. Fails only on calendar errors.
    pub fn compute_from_birth_moment(&self, input: &BirthInput) -> Result<ChartResult, ChartError> {
        let _span = tracing::debug_span!(
            "chart",
            year = input.year,
            month = input.month,
            day = input.day,
            hour = input.hour,
            lunar = input.is_lunar
        )
        .entered();

        let moment = self.calendar.resolve(input)?;
        let pillars = self.calendar.four_pillars(moment.solar)?;
        let raw_periods = self.calendar.fortune_sequence(moment.solar, input.gender)?;
        debug!(
            year = %pillars.year,
            month = %pillars.month,
            day = %pillars.day,
            hour = %pillars.hour,
            "pillars resolved"
        );

        let include_child = self
            .as_of_year
            .is_some_and(|y| y - input.year < self.config.child_age_limit);
        let resolver = RelationResolver::new(self.kb);
        let natal = self.natal_sections(&resolver, &pillars, include_child);
        let fortune_periods = build_fortune_periods(&resolver, &raw_periods, &pillars);
        let current = match (self.as_of_year, fortune_periods.complete()) {
            (Some(year), Some(periods)) => current_progression(self.kb, periods, &pillars, year),
            _ => None,
        };

        Ok(ChartResult {
            solar_date: moment.solar_label(),
            lunar_date: moment.lunar_label(),
            gender: input.gender,
            pillars: natal.pillars,
            nayin: natal.nayin,
            empty_positions: natal.empty_positions,
            shensha: natal.shensha,
            analysis: analyze(&resolver, &pillars, Some(input.gender)),
            fortune_periods,
            current_progression: current,
        })
    }

    /// Analysis of four 2-character ganzhi codes. No calendar call, no fortune
    /// periods and no child rules, so the output depends only on the codes.
    pub fn compute_from_pillars(
        &self,
        year: &str,
        month: &str,
        day: &str,
        hour: &str,
    ) -> Result<PillarsAnalysis, ChartError> {
        let parse = |code: &str| {
            code.parse::<SexagenaryPair>()
                .map_err(|_| ChartError::InvalidGanzhi(code.to_string()))
        };
        let pillars = FourPillars::new(parse(year)?, parse(month)?, parse(day)?, parse(hour)?);
        let _span = tracing::debug_span!("pillars", day = %pillars.day).entered();

        let resolver = RelationResolver::new(self.kb);
        let natal = self.natal_sections(&resolver, &pillars, false);
        let analysis = analyze(&resolver, &pillars, None);
        let summary = summary_text(&pillars, &analysis);

        Ok(PillarsAnalysis {
            pillars: natal.pillars,
            nayin: natal.nayin,
            empty_positions: natal.empty_positions,
            shensha: natal.shensha,
            analysis,
            fortune_periods: Vec::new(),
            summary,
        })
    }

    fn natal_sections(
        &self,
        resolver: &RelationResolver<'_>,
        pillars: &FourPillars<SexagenaryPair>,
        include_child: bool,
    ) -> NatalSections {
        let dm = pillars.day_master();
        let mut built = pillars
            .by_ref()
            .map(|slot, pair| build_pillar(resolver, *pair, dm, slot == PillarSlot::Day));
        let shensha = ShenshaEngine::new(self.kb.shensha()).apply(pillars, include_child);
        for (slot, stars) in shensha.value().entries() {
            built.get_mut(slot).value_mut().shensha = stars.clone();
        }

        NatalSections {
            pillars: built,
            nayin: pillars.by_ref().map(|_, pair| resolver.nayin(*pair)),
            empty_positions: empty_positions(self.kb, pillars),
            shensha,
        }
    }
}

/// Void pair of the day pillar and its occurrences among the natal branches.
pub fn empty_positions(kb: &KnowledgeBase, pillars: &FourPillars<SexagenaryPair>) -> EmptyPositions {
    let Some((a, b)) = kb.void_pair(pillars.day) else {
        return EmptyPositions::default();
    };
    let empty_in_chart: Vec<_> = pillars
        .branches()
        .into_iter()
        .filter(|x| *x == a || *x == b)
        .collect();
    EmptyPositions {
        empty_pair: vec![a, b],
        count: empty_in_chart.len(),
        empty_in_chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizhu_base::Branch;

    #[test]
    fn empty_positions_of_day_pair() {
        let kb = KnowledgeBase::standard().unwrap();
        let [y, m, d, h] = ["壬午", "癸丑", "戊子", "丁巳"].map(|c| c.parse::<SexagenaryPair>().unwrap());
        let e = empty_positions(&kb, &FourPillars::new(y, m, d, h));
        assert_eq!(e.empty_pair, vec![Branch::Wu, Branch::Wei]);
        assert_eq!(e.empty_in_chart, vec![Branch::Wu]);
        assert_eq!(e.count, 1);
    }

    #[test]
    fn rejects_malformed_code() {
        let kb = KnowledgeBase::standard().unwrap();
        let engine = ChartEngine::astronomical(&kb, EngineConfig::default()).unwrap();
        let err = engine
            .compute_from_pillars("甲子", "乙", "丙寅", "丁卯")
            .unwrap_err();
        assert_eq!(err, ChartError::InvalidGanzhi("乙".into()));
    }
}
