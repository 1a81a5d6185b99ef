//! Fortune Progression Engine.
//!
//! Expands the calendar service's raw period/year sequence into annotated
//! periods. The first raw period is a transitional stub: it is dropped when
//! the next period starts at age 1, otherwise it is shown with the next
//! period's pair and its own start age.

use std::collections::BTreeSet;

use sizhu_base::{
    Branch, BranchRelation, FourPillars, KnowledgeBase, SexagenaryPair, Stem,
};
use sizhu_calendar::{RawFortunePeriod, RawFortuneYear};
use tracing::debug;

use crate::error::EngineError;
use crate::fortune_types::{CurrentProgression, FortunePeriod, FortuneStub, FortuneYear};
use crate::outcome::Outcome;
use crate::pillar::hidden_stem_details;
use crate::relation::RelationResolver;
use crate::shensha::progression_stars;

/// Net pattern: all four present in the extended chart.
const NET_PATTERN: (&str, [Branch; 4]) = (
    "天羅地網",
    [Branch::Xu, Branch::Hai, Branch::Chen, Branch::Si],
);

/// Four-X patterns: all four present in the extended chart and at least two
/// already natal.
#[rustfmt::skip]
const QUARTET_PATTERNS: [(&str, [Branch; 4]); 3] = [
    ("四生", [Branch::Yin, Branch::Shen, Branch::Si, Branch::Hai]),
    ("四敗", [Branch::Zi, Branch::Wu, Branch::Mao, Branch::You]),
    ("四庫", [Branch::Chen, Branch::Xu, Branch::Chou, Branch::Wei]),
];

/// Natal quartet members required for a four-X pattern.
const QUARTET_NATAL_MIN: usize = 2;

/// Natal context shared by every period of one chart.
struct Natal<'a, 'kb> {
    resolver: &'a RelationResolver<'kb>,
    pillars: &'a FourPillars<SexagenaryPair>,
    pairs: [SexagenaryPair; 4],
    branches: [Branch; 4],
    void: Option<(Branch, Branch)>,
}

impl Natal<'_, '_> {
    fn day_master(&self) -> Stem {
        self.pillars.day_master()
    }

    fn is_void(&self, branch: Branch) -> bool {
        self.void.is_some_and(|(a, b)| branch == a || branch == b)
    }
}

/// Annotate a raw fortune sequence, degrading to stubs on failure.
pub fn build_fortune_periods(
    resolver: &RelationResolver<'_>,
    raw: &[RawFortunePeriod],
    pillars: &FourPillars<SexagenaryPair>,
) -> Outcome<Vec<FortunePeriod>, Vec<FortuneStub>> {
    Outcome::from_result(
        "fortune",
        try_build_fortune_periods(resolver, raw, pillars),
        |e| fortune_stubs(raw, e),
    )
}

fn fortune_stubs(raw: &[RawFortunePeriod], error: &EngineError) -> Vec<FortuneStub> {
    raw.iter()
        .map(|p| FortuneStub {
            start_age: p.start_age,
            ganzhi: p.pair,
            error: format!("detailed analysis failed: {error}"),
        })
        .collect()
}

fn try_build_fortune_periods(
    resolver: &RelationResolver<'_>,
    raw: &[RawFortunePeriod],
    pillars: &FourPillars<SexagenaryPair>,
) -> Result<Vec<FortunePeriod>, EngineError> {
    let natal = Natal {
        resolver,
        pillars,
        pairs: [pillars.year, pillars.month, pillars.day, pillars.hour],
        branches: pillars.branches(),
        void: resolver.kb().void_pair(pillars.day),
    };

    let mut out = Vec::with_capacity(raw.len());
    for (idx, period) in raw.iter().enumerate() {
        let pair = if idx == 0 {
            let next = raw.get(1).ok_or_else(|| {
                EngineError::FortuneSequence("no period after the first".into())
            })?;
            if next.start_age == 1 {
                debug!("first raw period skipped");
                continue;
            }
            next.pair
        } else {
            period.pair
        };
        let pair = pair.ok_or_else(|| {
            EngineError::FortuneSequence(format!("period {idx} has no pair"))
        })?;
        out.push(annotate_period(&natal, pair, period)?);
    }
    Ok(out)
}

fn annotate_period(
    natal: &Natal<'_, '_>,
    pair: SexagenaryPair,
    raw: &RawFortunePeriod,
) -> Result<FortunePeriod, EngineError> {
    let resolver = natal.resolver;
    let kb = resolver.kb();
    let dm = natal.day_master();
    let SexagenaryPair { stem, branch } = pair;

    let hidden_stems = hidden_stem_details(resolver, dm, branch)?;
    let branch_ten_deity = hidden_stems
        .first()
        .map(|h| h.ten_deity.clone())
        .ok_or_else(|| EngineError::missing("hidden-stem", branch))?;

    let mut extended_pairs = natal.pairs.to_vec();
    extended_pairs.push(pair);
    let mut extended_branches = natal.branches.to_vec();
    extended_branches.push(branch);

    let years = raw
        .years
        .iter()
        .map(|y| annotate_year(natal, &extended_pairs, &extended_branches, y))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FortunePeriod {
        start_age: raw.start_age,
        start_year: raw.start_year,
        end_year: raw.end_year,
        ganzhi: pair,
        stem,
        branch,
        stem_ten_deity: resolver.ten_deity(dm, stem),
        branch_ten_deity,
        life_stage: resolver.life_stage(dm, branch),
        stem_polarity: stem.polarity(),
        branch_polarity: branch.polarity(),
        hidden_stems,
        relationships: relationships(kb, branch, &natal.branches),
        is_empty: natal.is_void(branch),
        is_repeated: natal.pillars.contains_pair(pair),
        nayin: resolver.nayin(pair),
        special_combinations: special_combinations(kb, pair, &natal.pairs, &natal.branches),
        years,
    })
}

fn annotate_year(
    natal: &Natal<'_, '_>,
    extended_pairs: &[SexagenaryPair],
    extended_branches: &[Branch],
    raw: &RawFortuneYear,
) -> Result<FortuneYear, EngineError> {
    let resolver = natal.resolver;
    let kb = resolver.kb();
    let dm = natal.day_master();
    let pair = raw.pair;

    let hidden_stems = hidden_stem_details(resolver, dm, pair.branch)?;
    let branch_ten_deity = hidden_stems
        .first()
        .map(|h| h.ten_deity.clone())
        .ok_or_else(|| EngineError::missing("hidden-stem", pair.branch))?;

    Ok(FortuneYear {
        year: raw.year,
        age: raw.age,
        ganzhi: pair,
        stem_ten_deity: resolver.ten_deity(dm, pair.stem),
        branch_ten_deity,
        hidden_stems,
        relationships: relationships(kb, pair.branch, extended_branches),
        is_empty: natal.is_void(pair.branch),
        is_repeated: natal.pillars.contains_pair(pair),
        nayin: resolver.nayin(pair),
        special_combinations: special_combinations(kb, pair, extended_pairs, &natal.branches),
        special_patterns: special_patterns(extended_branches, pair.branch, &natal.branches),
    })
}

/// `"<relation>:<target>"` for every target related to `branch`, breaks excluded.
pub fn relationships(kb: &KnowledgeBase, branch: Branch, targets: &[Branch]) -> Vec<String> {
    let Some(map) = kb.relations_of(branch) else {
        return Vec::new();
    };
    let mut found = BTreeSet::new();
    for target in targets {
        for (relation, related) in map {
            if *relation != BranchRelation::Break && related.contains(target) {
                found.insert(format!("{}:{target}", relation.code()));
            }
        }
    }
    found.into_iter().collect()
}

/// Sandwich (`夾`) and arch (`拱`) combinations of `candidate` with every base
/// pillar sharing its stem. Arch targets already natal are ignored.
pub fn special_combinations(
    kb: &KnowledgeBase,
    candidate: SexagenaryPair,
    bases: &[SexagenaryPair],
    natal_branches: &[Branch],
) -> Vec<String> {
    let mut out = Vec::new();
    for base in bases.iter().filter(|b| b.stem == candidate.stem) {
        if let Some(mid) = candidate.branch.sandwiched_with(base.branch) {
            out.push(format!("夾:{mid}"));
        }
        if let Some(target) = kb
            .arch(base.branch, candidate.branch)
            .filter(|t| !natal_branches.contains(t))
        {
            out.push(format!("拱:{target}"));
        }
    }
    out
}

/// Collective four-branch patterns over the extended chart plus one year branch.
pub fn special_patterns(
    extended_branches: &[Branch],
    year_branch: Branch,
    natal_branches: &[Branch],
) -> Vec<String> {
    let present = |b: &Branch| *b == year_branch || extended_branches.contains(b);
    let label = |name: &str, quartet: &[Branch; 4]| {
        let chars: String = quartet.iter().map(|b| b.as_char()).collect();
        format!("{name}:{chars}")
    };

    let mut out = Vec::new();
    let (net_name, net) = NET_PATTERN;
    if net.iter().all(present) {
        out.push(label(net_name, &net));
    }
    for (name, quartet) in QUARTET_PATTERNS {
        let natal = quartet.iter().filter(|b| natal_branches.contains(b)).count();
        if quartet.iter().all(present) && natal >= QUARTET_NATAL_MIN {
            out.push(label(name, &quartet));
        }
    }
    out
}

/// Period and year covering `as_of_year`, if any.
pub fn current_progression(
    kb: &KnowledgeBase,
    periods: &[FortunePeriod],
    pillars: &FourPillars<SexagenaryPair>,
    as_of_year: i32,
) -> Option<CurrentProgression> {
    let (period, year) = periods
        .iter()
        .find_map(|p| p.year(as_of_year).map(|y| (p, y)))?;
    Some(CurrentProgression {
        as_of_year,
        age: year.age,
        period: period.ganzhi,
        period_start_age: period.start_age,
        period_shensha: progression_stars(kb.shensha(), pillars, period.ganzhi),
        year: year.ganzhi,
        year_shensha: progression_stars(kb.shensha(), pillars, year.ganzhi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(s: &str) -> SexagenaryPair {
        s.parse().unwrap()
    }

    fn natal() -> FourPillars<SexagenaryPair> {
        FourPillars::new(pair("壬午"), pair("癸丑"), pair("戊子"), pair("丁巳"))
    }

    fn raw_period(index: u8, code: Option<&str>, start_age: i32, start_year: i32) -> RawFortunePeriod {
        let end_year = start_year + 9;
        RawFortunePeriod {
            index,
            pair: code.map(pair),
            start_age,
            start_year,
            end_year,
            years: (start_year..=end_year)
                .map(|y| RawFortuneYear {
                    year: y,
                    age: start_age + (y - start_year),
                    pair: SexagenaryPair::from_cycle_index(y as i64 - 4),
                })
                .collect(),
        }
    }

    #[test]
    fn first_period_skipped_when_next_starts_at_one() {
        let kb = KnowledgeBase::standard().unwrap();
        let r = RelationResolver::new(&kb);
        let raw = vec![
            raw_period(0, None, 1, 2003),
            raw_period(1, Some("甲寅"), 1, 2003),
            raw_period(2, Some("乙卯"), 11, 2013),
        ];
        let periods = build_fortune_periods(&r, &raw, &natal()).into_value_or_panic();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].ganzhi, pair("甲寅"));
    }

    #[test]
    fn first_period_kept_with_next_pair() {
        let kb = KnowledgeBase::standard().unwrap();
        let r = RelationResolver::new(&kb);
        let mut first = raw_period(0, None, 1, 2003);
        first.end_year = 2008;
        first.years.truncate(6);
        let raw = vec![
            first,
            raw_period(1, Some("甲寅"), 7, 2009),
            raw_period(2, Some("乙卯"), 17, 2019),
        ];
        let periods = build_fortune_periods(&r, &raw, &natal()).into_value_or_panic();
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].ganzhi, pair("甲寅"));
        assert_eq!(periods[0].start_age, 1);
        assert_eq!(periods[0].years.len(), 6);
        assert_eq!(periods[1].start_age, 7);
    }

    #[test]
    fn missing_pair_degrades_to_stubs() {
        let kb = KnowledgeBase::standard().unwrap();
        let r = RelationResolver::new(&kb);
        let raw = vec![raw_period(0, None, 1, 2003), raw_period(1, None, 7, 2009)];
        let o = build_fortune_periods(&r, &raw, &natal());
        assert!(o.is_degraded());
        let stubs = o.fallback().unwrap();
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[1].start_age, 7);
        assert!(stubs[0].error.starts_with("detailed analysis failed"));
    }

    #[test]
    fn relationships_exclude_break() {
        let kb = KnowledgeBase::standard().unwrap();
        // 子 clashes 午, six-harmony 丑, breaks 酉
        let rels = relationships(&kb, Branch::Zi, &[Branch::Wu, Branch::Chou, Branch::You]);
        assert!(rels.contains(&"冲:午".to_string()));
        assert!(rels.contains(&"六:丑".to_string()));
        assert!(rels.iter().all(|r| !r.starts_with("破")));
    }

    #[test]
    fn sandwich_and_arch() {
        let kb = KnowledgeBase::standard().unwrap();
        // 戊戌 against natal 戊子: index distance 10, sum wraps to 戌
        let got = special_combinations(&kb, pair("戊戌"), &[pair("戊子")], &[Branch::Zi]);
        assert_eq!(got, vec!["夾:戌".to_string()]);
        let got = special_combinations(&kb, pair("辛丑"), &[pair("辛亥")], &[Branch::Hai]);
        assert_eq!(got, vec!["夾:子".to_string()]);
        let got = special_combinations(&kb, pair("丙寅"), &[pair("丙辰")], &[Branch::Chen]);
        assert_eq!(got, vec!["夾:卯".to_string()]);
        // 甲辰 against natal 甲申: arch 子 unless natal
        let got = special_combinations(&kb, pair("甲辰"), &[pair("甲申")], &[Branch::Shen]);
        assert_eq!(got, vec!["拱:子".to_string()]);
        let got = special_combinations(
            &kb,
            pair("甲辰"),
            &[pair("甲申")],
            &[Branch::Shen, Branch::Zi],
        );
        assert!(got.is_empty());
        // different stem: nothing
        assert!(special_combinations(&kb, pair("乙卯"), &[pair("甲申")], &[]).is_empty());
    }

    #[test]
    fn quartet_needs_two_natal_members() {
        let natal = [Branch::Yin, Branch::Shen, Branch::Zi, Branch::Wu];
        let mut extended = natal.to_vec();
        extended.push(Branch::Si);
        assert_eq!(
            special_patterns(&extended, Branch::Hai, &natal),
            vec!["四生:寅申巳亥".to_string()]
        );

        let natal = [Branch::Yin, Branch::Zi, Branch::Zi, Branch::Wu];
        let mut extended = natal.to_vec();
        extended.push(Branch::Shen);
        extended.push(Branch::Si);
        assert!(special_patterns(&extended, Branch::Hai, &natal).is_empty());
    }

    #[test]
    fn net_pattern_needs_only_extended_set() {
        let natal = [Branch::Xu, Branch::Zi, Branch::Zi, Branch::Chen];
        let mut extended = natal.to_vec();
        extended.push(Branch::Hai);
        assert_eq!(
            special_patterns(&extended, Branch::Si, &natal),
            vec!["天羅地網:戌亥辰巳".to_string()]
        );
    }

    #[test]
    fn year_flags() {
        let kb = KnowledgeBase::standard().unwrap();
        let r = RelationResolver::new(&kb);
        let raw = vec![
            raw_period(0, None, 1, 2003),
            raw_period(1, Some("甲寅"), 1, 2003),
        ];
        let periods = build_fortune_periods(&r, &raw, &natal()).into_value_or_panic();
        // 戊子 day: void 午未
        let p = &periods[0];
        let y2012 = p.year(2012).unwrap();
        assert_eq!(y2012.ganzhi, pair("壬辰"));
        assert!(!y2012.is_empty);
        let y2003 = p.year(2003).unwrap();
        assert_eq!(y2003.ganzhi, pair("癸未"));
        assert!(y2003.is_empty);
        assert_eq!(p.stem_ten_deity, "七殺");
        assert!(!p.is_repeated);
        assert!(p.year(2013).is_none());
    }

    trait IntoValueOrPanic<T> {
        fn into_value_or_panic(self) -> T;
    }

    impl<T, F: std::fmt::Debug> IntoValueOrPanic<T> for Outcome<T, F> {
        fn into_value_or_panic(self) -> T {
            match self {
                Outcome::Complete(v) => v,
                Outcome::Degraded { diagnostic, .. } => panic!("degraded: {diagnostic}"),
            }
        }
    }
}
