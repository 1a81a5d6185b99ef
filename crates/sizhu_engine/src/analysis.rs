//! Chart Analyzer: element balance, day-master strength, deity distribution,
//! roots, combinations and day-master-centred special stars.

use std::collections::BTreeMap;

use sizhu_base::{
    Branch, DAY_MASTER_LABEL, FourPillars, KnowledgeBase, LifeStage, NO_ROOT_LABEL, PillarSlot,
    SexagenaryPair, Stem, TenDeity,
};
use sizhu_calendar::Gender;

use crate::analysis_types::{
    Analysis, AnalysisFallback, Combinations, DayMasterNature, DeityDistribution,
    ElementAnalysis, ElementScores, Recommendations, SpecialStar, SpecialStars, StemScores,
    StrengthVerdict,
};
use crate::error::EngineError;
use crate::outcome::Outcome;
use crate::relation::RelationResolver;

/// Weight of each visible stem in the element scores.
pub const STEM_WEIGHT: u32 = 5;

/// Peer and tomb hits above which a rootless day master still counts as strong.
const PEER_TOMB_THRESHOLD: usize = 2;

const YANG_BLADE_TEXT: &str = "羊刃重重又見祿，富貴饒金玉";
const JIANG_XING_TEXT: &str = "將星: 常欲吉星相扶，貴煞加臨乃為吉慶";
const HUA_GAI_TEXT: &str = "華蓋: 多主孤寡，總貴亦不免孤獨，作僧道藝術論";

/// Analyze a chart, degrading to [`AnalysisFallback`] on any failure.
pub fn analyze(
    resolver: &RelationResolver<'_>,
    pillars: &FourPillars<SexagenaryPair>,
    gender: Option<Gender>,
) -> Outcome<Analysis, AnalysisFallback> {
    Outcome::from_result("analysis", try_analyze(resolver, pillars, gender), |_| {
        AnalysisFallback::new(pillars.day_master(), gender)
    })
}

fn try_analyze(
    resolver: &RelationResolver<'_>,
    pillars: &FourPillars<SexagenaryPair>,
    gender: Option<Gender>,
) -> Result<Analysis, EngineError> {
    let dm = pillars.day_master();
    let (scores, stem_scores) = element_scores(resolver, pillars)?;
    let strongest = scores.strongest();
    let weakest = scores.weakest();

    Ok(Analysis {
        wuxing_analysis: ElementAnalysis {
            element_scores: scores,
            stem_scores,
            strongest_element: strongest,
            weakest_element: weakest,
            total_score: scores.total(),
        },
        root_analysis: root_analysis(resolver, dm, &pillars.branches())?,
        day_master_strength: StrengthVerdict::from_strong(is_strong(resolver, pillars)?),
        combinations: Combinations {
            gong_combinations: gong_combinations(resolver.kb(), &pillars.branches()),
            repeated_stems: repeated(pillars.stems()),
            repeated_branches: repeated(pillars.branches()),
        },
        deity_distribution: deity_distribution(resolver, pillars)?,
        day_master_nature: DayMasterNature {
            stem: dm,
            is_yang: dm.polarity().is_yang(),
            element: dm.element(),
        },
        special_stars: special_stars(resolver.kb(), pillars),
        gender,
        recommendations: Recommendations {
            lacking_element: weakest,
            strong_element: strongest,
            advice: format!("五行缺{weakest}，建議多接觸{weakest}相關的事物"),
        },
    })
}

/// Element and stem scores: 5 per visible stem, plus hidden-stem weights of
/// every branch, with the month branch counted a second time.
pub fn element_scores(
    resolver: &RelationResolver<'_>,
    pillars: &FourPillars<SexagenaryPair>,
) -> Result<(ElementScores, StemScores), EngineError> {
    let mut elements = ElementScores::default();
    let mut stems = StemScores::default();
    for stem in pillars.stems() {
        elements.add(stem.element(), STEM_WEIGHT);
        stems.add(stem, STEM_WEIGHT);
    }
    let branches = pillars.branches();
    for branch in branches.iter().chain([&pillars.month.branch]) {
        for (stem, weight) in resolver.element_contributions(*branch)? {
            elements.add(stem.element(), weight);
            stems.add(stem, weight);
        }
    }
    Ok((elements, stems))
}

/// Raw deity of each visible stem except the day stem, then of each branch's
/// dominant hidden stem.
fn raw_deities(
    resolver: &RelationResolver<'_>,
    pillars: &FourPillars<SexagenaryPair>,
) -> Result<Vec<TenDeity>, EngineError> {
    let dm = pillars.day_master();
    let mut out = Vec::with_capacity(7);
    for (slot, pair) in pillars.entries() {
        if slot != PillarSlot::Day {
            out.push(resolver.raw_ten_deity(dm, pair.stem)?);
        }
    }
    for branch in pillars.branches() {
        out.push(resolver.raw_ten_deity(dm, resolver.dominant_hidden_stem(branch)?)?);
    }
    Ok(out)
}

/// Strong if any branch roots the day master (long life, established, peak),
/// or failing that, if peers plus tomb stages exceed the threshold.
pub fn is_strong(
    resolver: &RelationResolver<'_>,
    pillars: &FourPillars<SexagenaryPair>,
) -> Result<bool, EngineError> {
    let dm = pillars.day_master();
    let stages = pillars
        .branches()
        .into_iter()
        .map(|b| resolver.raw_life_stage(dm, b))
        .collect::<Result<Vec<_>, _>>()?;
    if stages.iter().any(|s| s.is_rooted()) {
        return Ok(true);
    }
    let peers = raw_deities(resolver, pillars)?
        .into_iter()
        .filter(|d| *d == TenDeity::Peer)
        .count();
    let tombs = stages.iter().filter(|s| **s == LifeStage::Tomb).count();
    Ok(peers + tombs > PEER_TOMB_THRESHOLD)
}

pub fn deity_distribution(
    resolver: &RelationResolver<'_>,
    pillars: &FourPillars<SexagenaryPair>,
) -> Result<DeityDistribution, EngineError> {
    let dm = pillars.day_master();
    let stem_deities: Vec<String> = pillars
        .entries()
        .map(|(slot, p)| {
            if slot == PillarSlot::Day {
                DAY_MASTER_LABEL.to_string()
            } else {
                resolver.ten_deity(dm, p.stem)
            }
        })
        .collect();
    let branch_deities = pillars
        .branches()
        .into_iter()
        .map(|b| Ok(resolver.ten_deity(dm, resolver.dominant_hidden_stem(b)?)))
        .collect::<Result<Vec<_>, EngineError>>()?;

    let mut deity_counts = BTreeMap::new();
    for label in stem_deities.iter().chain(&branch_deities) {
        if label != DAY_MASTER_LABEL {
            *deity_counts.entry(label.clone()).or_insert(0) += 1;
        }
    }
    Ok(DeityDistribution {
        stem_deities,
        branch_deities,
        deity_counts,
    })
}

/// Branches whose first, second or third hidden stem shares the day master's
/// element, rendered as `強：..　中：..　弱：..`.
pub fn root_analysis(
    resolver: &RelationResolver<'_>,
    day_master: Stem,
    branches: &[Branch],
) -> Result<String, EngineError> {
    const LABELS: [&str; 3] = ["強", "中", "弱"];
    let mut buckets: [String; 3] = Default::default();
    for (pos, bucket) in buckets.iter_mut().enumerate() {
        for &b in branches {
            let hidden = resolver.hidden_stems(b)?;
            if hidden
                .get(pos)
                .is_some_and(|h| h.stem.element() == day_master.element())
            {
                bucket.push(b.as_char());
            }
        }
    }
    if buckets.iter().all(String::is_empty) {
        return Ok(NO_ROOT_LABEL.to_string());
    }
    let mut out = String::new();
    for (i, (label, bucket)) in LABELS.iter().zip(&buckets).enumerate() {
        if bucket.is_empty() {
            continue;
        }
        out.push_str(label);
        out.push('：');
        out.push_str(bucket);
        if i < 2 {
            out.push('\u{3000}');
        }
    }
    Ok(out)
}

/// Sandwiched (index distance 2, no wrap) and arched branches of adjacent
/// pillar pairs.
pub fn gong_combinations(kb: &KnowledgeBase, branches: &[Branch]) -> Vec<Branch> {
    let mut out = Vec::new();
    for pair in branches.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if let Some(mid) = a.enclosed_between(b) {
            out.push(mid);
        }
        if let Some(target) = kb.arch(a, b).filter(|t| !branches.contains(t)) {
            out.push(target);
        }
    }
    out
}

fn repeated<T: Ord + Copy>(items: [T; 4]) -> BTreeMap<T, u8> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0u8) += 1;
    }
    counts.retain(|_, c| *c > 1);
    counts
}

/// Yang blade, general star (將星) and canopy (華蓋).
pub fn special_stars(kb: &KnowledgeBase, pillars: &FourPillars<SexagenaryPair>) -> SpecialStars {
    let dm = pillars.day_master();
    let branches = pillars.branches();
    let blade_stage = if dm.polarity().is_yang() {
        LifeStage::Peak
    } else {
        LifeStage::CapAndBelt
    };
    let yang_blade = kb
        .stage_branch(dm, blade_stage)
        .filter(|b| branches.contains(b))
        .map(|branch| SpecialStar {
            branch,
            description: YANG_BLADE_TEXT.to_string(),
        });

    let others = [
        pillars.year.branch,
        pillars.month.branch,
        pillars.hour.branch,
    ];
    let [_, center, storage] = pillars.day.branch.triad();
    let star_if_present = |branch: Branch, text: &str| {
        others.contains(&branch).then(|| SpecialStar {
            branch,
            description: text.to_string(),
        })
    };

    SpecialStars {
        yang_blade,
        jiang_xing: star_if_present(center, JIANG_XING_TEXT),
        hua_gai: star_if_present(storage, HUA_GAI_TEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizhu_base::Element;

    fn chart(codes: [&str; 4]) -> FourPillars<SexagenaryPair> {
        let [y, m, d, h] = codes.map(|c| c.parse().unwrap());
        FourPillars::new(y, m, d, h)
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::standard().unwrap()
    }

    #[test]
    fn element_scores_count_month_twice() {
        let kb = kb();
        let r = RelationResolver::new(&kb);
        let p = chart(["壬午", "癸丑", "戊子", "丁巳"]);
        let (e, s) = element_scores(&r, &p).unwrap();
        // stems: 壬 癸 → water 10, 戊 → earth 5, 丁 → fire 5
        // 午 丁5 己3, 丑 己5 癸2 辛1 (twice), 子 癸8, 巳 丙5 戊2 庚1
        assert_eq!(e.get(Element::Water), 10 + 2 + 2 + 8);
        assert_eq!(e.get(Element::Earth), 5 + 3 + 5 + 5 + 2);
        assert_eq!(e.get(Element::Fire), 5 + 5 + 5);
        assert_eq!(e.get(Element::Metal), 1 + 1 + 1);
        assert_eq!(e.get(Element::Wood), 0);
        assert_eq!(e.total(), 20 + 32 + 8);
        assert_eq!(s.total(), e.total());
        assert_eq!(e.strongest(), Element::Water);
        assert_eq!(e.weakest(), Element::Wood);
    }

    #[test]
    fn root_analysis_buckets() {
        let kb = kb();
        let r = RelationResolver::new(&kb);
        // 戊 (earth): 午 has 己 second, 丑 has 己 first, 巳 has 戊 second
        let roots = root_analysis(&r, Stem::Wu, &[Branch::Wu, Branch::Chou, Branch::Zi, Branch::Si])
            .unwrap();
        assert_eq!(roots, "強：丑\u{3000}中：午巳\u{3000}");
        let none = root_analysis(&r, Stem::Jia, &[Branch::Zi, Branch::You, Branch::Zi, Branch::Wu])
            .unwrap();
        assert_eq!(none, NO_ROOT_LABEL);
        let middle_only =
            root_analysis(&r, Stem::Jia, &[Branch::Zi, Branch::Chen, Branch::You, Branch::Wu])
                .unwrap();
        assert_eq!(middle_only, "中：辰\u{3000}");
    }

    #[test]
    fn rooted_stage_makes_strong() {
        let kb = kb();
        let r = RelationResolver::new(&kb);
        // 戊 in 午 is 帝旺
        assert!(is_strong(&r, &chart(["壬午", "癸丑", "戊子", "丁巳"])).unwrap());
    }

    #[test]
    fn peers_and_tombs_override_weak() {
        let kb = kb();
        let r = RelationResolver::new(&kb);
        // 甲 day master, no rooted branch; peers 甲 甲 and tomb 未 → 3
        let p = chart(["甲子", "甲戌", "甲申", "乙未"]);
        assert!(is_strong(&r, &p).unwrap());
        // no peers, no tombs
        let p = chart(["庚午", "庚辰", "甲申", "丙子"]);
        assert!(!is_strong(&r, &p).unwrap());
    }

    #[test]
    fn deity_counts_exclude_day_master() {
        let kb = kb();
        let r = RelationResolver::new(&kb);
        let d = deity_distribution(&r, &chart(["壬午", "癸丑", "戊子", "丁巳"])).unwrap();
        assert_eq!(d.stem_deities[2], DAY_MASTER_LABEL);
        assert_eq!(d.deity_counts.values().map(|&c| c as usize).sum::<usize>(), 7);
        assert!(!d.deity_counts.contains_key(DAY_MASTER_LABEL));
    }

    #[test]
    fn gong_uses_linear_sandwich_and_arch() {
        let kb = kb();
        // 戌-子 does not wrap; 申-辰 arch 子 (present, so skipped)
        let got = gong_combinations(&kb, &[Branch::Xu, Branch::Zi, Branch::Shen, Branch::Chen]);
        assert!(got.is_empty());
        // 子-寅 enclose 丑
        let got = gong_combinations(&kb, &[Branch::Xu, Branch::Zi, Branch::Yin, Branch::Yin]);
        assert_eq!(got, vec![Branch::Chou]);
        // 寅-戌 arch 午, absent
        let got = gong_combinations(&kb, &[Branch::Yin, Branch::Xu, Branch::Mao, Branch::Mao]);
        assert_eq!(got, vec![Branch::Wu]);
    }

    #[test]
    fn special_stars_for_day_triad() {
        let kb = kb();
        // day 子 → 將星 子, 華蓋 辰; 甲 yang blade in 卯
        let p = chart(["甲辰", "丁卯", "甲子", "甲子"]);
        let stars = special_stars(&kb, &p);
        assert_eq!(stars.yang_blade.as_ref().map(|s| s.branch), Some(Branch::Mao));
        assert_eq!(stars.jiang_xing.as_ref().map(|s| s.branch), Some(Branch::Zi));
        assert_eq!(stars.hua_gai.as_ref().map(|s| s.branch), Some(Branch::Chen));
    }

    #[test]
    fn degraded_analysis_keeps_minimum() {
        let kb = kb().without_hidden_stems(Branch::Zi);
        let r = RelationResolver::new(&kb);
        let o = analyze(&r, &chart(["壬午", "癸丑", "戊子", "丁巳"]), Some(Gender::Male));
        assert!(o.is_degraded());
        let f = o.fallback().unwrap();
        assert_eq!(f.root_analysis, "unknown");
        assert!(!f.day_master_strength.is_strong);
        assert_eq!(f.day_master, Stem::Wu);
    }
}
