//! Human-readable multi-line chart summary.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use sizhu_base::{FourPillars, SexagenaryPair, UNKNOWN_LABEL};

use crate::analysis_types::{Analysis, AnalysisFallback};
use crate::outcome::Outcome;

const NO_ADVICE: &str = "無建議";

/// Fixed-order summary lines, each terminated by a newline.
pub fn summary_text(
    pillars: &FourPillars<SexagenaryPair>,
    analysis: &Outcome<Analysis, AnalysisFallback>,
) -> String {
    ChartSummary { pillars, analysis }.to_string()
}

/// Display adapter behind [`summary_text`].
pub struct ChartSummary<'a> {
    pub pillars: &'a FourPillars<SexagenaryPair>,
    pub analysis: &'a Outcome<Analysis, AnalysisFallback>,
}

impl Display for ChartSummary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let p = self.pillars;
        writeln!(f, "八字分析: {} {} {} {}", p.year, p.month, p.day, p.hour)?;
        let dm = p.day_master();

        match self.analysis {
            Outcome::Complete(a) => {
                writeln!(f, "日主: {dm} ({})", a.day_master_nature.element)?;
                writeln!(f, "身強弱: {}", a.day_master_strength.description)?;
                writeln!(f, "五行分析: {}", a.wuxing_analysis.element_scores)?;
                writeln!(f, "根系分析: {}", a.root_analysis)?;
                writeln!(f, "十神分佈: {}", Braced(&a.deity_distribution.deity_counts))?;
                writeln!(f, "建議: {}", a.recommendations.advice)?;
                if !a.special_stars.is_empty() {
                    f.write_str("特殊星煞: ")?;
                    for (name, star) in a.special_stars.iter() {
                        write!(f, "{name}({}); ", star.branch)?;
                    }
                    f.write_str("\n")?;
                }
            }
            Outcome::Degraded { fallback, .. } => {
                writeln!(f, "日主: {dm} ({UNKNOWN_LABEL})")?;
                writeln!(f, "身強弱: {}", fallback.day_master_strength.description)?;
                f.write_str("五行分析: {}\n")?;
                writeln!(f, "根系分析: {}", fallback.root_analysis)?;
                f.write_str("十神分佈: {}\n")?;
                writeln!(f, "建議: {NO_ADVICE}")?;
            }
        }
        Ok(())
    }
}

/// `{label: count, ...}` in key order.
struct Braced<'a>(&'a BTreeMap<String, u8>);

impl Display for Braced<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (label, count)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label}: {count}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::relation::RelationResolver;
    use sizhu_base::{Branch, KnowledgeBase};

    fn chart() -> FourPillars<SexagenaryPair> {
        let [y, m, d, h] = ["壬午", "癸丑", "戊子", "丁巳"].map(|c| c.parse::<SexagenaryPair>().unwrap());
        FourPillars::new(y, m, d, h)
    }

    #[test]
    fn lines_in_fixed_order() {
        let kb = KnowledgeBase::standard().unwrap();
        let r = RelationResolver::new(&kb);
        let p = chart();
        let text = summary_text(&p, &analyze(&r, &p, None));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "八字分析: 壬午 癸丑 戊子 丁巳");
        assert_eq!(lines[1], "日主: 戊 (土)");
        assert_eq!(lines[2], "身強弱: 身強");
        assert_eq!(lines[3], "五行分析: {金: 3, 木: 0, 水: 22, 火: 15, 土: 20}");
        assert!(lines[4].starts_with("根系分析: "));
        assert!(lines[5].starts_with("十神分佈: {"));
        assert_eq!(lines[6], "建議: 五行缺木，建議多接觸木相關的事物");
        assert!(text.ends_with('\n'));
        let analysis = analyze(&r, &p, None);
        let adapter = ChartSummary { pillars: &p, analysis: &analysis };
        assert_eq!(format!("{adapter}"), summary_text(&p, &analysis));
    }

    #[test]
    fn degraded_analysis_still_summarized() {
        let kb = KnowledgeBase::standard()
            .unwrap()
            .without_hidden_stems(Branch::Chou);
        let r = RelationResolver::new(&kb);
        let p = chart();
        let text = summary_text(&p, &analyze(&r, &p, None));
        assert!(text.contains("日主: 戊 (unknown)"));
        assert!(text.contains("身強弱: unknown"));
        assert!(text.contains("建議: 無建議"));
        assert!(!text.contains("特殊星煞"));
    }

    #[test]
    fn braced_counts() {
        let mut m = BTreeMap::new();
        m.insert("正官".to_string(), 2u8);
        m.insert("七殺".to_string(), 1u8);
        assert_eq!(Braced(&m).to_string(), "{七殺: 1, 正官: 2}");
        assert_eq!(Braced(&BTreeMap::new()).to_string(), "{}");
    }
}
