//! Shensha Rule Engine.
//!
//! Families run in fixed order: general, compound, then child (young subjects
//! only). Each pillar's star list is then de-duplicated, keeping the first
//! occurrence.

use std::collections::HashSet;

use sizhu_base::{
    ChildRule, CompoundRule, FourPillars, GeneralRule, PillarSlot, SexagenaryPair,
    ShenshaRuleSet, Symbol,
};
use tracing::trace;

use crate::error::EngineError;
use crate::outcome::Outcome;

/// Star names per pillar.
pub type StarLists = FourPillars<Vec<String>>;

/// Rule engine over one rule set.
#[derive(Debug, Clone, Copy)]
pub struct ShenshaEngine<'kb> {
    rules: &'kb ShenshaRuleSet,
}

impl<'kb> ShenshaEngine<'kb> {
    pub fn new(rules: &'kb ShenshaRuleSet) -> Self {
        Self { rules }
    }

    /// Apply every family; on a rule error every list comes back empty.
    pub fn apply(
        &self,
        pillars: &FourPillars<SexagenaryPair>,
        include_child: bool,
    ) -> Outcome<StarLists> {
        Outcome::from_result(
            "shensha",
            self.try_apply(pillars, include_child),
            |_| StarLists::default(),
        )
    }

    fn try_apply(
        &self,
        pillars: &FourPillars<SexagenaryPair>,
        include_child: bool,
    ) -> Result<StarLists, EngineError> {
        let mut stars = StarLists::default();
        for rule in self.rules.general() {
            apply_general(rule, pillars, &mut stars);
        }
        for rule in self.rules.compound() {
            apply_compound(rule, pillars, &mut stars)?;
        }
        if include_child {
            for rule in self.rules.child() {
                apply_child(rule, pillars, &mut stars);
            }
        }
        Ok(stars.map(|_, list| dedup_in_order(list)))
    }
}

/// Every key pillar whose symbol is a table key marks every pillar holding a target.
fn apply_general(rule: &GeneralRule, pillars: &FourPillars<SexagenaryPair>, stars: &mut StarLists) {
    for &key_slot in &rule.key_pillars {
        let Some(targets) = rule.table.get(&pillars.symbol(key_slot, rule.key)) else {
            continue;
        };
        for (slot, pair) in pillars.entries() {
            if targets.contains(&Symbol::of(*pair, rule.value)) {
                trace!(rule = %rule.name, key = ?key_slot, hit = ?slot, "general rule matched");
                stars.get_mut(slot).push(rule.name.clone());
            }
        }
    }
}

/// Tuple match; hits always attach to the Day pillar.
fn apply_compound(
    rule: &CompoundRule,
    pillars: &FourPillars<SexagenaryPair>,
    stars: &mut StarLists,
) -> Result<(), EngineError> {
    for format in &rule.formats {
        let actual: Vec<Symbol> = format
            .iter()
            .map(|r| pillars.symbol(r.slot, r.facet))
            .collect();
        let mut matched = false;
        for target in &rule.targets {
            if target.len() != actual.len() {
                return Err(EngineError::Rule {
                    name: rule.name.clone(),
                    reason: format!(
                        "target of length {} does not fit format of length {}",
                        target.len(),
                        actual.len()
                    ),
                });
            }
            matched |= *target == actual;
        }
        if matched {
            trace!(rule = %rule.name, "compound rule matched");
            stars.day.push(rule.name.clone());
        }
    }
    Ok(())
}

/// Like a general rule, but only the value pillar is searched and hits attach to Hour.
fn apply_child(rule: &ChildRule, pillars: &FourPillars<SexagenaryPair>, stars: &mut StarLists) {
    let value = pillars.symbol(rule.value_pillar, rule.value);
    for &key_slot in &rule.key_pillars {
        let hit = rule
            .table
            .get(&pillars.symbol(key_slot, rule.key))
            .is_some_and(|targets| targets.contains(&value));
        if hit {
            trace!(rule = %rule.name, "child rule matched");
            stars.get_mut(PillarSlot::Hour).push(rule.name.clone());
        }
    }
}

/// General-rule stars a progression pair triggers, keys read from the natal chart.
pub fn progression_stars(
    rules: &ShenshaRuleSet,
    natal: &FourPillars<SexagenaryPair>,
    pair: SexagenaryPair,
) -> Vec<String> {
    let mut out = Vec::new();
    for rule in rules.general() {
        let value = Symbol::of(pair, rule.value);
        let hit = rule.key_pillars.iter().any(|&slot| {
            rule.table
                .get(&natal.symbol(slot, rule.key))
                .is_some_and(|targets| targets.contains(&value))
        });
        if hit {
            out.push(rule.name.clone());
        }
    }
    dedup_in_order(out)
}

fn dedup_in_order(list: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizhu_base::{Facet, PillarRef, ShenshaRule, Stem};

    fn pair(s: &str) -> SexagenaryPair {
        s.parse().unwrap()
    }

    fn chart(codes: [&str; 4]) -> FourPillars<SexagenaryPair> {
        let [y, m, d, h] = codes.map(pair);
        FourPillars::new(y, m, d, h)
    }

    const FIXTURE: &str = r#"
[[rule]]
family = "general"
name = "測試星"
key = "stem"
value = "branch"
key_pillars = ["day"]
[rule.table]
"戊" = ["子", "巳"]

[[rule]]
family = "compound"
name = "測試星"
formats = [["day.stem", "day.branch"]]
targets = [["戊", "子"]]

[[rule]]
family = "compound"
name = "年月"
formats = [["year.branch", "month.branch"]]
targets = [["午", "丑"]]

[[rule]]
family = "child"
name = "童關"
key = "branch"
value = "branch"
key_pillars = ["month"]
[rule.table]
"丑" = ["巳"]
"#;

    fn fixture() -> ShenshaRuleSet {
        ShenshaRuleSet::from_toml_str(FIXTURE).unwrap()
    }

    #[test]
    fn duplicate_names_collapse_in_first_order() {
        let rules = fixture();
        let stars = ShenshaEngine::new(&rules)
            .apply(&chart(["壬午", "癸丑", "戊子", "丁巳"]), false)
            .into_value();
        // general hits day (子) and hour (巳); compound hits day again
        assert_eq!(stars.day, vec!["測試星".to_string(), "年月".to_string()]);
        assert_eq!(stars.hour, vec!["測試星".to_string()]);
        assert!(stars.year.is_empty());
    }

    #[test]
    fn general_scan_includes_key_pillar() {
        let rules = fixture();
        let stars = ShenshaEngine::new(&rules)
            .apply(&chart(["壬午", "癸丑", "戊子", "丁巳"]), false)
            .into_value();
        assert!(stars.day.contains(&"測試星".to_string()));
    }

    #[test]
    fn child_rules_gated_and_attach_to_hour() {
        let rules = fixture();
        let engine = ShenshaEngine::new(&rules);
        let p = chart(["壬午", "癸丑", "戊子", "丁巳"]);
        assert!(!engine.apply(&p, false).value().hour.contains(&"童關".to_string()));
        assert!(engine.apply(&p, true).value().hour.contains(&"童關".to_string()));
    }

    fn child_rule(value_pillar: &str, target: &str) -> ShenshaRuleSet {
        ShenshaRuleSet::from_toml_str(&format!(
            r#"
[[rule]]
family = "child"
name = "童關"
key = "branch"
value = "branch"
key_pillars = ["month"]
value_pillar = "{value_pillar}"
[rule.table]
"丑" = ["{target}"]
"#
        ))
        .unwrap()
    }

    #[test]
    fn child_rules_search_only_value_pillar() {
        // 午 sits in the year pillar only; the hour pillar holds 巳
        let rules = child_rule("hour", "午");
        let stars = ShenshaEngine::new(&rules)
            .apply(&chart(["壬午", "癸丑", "戊子", "丁巳"]), true)
            .into_value();
        assert_eq!(stars, StarLists::default());
    }

    #[test]
    fn child_value_pillar_hit_still_attaches_to_hour() {
        let rules = child_rule("day", "子");
        let stars = ShenshaEngine::new(&rules)
            .apply(&chart(["壬午", "癸丑", "戊子", "丁巳"]), true)
            .into_value();
        assert_eq!(stars.hour, vec!["童關".to_string()]);
        assert!(stars.day.is_empty());

        // hour branch 巳 matches nothing when the day pillar is searched
        let rules = child_rule("day", "巳");
        let stars = ShenshaEngine::new(&rules)
            .apply(&chart(["壬午", "癸丑", "戊子", "丁巳"]), true)
            .into_value();
        assert!(stars.hour.is_empty());
    }

    #[test]
    fn arity_mismatch_degrades_to_empty() {
        // built directly, bypassing validation
        let rules = ShenshaRuleSet {
            rules: vec![ShenshaRule::Compound(CompoundRule {
                name: "壞".into(),
                formats: vec![vec![PillarRef {
                    slot: PillarSlot::Day,
                    facet: Facet::Stem,
                }]],
                targets: vec![vec![Symbol::Stem(Stem::Wu), Symbol::Stem(Stem::Jia)]],
            })],
        };
        let o = ShenshaEngine::new(&rules).apply(&chart(["壬午", "癸丑", "戊子", "丁巳"]), false);
        assert!(o.is_degraded());
        assert_eq!(o.into_value(), StarLists::default());
    }

    #[test]
    fn bundled_rules_mark_kuigang_day() {
        let rules = ShenshaRuleSet::bundled().unwrap();
        let stars = ShenshaEngine::new(&rules)
            .apply(&chart(["甲子", "丙寅", "庚辰", "丙子"]), false)
            .into_value();
        assert!(stars.day.contains(&"魁罡".to_string()));
    }

    #[test]
    fn progression_stars_use_natal_keys() {
        let rules = fixture();
        let natal = chart(["壬午", "癸丑", "戊子", "丁巳"]);
        assert_eq!(progression_stars(&rules, &natal, pair("辛巳")), vec!["測試星".to_string()]);
        assert!(progression_stars(&rules, &natal, pair("甲寅")).is_empty());
    }
}
