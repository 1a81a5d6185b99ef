//! Integration tests for the standard knowledge base.
//!
//! Exhaustive checks over the full alphabet; no calendar involved.

use proptest::prelude::*;
use sizhu_base::{
    ALL_BRANCHES, ALL_STEMS, Branch, BranchRelation, KnowledgeBase, LifeStage, SexagenaryPair,
    Stem, TenDeity,
};

fn kb() -> KnowledgeBase {
    KnowledgeBase::standard().expect("bundled tables load")
}

/// Storage flag over all 12 branches.
#[test]
fn storage_branches_exhaustive() {
    let kb = kb();
    for b in ALL_BRANCHES {
        let expected = matches!(b, Branch::Chen | Branch::Xu | Branch::Chou | Branch::Wei);
        assert_eq!(kb.is_storage(b), expected, "{b}");
    }
}

/// Every stem sees exactly two stems per relation family.
#[test]
fn ten_deity_matrix_balanced() {
    let kb = kb();
    for dm in ALL_STEMS {
        assert_eq!(kb.ten_deity(dm, dm), Some(TenDeity::Peer));
        let mut counts = std::collections::HashMap::new();
        for other in ALL_STEMS {
            *counts.entry(kb.ten_deity(dm, other).unwrap()).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 10, "dm {dm}");
        assert!(counts.values().all(|&c| c == 1));
    }
}

/// Each stem visits all twelve stages exactly once.
#[test]
fn life_stages_are_permutations() {
    let kb = kb();
    for dm in ALL_STEMS {
        let mut seen: Vec<LifeStage> = ALL_BRANCHES
            .into_iter()
            .map(|b| kb.life_stage(dm, b).unwrap())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 12, "dm {dm}");
    }
}

/// Clash, harm, six-harmony and break are symmetric.
#[test]
fn symmetric_relations() {
    let kb = kb();
    for kind in [
        BranchRelation::Clash,
        BranchRelation::Harm,
        BranchRelation::SixHarmony,
        BranchRelation::Break,
        BranchRelation::HiddenCombination,
        BranchRelation::Meeting,
        BranchRelation::TripleHarmony,
    ] {
        for a in ALL_BRANCHES {
            let Some(targets) = kb.relations_of(a).and_then(|m| m.get(&kind)) else {
                continue;
            };
            for &b in targets {
                let back = kb.relations_of(b).and_then(|m| m.get(&kind)).unwrap();
                assert!(back.contains(&a), "{kind} {a}{b}");
            }
        }
    }
}

#[test]
fn punish_and_punished_by_mirror() {
    let kb = kb();
    let yin = kb.relations_of(Branch::Yin).unwrap();
    assert_eq!(yin[&BranchRelation::Punishes], vec![Branch::Si]);
    assert_eq!(yin[&BranchRelation::PunishedBy], vec![Branch::Shen]);
}

#[test]
fn combining_partners() {
    let kb = kb();
    assert_eq!(kb.combining_partner(Stem::Jia), Some(Stem::Ji));
    assert_eq!(kb.combining_partner(Stem::Gui), Some(Stem::Wu));
    for s in ALL_STEMS {
        let p = kb.combining_partner(s).unwrap();
        assert_eq!(kb.combining_partner(p), Some(s));
    }
}

proptest! {
    /// Void branches never belong to the pair's own decade.
    #[test]
    fn void_pair_outside_decade(i in 0i64..60) {
        let kb = kb();
        let pair = SexagenaryPair::from_cycle_index(i);
        let (a, b) = kb.void_pair(pair).unwrap();
        let start = i - i % 10;
        for k in start..start + 10 {
            let member = SexagenaryPair::from_cycle_index(k).branch;
            prop_assert_ne!(member, a);
            prop_assert_ne!(member, b);
        }
    }

    /// Nayin is shared by consecutive pairs 2k and 2k+1.
    #[test]
    fn nayin_shared_by_pairs(k in 0i64..30) {
        let kb = kb();
        let a = SexagenaryPair::from_cycle_index(2 * k);
        let b = SexagenaryPair::from_cycle_index(2 * k + 1);
        prop_assert_eq!(kb.nayin(a), kb.nayin(b));
    }
}
