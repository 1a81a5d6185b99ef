//! Typed shensha (star) rule families and their TOML loader.
//!
//! Three families:
//! - `general`: key symbol of some pillars maps to target symbols searched in every pillar
//! - `compound`: tuples of pillar symbols compared against fixed target tuples
//! - `child`: like `general`, but searched in one value pillar and only for young subjects
//!
//! A rule file is a sequence of `[[rule]]` tables tagged with `family`.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BaseError;
use crate::ganzhi::{Facet, Symbol};
use crate::pillars::PillarSlot;

/// Rule set shipped with the crate.
const BUNDLED_RULES: &str = include_str!("../data/shensha.toml");

/// One shensha rule of any family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ShenshaRule {
    General(GeneralRule),
    Compound(CompoundRule),
    Child(ChildRule),
}

impl ShenshaRule {
    pub fn name(&self) -> &str {
        match self {
            Self::General(r) => &r.name,
            Self::Compound(r) => &r.name,
            Self::Child(r) => &r.name,
        }
    }
}

/// Key-to-targets mapping searched across every pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralRule {
    pub name: String,
    /// Facet read from the key pillars.
    pub key: Facet,
    /// Facet compared against the targets.
    pub value: Facet,
    pub key_pillars: Vec<PillarSlot>,
    pub table: BTreeMap<Symbol, Vec<Symbol>>,
}

/// Tuple-match rule. Matches always attach to the Day pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRule {
    pub name: String,
    pub formats: Vec<Vec<PillarRef>>,
    pub targets: Vec<Vec<Symbol>>,
}

/// Mapping rule restricted to one value pillar, applied to young subjects only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRule {
    pub name: String,
    pub key: Facet,
    pub value: Facet,
    pub key_pillars: Vec<PillarSlot>,
    pub table: BTreeMap<Symbol, Vec<Symbol>>,
    #[serde(default = "default_value_pillar")]
    pub value_pillar: PillarSlot,
}

fn default_value_pillar() -> PillarSlot {
    PillarSlot::Hour
}

/// Reference to one half of one pillar, written `"<slot>.<facet>"` (e.g. `"day.stem"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PillarRef {
    pub slot: PillarSlot,
    pub facet: Facet,
}

impl Display for PillarRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let facet = match self.facet {
            Facet::Stem => "stem",
            Facet::Branch => "branch",
        };
        write!(f, "{}.{facet}", self.slot.name())
    }
}

impl FromStr for PillarRef {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BaseError::RuleParse(format!("bad pillar reference {s:?}"));
        let (slot, facet) = s.split_once('.').ok_or_else(bad)?;
        let slot = PillarSlot::from_name(slot).ok_or_else(bad)?;
        let facet = match facet {
            "stem" => Facet::Stem,
            "branch" => Facet::Branch,
            _ => return Err(bad()),
        };
        Ok(Self { slot, facet })
    }
}

impl TryFrom<String> for PillarRef {
    type Error = BaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PillarRef> for String {
    fn from(r: PillarRef) -> Self {
        r.to_string()
    }
}

/// Ordered collection of shensha rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShenshaRuleSet {
    #[serde(rename = "rule", default)]
    pub rules: Vec<ShenshaRule>,
}

impl ShenshaRuleSet {
    /// The rule set compiled into the crate.
    pub fn bundled() -> Result<Self, BaseError> {
        Self::from_toml_str(BUNDLED_RULES)
    }

    /// Parse and validate a TOML rule file.
    pub fn from_toml_str(src: &str) -> Result<Self, BaseError> {
        let set: Self = toml::from_str(src)?;
        set.validate()?;
        Ok(set)
    }

    pub fn from_file(path: &Path) -> Result<Self, BaseError> {
        let src = std::fs::read_to_string(path).map_err(|e| BaseError::RuleIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&src)
    }

    pub fn general(&self) -> impl Iterator<Item = &GeneralRule> {
        self.rules.iter().filter_map(|r| match r {
            ShenshaRule::General(g) => Some(g),
            _ => None,
        })
    }

    pub fn compound(&self) -> impl Iterator<Item = &CompoundRule> {
        self.rules.iter().filter_map(|r| match r {
            ShenshaRule::Compound(c) => Some(c),
            _ => None,
        })
    }

    pub fn child(&self) -> impl Iterator<Item = &ChildRule> {
        self.rules.iter().filter_map(|r| match r {
            ShenshaRule::Child(c) => Some(c),
            _ => None,
        })
    }

    /// Check facet consistency and tuple arity of every rule.
    pub fn validate(&self) -> Result<(), BaseError> {
        for rule in &self.rules {
            let invalid = |reason: String| BaseError::InvalidRule {
                name: rule.name().to_string(),
                reason,
            };
            if rule.name().is_empty() {
                return Err(invalid("empty name".into()));
            }
            match rule {
                ShenshaRule::General(r) => {
                    check_mapping(r.key, r.value, &r.key_pillars, &r.table).map_err(invalid)?
                }
                ShenshaRule::Child(r) => {
                    check_mapping(r.key, r.value, &r.key_pillars, &r.table).map_err(invalid)?
                }
                ShenshaRule::Compound(r) => check_compound(r).map_err(invalid)?,
            }
        }
        Ok(())
    }
}

fn check_mapping(
    key: Facet,
    value: Facet,
    key_pillars: &[PillarSlot],
    table: &BTreeMap<Symbol, Vec<Symbol>>,
) -> Result<(), String> {
    if key_pillars.is_empty() {
        return Err("no key pillars".into());
    }
    for (k, targets) in table {
        if k.facet() != key {
            return Err(format!("key {k} is not a {key:?}"));
        }
        if let Some(t) = targets.iter().find(|t| t.facet() != value) {
            return Err(format!("target {t} is not a {value:?}"));
        }
    }
    Ok(())
}

fn check_compound(rule: &CompoundRule) -> Result<(), String> {
    if rule.formats.is_empty() {
        return Err("no formats".into());
    }
    for format in &rule.formats {
        for target in &rule.targets {
            if target.len() != format.len() {
                return Err(format!(
                    "target of length {} does not fit format of length {}",
                    target.len(),
                    format.len()
                ));
            }
            for (r, sym) in format.iter().zip(target) {
                if r.facet != sym.facet() {
                    return Err(format!("target symbol {sym} does not fit {r}"));
                }
            }
        }
    }
    Ok(())
}
