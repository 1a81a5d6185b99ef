//! Engine configuration.
//!
//! All fields have defaults, so an empty TOML document is a valid config:
//!
//! ```toml
//! child_age_limit = 11
//! fortune_period_count = 10
//! utc_offset_hours = 8.0
//! shensha_rules = "rules/shensha.toml"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sizhu_base::{KnowledgeBase, ShenshaRuleSet};
use sizhu_calendar::CalendarConfig;

use crate::error::ChartError;

/// Default age bound (exclusive) for the child shensha family.
pub const DEFAULT_CHILD_AGE_LIMIT: i32 = 11;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Child rules apply while `as_of_year - birth_year` is below this.
    pub child_age_limit: i32,
    /// Raw fortune periods requested from the calendar service.
    pub fortune_period_count: usize,
    /// Local standard time offset of birth moments.
    pub utc_offset_hours: f64,
    /// TOML rule file replacing the bundled shensha rules.
    pub shensha_rules: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            child_age_limit: DEFAULT_CHILD_AGE_LIMIT,
            fortune_period_count: 10,
            utc_offset_hours: 8.0,
            shensha_rules: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ChartError> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ChartError> {
        let src = std::fs::read_to_string(path)
            .map_err(|e| ChartError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.child_age_limit < 0 {
            return Err(ChartError::Config("child_age_limit must be >= 0".into()));
        }
        self.calendar_config()
            .validate()
            .map_err(|e| ChartError::Config(e.into()))
    }

    /// Settings handed to the bundled calendar.
    pub fn calendar_config(&self) -> CalendarConfig {
        CalendarConfig {
            utc_offset_hours: self.utc_offset_hours,
            fortune_period_count: self.fortune_period_count,
        }
    }

    /// Standard knowledge base, with the configured rule file if any.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase, ChartError> {
        match &self.shensha_rules {
            Some(path) => Ok(KnowledgeBase::with_rules(ShenshaRuleSet::from_file(path)?)),
            None => Ok(KnowledgeBase::standard()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let c = EngineConfig::from_toml_str("child_age_limit = 6\nutc_offset_hours = 9.0\n")
            .unwrap();
        assert_eq!(c.child_age_limit, 6);
        assert_eq!(c.utc_offset_hours, 9.0);
        assert_eq!(c.fortune_period_count, 10);
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("child_age = 6"),
            Err(ChartError::Config(_))
        ));
    }

    #[test]
    fn negative_age_limit_rejected() {
        assert!(EngineConfig::from_toml_str("child_age_limit = -1").is_err());
    }

    #[test]
    fn oversized_period_count_rejected() {
        assert!(EngineConfig::from_toml_str("fortune_period_count = 300").is_err());
        assert!(EngineConfig::from_toml_str("fortune_period_count = 13").is_ok());
    }

    #[test]
    fn missing_rule_file_is_error() {
        let c = EngineConfig {
            shensha_rules: Some(PathBuf::from("/nonexistent/shensha.toml")),
            ..EngineConfig::default()
        };
        assert!(matches!(c.knowledge_base(), Err(ChartError::Base(_))));
    }
}
