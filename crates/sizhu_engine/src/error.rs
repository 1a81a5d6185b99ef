//! Error types for the chart engine.

use sizhu_base::BaseError;
use sizhu_calendar::CalendarError;
use thiserror::Error;

/// Failures inside one engine component.
///
/// These never abort a chart: the component reports them as the diagnostic of
/// a degraded [`Outcome`](crate::Outcome).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A knowledge-base table lacks an entry the computation needs.
    #[error("knowledge base has no {table} entry for {key}")]
    MissingEntry { table: &'static str, key: String },
    /// A shensha rule cannot be evaluated.
    #[error("rule {name}: {reason}")]
    Rule { name: String, reason: String },
    /// The raw fortune sequence has an unusable shape.
    #[error("fortune sequence: {0}")]
    FortuneSequence(String),
    #[error(transparent)]
    Base(#[from] BaseError),
}

impl EngineError {
    pub(crate) fn missing(table: &'static str, key: impl ToString) -> Self {
        Self::MissingEntry {
            table,
            key: key.to_string(),
        }
    }
}

/// Failures that abort a chart computation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// Date resolution or pillar extraction failed.
    #[error("calendar: {0}")]
    Calendar(#[from] CalendarError),
    /// A supplied pillar is not a 2-character ganzhi code.
    #[error("invalid ganzhi code: {0:?}")]
    InvalidGanzhi(String),
    /// Engine configuration is out of range or unreadable.
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Base(#[from] BaseError),
}

impl From<toml::de::Error> for ChartError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
