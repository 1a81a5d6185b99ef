//! Error types for the alphabet and knowledge base.

use thiserror::Error;

/// Errors from symbol parsing and knowledge-base loading.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BaseError {
    /// A string that is not a single stem or branch character.
    #[error("unknown symbol: {0:?}")]
    UnknownSymbol(String),
    /// A string that is not a 2-character stem+branch code.
    #[error("malformed ganzhi code: {0:?}")]
    MalformedGanzhi(String),
    /// A knowledge-base table lacks an entry.
    #[error("knowledge base has no {table} entry for {key}")]
    MissingEntry { table: &'static str, key: String },
    /// Shensha rule file could not be parsed.
    #[error("rule file parse error: {0}")]
    RuleParse(String),
    /// A parsed shensha rule is inconsistent.
    #[error("invalid rule {name}: {reason}")]
    InvalidRule { name: String, reason: String },
    /// Rule file could not be read.
    #[error("cannot read rule file {path}: {reason}")]
    RuleIo { path: String, reason: String },
}

impl From<toml::de::Error> for BaseError {
    fn from(e: toml::de::Error) -> Self {
        Self::RuleParse(e.to_string())
    }
}
