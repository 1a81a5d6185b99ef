//! Complete-or-degraded component results.
//!
//! Every engine component that can partially fail returns an [`Outcome`]
//! instead of swallowing its error: either the full value, or a best-effort
//! fallback plus the diagnostic that caused it.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::warn;

use crate::error::EngineError;

/// Result of one component: the full value or a marked fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, F = T> {
    Complete(T),
    Degraded { fallback: F, diagnostic: String },
}

impl<T, F> Outcome<T, F> {
    /// Wrap a component result, substituting `fallback` on error.
    pub fn from_result(
        component: &'static str,
        result: Result<T, EngineError>,
        fallback: impl FnOnce(&EngineError) -> F,
    ) -> Self {
        match result {
            Ok(v) => Self::Complete(v),
            Err(e) => {
                warn!(component, error = %e, "component degraded");
                Self::Degraded {
                    fallback: fallback(&e),
                    diagnostic: e.to_string(),
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Complete(_) => None,
            Self::Degraded { diagnostic, .. } => Some(diagnostic),
        }
    }

    /// The full value, if the component completed.
    pub fn complete(&self) -> Option<&T> {
        match self {
            Self::Complete(v) => Some(v),
            Self::Degraded { .. } => None,
        }
    }

    pub fn fallback(&self) -> Option<&F> {
        match self {
            Self::Complete(_) => None,
            Self::Degraded { fallback, .. } => Some(fallback),
        }
    }
}

impl<T> Outcome<T> {
    /// The full value or the fallback.
    pub fn value(&self) -> &T {
        match self {
            Self::Complete(v) | Self::Degraded { fallback: v, .. } => v,
        }
    }

    pub fn value_mut(&mut self) -> &mut T {
        match self {
            Self::Complete(v) | Self::Degraded { fallback: v, .. } => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Complete(v) | Self::Degraded { fallback: v, .. } => v,
        }
    }
}

/// `{"status": "complete", "value": ..}` or
/// `{"status": "degraded", "value": .., "diagnostic": ..}`.
impl<T: Serialize, F: Serialize> Serialize for Outcome<T, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Complete(v) => {
                let mut s = serializer.serialize_struct("Outcome", 2)?;
                s.serialize_field("status", "complete")?;
                s.serialize_field("value", v)?;
                s.end()
            }
            Self::Degraded {
                fallback,
                diagnostic,
            } => {
                let mut s = serializer.serialize_struct("Outcome", 3)?;
                s.serialize_field("status", "degraded")?;
                s.serialize_field("value", fallback)?;
                s.serialize_field("diagnostic", diagnostic)?;
                s.end()
            }
        }
    }
}
