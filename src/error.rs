//! The core error taxonomy (see §7). Every fallible method in
//! `graph_logic` returns `anyhow::Result`, but internally wraps one of these
//! variants so that a caller that cares (the top-level randomize loop, which
//! maps `GenerationFailed` to "reseed and retry") can `downcast_ref` to find
//! out which.

use std::fmt;

/// Behavioral error taxonomy. Names describe what happened, not what type
/// raised it - several of these are raised in more than one place.
#[derive(Clone, Debug)]
pub enum RandoError {
    /// Invalid option combination or malformed requirement expression.
    ConfigError { detail: String },

    /// `search_area` could not locate a partial address.
    NameResolutionFailure { partial: String, base: String },

    /// `place_item` / `replace_item` / `link_exit` attempted on an
    /// already-assigned slot in a way that contradicts current state.
    PlacementConflict { detail: String },

    /// Reachability could not be achieved after exhausting retries within a
    /// single seed. The caller should reseed.
    GenerationFailed { detail: String },

    /// A post-randomize check found something unreachable that should be
    /// reachable. Indicates a bug, never expected in a correct run.
    InvariantViolation { detail: String },
}

impl fmt::Display for RandoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandoError::ConfigError { detail } => write!(f, "invalid configuration: {detail}"),
            RandoError::NameResolutionFailure { partial, base } => write!(
                f,
                "could not resolve '{partial}' from base address '{base}'"
            ),
            RandoError::PlacementConflict { detail } => write!(f, "placement conflict: {detail}"),
            RandoError::GenerationFailed { detail } => {
                write!(f, "generation failed: {detail}")
            }
            RandoError::InvariantViolation { detail } => {
                write!(f, "invariant violation (this is a bug): {detail}")
            }
        }
    }
}

impl std::error::Error for RandoError {}

impl RandoError {
    /// Whether the top-level randomize loop should retry with a new seed
    /// rather than propagate the error to the caller as fatal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RandoError::GenerationFailed { .. })
    }

    pub fn config(detail: impl Into<String>) -> anyhow::Error {
        RandoError::ConfigError { detail: detail.into() }.into()
    }

    pub fn name_resolution(partial: impl Into<String>, base: impl Into<String>) -> anyhow::Error {
        RandoError::NameResolutionFailure { partial: partial.into(), base: base.into() }.into()
    }

    pub fn conflict(detail: impl Into<String>) -> anyhow::Error {
        RandoError::PlacementConflict { detail: detail.into() }.into()
    }

    pub fn generation_failed(detail: impl Into<String>) -> anyhow::Error {
        RandoError::GenerationFailed { detail: detail.into() }.into()
    }

    pub fn invariant(detail: impl Into<String>) -> anyhow::Error {
        RandoError::InvariantViolation { detail: detail.into() }.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failed_is_retryable() {
        let err = RandoError::GenerationFailed { detail: "no location".into() };
        assert!(err.is_retryable());
    }

    #[test]
    fn config_error_is_not_retryable() {
        let err = RandoError::ConfigError { detail: "bad option".into() };
        assert!(!err.is_retryable());
    }

    #[test]
    fn downcast_from_anyhow_recovers_variant() {
        let err = RandoError::generation_failed("progression item has no home");
        let recovered = err.downcast_ref::<RandoError>().unwrap();
        assert!(recovered.is_retryable());
    }
}
