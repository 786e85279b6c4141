use scour_java::ParseError;
use scour_mutators::{MutatorError, SelectionError};
use thiserror::Error;

/// A file could not be refactored. The original text is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("failed to parse source: {0}")]
    Parse(#[from] ParseError),

    /// The printer produced text that no longer parses
    #[error("text regenerated after '{mutator}' does not parse: {source}")]
    Regeneration {
        mutator: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Mutator(#[from] MutatorError),

    #[error("mutator '{mutator}' panicked: {message}")]
    MutatorPanicked { mutator: String, message: String },
}

impl EngineError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, EngineError::Parse(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The line diff does not reproduce both of its inputs
    #[error("line diff does not round-trip ({direction})")]
    RoundTrip { direction: &'static str },

    #[error("hunk at line {line} does not apply: {reason}")]
    Apply { line: usize, reason: String },

    #[error("style normaliser failed: {0}")]
    Normalize(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleanError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}
