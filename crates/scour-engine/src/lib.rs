//! The per-file cleaning pipeline.
//!
//! [`refactor`] applies the selected mutators to a parsed document, and
//! [`reconcile`] folds the regenerated text back into the original so that
//! only the mutators' edits survive. [`Cleaner`] runs both for a batch of
//! files sharing one rule selection.

mod clean;
mod error;
mod normalize;
mod reconcile;
mod refactor;

pub use clean::{CleanOptions, CleanRequest, Cleaned, Cleaner, clean_source};
pub use error::{CleanError, EngineError, ReconcileError};
pub use normalize::StyleNormalizer;
pub use reconcile::{Hunk, HunkKind, Patch, ReconciledPatch, reconcile};
pub use refactor::{Refactored, refactor};
