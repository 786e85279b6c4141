//! Running a single mutator over source text, outside the engine.

use scour_java::{AstDocument, ParseError};
use thiserror::Error;

use crate::error::MutatorError;
use crate::mutator::{RegisteredMutator, apply_to_document};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mutator(#[from] MutatorError),
}

/// Apply `mutator` to `source` once. Returns the regenerated text if the
/// mutator changed anything.
pub fn rewrite_source(
    mutator: &RegisteredMutator,
    source: &str,
) -> Result<Option<String>, HarnessError> {
    let mut doc = AstDocument::parse(source)?;
    if apply_to_document(mutator, &mut doc)? {
        Ok(Some(doc.print()))
    } else {
        Ok(None)
    }
}

/// Check that a second application of `mutator` to its own output is a
/// no-op. A violation is counted on the mutator and reported as `false`.
pub fn check_idempotency(mutator: &RegisteredMutator, source: &str) -> Result<bool, HarnessError> {
    let Some(once) = rewrite_source(mutator, source)? else {
        return Ok(true);
    };
    match rewrite_source(mutator, &once)? {
        None => Ok(true),
        Some(twice) => {
            log::warn!(
                "{} is not idempotent: a second pass changed {} bytes into {}",
                mutator.id(),
                once.len(),
                twice.len()
            );
            mutator.issues().record_idempotency();
            Ok(false)
        }
    }
}

/// Rewrite `source` with `mutator`, returning the source itself when
/// nothing matched. Panics on errors.
#[cfg(test)]
pub(crate) fn rewrite(mutator: impl crate::Mutator + 'static, source: &str) -> String {
    let registered = RegisteredMutator::new(Box::new(mutator)).unwrap();
    rewrite_registered(&registered, source)
}

#[cfg(test)]
pub(crate) fn rewrite_registered(mutator: &RegisteredMutator, source: &str) -> String {
    match rewrite_source(mutator, source).unwrap() {
        None => source.to_string(),
        Some(out) => {
            let again = rewrite_source(mutator, &out).unwrap();
            assert_eq!(again, None, "{} is not idempotent on {out:?}", mutator.id());
            out
        }
    }
}
