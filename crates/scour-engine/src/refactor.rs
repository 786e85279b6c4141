use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use scour_java::AstDocument;
use scour_mutators::{RegisteredMutator, apply_to_document};
use tracing::instrument;

use crate::error::EngineError;

/// Result of running a set of mutators over one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refactored<'a> {
    /// The regenerated text, or the untouched input when nothing fired
    pub text: Cow<'a, str>,
    pub changed: bool,
    /// Primary ids of the mutators that changed something, in order
    pub fired: Vec<String>,
}

/// Apply `mutators` in order to `source`.
///
/// Each mutator sees every group of the current document. A mutator that
/// changes something invalidates the document: its text is regenerated and
/// reparsed under the next generation before the following mutator runs,
/// so reparsing costs one parse per mutator that fired.
#[instrument(name = "refactor", skip_all, fields(mutators = mutators.len()))]
pub fn refactor<'a>(
    source: &'a str,
    mutators: &[Arc<RegisteredMutator>],
) -> Result<Refactored<'a>, EngineError> {
    let mut doc = AstDocument::parse(source)?;
    let mut latest: Option<String> = None;
    let mut fired = Vec::new();

    for mutator in mutators {
        if !apply_guarded(mutator, &mut doc)? {
            continue;
        }
        let text = doc.print();
        log::debug!(
            "{} changed the document at generation {}",
            mutator.id(),
            doc.generation().get()
        );
        doc = doc
            .reparse(&text)
            .map_err(|source| EngineError::Regeneration {
                mutator: mutator.id().to_string(),
                source,
            })?;
        fired.push(mutator.id().to_string());
        latest = Some(text);
    }

    Ok(match latest {
        Some(text) => Refactored {
            text: Cow::Owned(text),
            changed: true,
            fired,
        },
        None => Refactored {
            text: Cow::Borrowed(source),
            changed: false,
            fired,
        },
    })
}

/// Run one mutator, turning a panic into an error for this file only.
fn apply_guarded(mutator: &RegisteredMutator, doc: &mut AstDocument) -> Result<bool, EngineError> {
    match panic::catch_unwind(AssertUnwindSafe(|| apply_to_document(mutator, doc))) {
        Ok(result) => Ok(result?),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            log::error!("Mutator {} panicked: {message}", mutator.id());
            Err(EngineError::MutatorPanicked {
                mutator: mutator.id().to_string(),
                message,
            })
        }
    }
}
