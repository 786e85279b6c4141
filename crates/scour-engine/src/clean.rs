use std::borrow::Cow;
use std::collections::BTreeSet;

use scour_java::LineEndingHint;
use scour_mutators::{Catalog, RuleSelection, SelectionConfig};
use tracing::instrument;

use crate::error::CleanError;
use crate::normalize::StyleNormalizer;
use crate::reconcile::reconcile;
use crate::refactor::refactor;

/// Everything needed to clean one source text
#[derive(Debug, Clone)]
pub struct CleanRequest<'a> {
    pub source: &'a str,
    pub language_version: String,
    pub includes: BTreeSet<String>,
    pub excludes: BTreeSet<String>,
    pub production_ready_only: bool,
    pub line_ending: LineEndingHint,
}

impl<'a> CleanRequest<'a> {
    pub fn new(source: &'a str, language_version: impl Into<String>) -> Self {
        CleanRequest {
            source,
            language_version: language_version.into(),
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
            production_ready_only: true,
            line_ending: LineEndingHint::default(),
        }
    }

    pub fn include(mut self, id: impl Into<String>) -> Self {
        self.includes.insert(id.into());
        self
    }

    pub fn exclude(mut self, id: impl Into<String>) -> Self {
        self.excludes.insert(id.into());
        self
    }

    pub fn with_drafts(mut self) -> Self {
        self.production_ready_only = false;
        self
    }

    pub fn line_ending(mut self, hint: LineEndingHint) -> Self {
        self.line_ending = hint;
        self
    }

    fn selection_config(&self) -> Result<SelectionConfig, CleanError> {
        Ok(SelectionConfig::new(&self.language_version)?
            .include(&self.includes)
            .exclude(&self.excludes)
            .production_ready_only(self.production_ready_only))
    }
}

/// Per-run settings of a [`Cleaner`] besides the rule selection
#[derive(Default)]
pub struct CleanOptions {
    pub line_ending: LineEndingHint,
    pub normalizer: Option<Box<dyn StyleNormalizer>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned<'a> {
    pub text: Cow<'a, str>,
    pub changed: bool,
    /// Primary ids of the mutators that changed the source
    pub fired: Vec<String>,
}

/// Cleans any number of sources with one resolved rule selection.
pub struct Cleaner {
    selection: RuleSelection,
    options: CleanOptions,
}

impl Cleaner {
    pub fn new(selection: RuleSelection, options: CleanOptions) -> Self {
        Cleaner { selection, options }
    }

    pub fn selection(&self) -> &RuleSelection {
        &self.selection
    }

    /// Refactor `source` and reconcile the result against it.
    #[instrument(name = "clean_source", skip_all, fields(bytes = source.len()))]
    pub fn clean<'a>(&self, source: &'a str) -> Result<Cleaned<'a>, CleanError> {
        let refactored = refactor(source, self.selection.mutators())?;
        if !refactored.changed {
            return Ok(unchanged(source));
        }
        let reconciled = reconcile(
            source,
            &refactored.text,
            self.options.line_ending,
            self.options.normalizer.as_deref(),
        )?;
        if reconciled == source {
            log::debug!("All edits were absorbed by reconciliation");
            return Ok(unchanged(source));
        }
        Ok(Cleaned {
            text: Cow::Owned(reconciled.into_owned()),
            changed: true,
            fired: refactored.fired,
        })
    }
}

fn unchanged(source: &str) -> Cleaned<'_> {
    Cleaned {
        text: Cow::Borrowed(source),
        changed: false,
        fired: Vec::new(),
    }
}

/// Clean a single source text, resolving its rule selection first.
pub fn clean_source<'a>(
    catalog: &Catalog,
    request: &CleanRequest<'a>,
    normalizer: Option<Box<dyn StyleNormalizer>>,
) -> Result<Cleaned<'a>, CleanError> {
    let selection = RuleSelection::resolve(catalog, &request.selection_config()?)?;
    let cleaner = Cleaner::new(
        selection,
        CleanOptions {
            line_ending: request.line_ending,
            normalizer,
        },
    );
    cleaner.clean(request.source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_source() {
        let catalog = Catalog::load().unwrap();
        let request = CleanRequest::new("class A {\n  boolean f() { return a == true; }\n}\n", "8");
        let cleaned = clean_source(&catalog, &request, None).unwrap();
        assert!(cleaned.changed);
        assert_eq!(cleaned.text, "class A {\n  boolean f() { return a; }\n}\n");
        assert_eq!(cleaned.fired, ["BooleanLiteralComparison"]);
    }

    #[test]
    fn test_invalid_configuration() {
        let catalog = Catalog::load().unwrap();
        let request = CleanRequest::new("a;", "8").include("Nope");
        assert!(matches!(
            clean_source(&catalog, &request, None),
            Err(CleanError::Selection(_))
        ));
        let request = CleanRequest::new("a;", "java8");
        assert!(clean_source(&catalog, &request, None).is_err());
    }
}
