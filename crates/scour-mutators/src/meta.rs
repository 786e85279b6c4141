use serde::Serialize;

use crate::version::LanguageVersion;

/// Static facts about a mutator.
///
/// The first identifier is the primary one; the rest alias the same rule
/// in external catalogs (PMD rule names, Sonar `RSPEC-` keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutatorMeta {
    pub ids: Vec<String>,
    /// Lowest language version the rewritten code compiles on
    pub min_version: LanguageVersion,
    /// Not production ready yet
    pub draft: bool,
    /// Only needs the standard library to resolve the types it matches on
    pub stdlib_only: bool,
    pub description: String,
}

impl MutatorMeta {
    pub fn new(id: impl Into<String>) -> Self {
        MutatorMeta {
            ids: vec![id.into()],
            min_version: LanguageVersion::default(),
            draft: false,
            stdlib_only: false,
            description: String::new(),
        }
    }

    /// Metadata with no identifiers at all
    pub fn anonymous() -> Self {
        MutatorMeta {
            ids: Vec::new(),
            ..MutatorMeta::new("")
        }
    }

    pub fn alias(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    pub fn since(mut self, parts: &[u32]) -> Self {
        self.min_version = LanguageVersion::from_parts(parts);
        self
    }

    pub fn draft(mut self) -> Self {
        self.draft = true;
        self
    }

    pub fn stdlib_only(mut self) -> Self {
        self.stdlib_only = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn primary_id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn production_ready(&self) -> bool {
        !self.draft
    }
}
