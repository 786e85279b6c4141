//! Resolving the mutators to run for one invocation.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::SelectionError;
use crate::mutator::RegisteredMutator;
use crate::version::LanguageVersion;

/// Include identifier that selects every mutator
pub const WILDCARD: &str = "*";

/// Filter `mutators` down to the ones to run, sorted by primary identifier.
///
/// Excludes always win over includes, and an empty include set means
/// every mutator valid for `version`.
pub fn select(
    mutators: &[Arc<RegisteredMutator>],
    version: &LanguageVersion,
    includes: &BTreeSet<String>,
    excludes: &BTreeSet<String>,
    production_ready_only: bool,
) -> Vec<Arc<RegisteredMutator>> {
    let include_all = includes.is_empty() || includes.contains(WILDCARD);
    let mut selected: Vec<Arc<RegisteredMutator>> = mutators
        .iter()
        .filter(|m| &m.meta().min_version <= version)
        .filter(|m| !m.ids().iter().any(|id| excludes.contains(id)))
        .filter(|m| include_all || m.ids().iter().any(|id| includes.contains(id)))
        .filter(|m| !production_ready_only || m.meta().production_ready())
        .cloned()
        .collect();
    selected.sort_by(|a, b| a.id().cmp(b.id()));
    selected
}

/// User supplied selection settings, before resolution against a catalog.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub version: LanguageVersion,
    pub includes: BTreeSet<String>,
    pub excludes: BTreeSet<String>,
    pub production_ready_only: bool,
}

impl SelectionConfig {
    /// Production ready mutators for `version`, nothing included or
    /// excluded explicitly.
    pub fn new(version: &str) -> Result<Self, SelectionError> {
        Ok(Self::for_version(version.parse()?))
    }

    pub fn for_version(version: LanguageVersion) -> Self {
        SelectionConfig {
            version,
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
            production_ready_only: true,
        }
    }

    pub fn include<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.includes.extend(clean_ids(ids));
        self
    }

    pub fn exclude<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excludes.extend(clean_ids(ids));
        self
    }

    pub fn production_ready_only(mut self, only: bool) -> Self {
        self.production_ready_only = only;
        self
    }
}

fn clean_ids<I, S>(ids: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty())
}

/// The resolved, ordered set of mutators for one run.
#[derive(Debug, Clone)]
pub struct RuleSelection {
    mutators: Vec<Arc<RegisteredMutator>>,
    version: LanguageVersion,
    includes: BTreeSet<String>,
    excludes: BTreeSet<String>,
}

impl RuleSelection {
    /// Resolve `config` against `catalog`.
    ///
    /// Composite identifiers expand into their members for the target
    /// version, so a single member can still be excluded.
    pub fn resolve(catalog: &Catalog, config: &SelectionConfig) -> Result<Self, SelectionError> {
        let includes = expand(catalog, &config.includes, &config.version)?;
        let excludes = expand(catalog, &config.excludes, &config.version)?;
        // A composite that resolved to no member selects nothing
        let mutators = if includes.is_empty() && !config.includes.is_empty() {
            Vec::new()
        } else {
            select(
                catalog.mutators(),
                &config.version,
                &includes,
                &excludes,
                config.production_ready_only,
            )
        };
        log::debug!(
            "Selected {} mutators for language version {}",
            mutators.len(),
            config.version
        );
        Ok(RuleSelection {
            mutators,
            version: config.version.clone(),
            includes,
            excludes,
        })
    }

    /// A selection of exactly `mutators`, in the given order
    pub fn from_mutators(version: LanguageVersion, mutators: Vec<Arc<RegisteredMutator>>) -> Self {
        RuleSelection {
            mutators,
            version,
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
        }
    }

    pub fn mutators(&self) -> &[Arc<RegisteredMutator>] {
        &self.mutators
    }

    pub fn version(&self) -> &LanguageVersion {
        &self.version
    }

    /// Include identifiers after composite expansion
    pub fn includes(&self) -> &BTreeSet<String> {
        &self.includes
    }

    pub fn excludes(&self) -> &BTreeSet<String> {
        &self.excludes
    }

    /// Primary identifiers of the selected mutators
    pub fn ids(&self) -> Vec<&str> {
        self.mutators.iter().map(|m| m.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }
}

/// Replace composite ids by their members' primary ids and reject unknown ids.
fn expand(
    catalog: &Catalog,
    ids: &BTreeSet<String>,
    version: &LanguageVersion,
) -> Result<BTreeSet<String>, SelectionError> {
    let mut expanded = BTreeSet::new();
    for id in ids {
        if id == WILDCARD || catalog.get(id).is_some() {
            expanded.insert(id.clone());
        } else if catalog.is_composite(id) {
            let composite = catalog.composite(id, Some(version))?;
            expanded.extend(composite.members().iter().map(|m| m.id().to_string()));
        } else {
            return Err(SelectionError::UnknownIdentifier(id.clone()));
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load().unwrap()
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_version_gating() {
        let catalog = catalog();
        let v: LanguageVersion = "1.6".parse().unwrap();
        let selected = select(catalog.mutators(), &v, &set(&[]), &set(&[]), false);
        let ids: Vec<&str> = selected.iter().map(|m| m.id()).collect();
        assert!(ids.contains(&"StringIsEmpty"));
        assert!(!ids.contains(&"UseDiamondOperator"));
        assert!(!ids.contains(&"OptionalNotEmpty"));

        // Missing components count as zero
        let v: LanguageVersion = "1.7.0".parse().unwrap();
        let selected = select(catalog.mutators(), &v, &set(&["UseDiamondOperator"]), &set(&[]), true);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let catalog = catalog();
        let v: LanguageVersion = "17".parse().unwrap();
        let selected = select(
            catalog.mutators(),
            &v,
            &set(&["UseDiamondOperator", "RSPEC-1155"]),
            &set(&["RSPEC-2293"]),
            true,
        );
        let ids: Vec<&str> = selected.iter().map(|m| m.id()).collect();
        assert_eq!(ids, ["CollectionIsEmpty"]);
    }

    #[test]
    fn test_wildcard_and_drafts() {
        let catalog = catalog();
        let v: LanguageVersion = "21".parse().unwrap();
        let ready = select(catalog.mutators(), &v, &set(&["*"]), &set(&[]), true);
        let all = select(catalog.mutators(), &v, &set(&["*", "UseVar"]), &set(&[]), false);
        assert_eq!(all.len(), catalog.mutators().len());
        assert_eq!(ready.len(), all.len() - 2);
        assert!(ready.iter().all(|m| !m.meta().draft));
    }

    #[test]
    fn test_resolve_expands_composites() {
        let catalog = catalog();
        let config = SelectionConfig::new("1.8")
            .unwrap()
            .include(["SafeAndConsensual"])
            .exclude(["UnnecessarySemicolon"]);
        let selection = RuleSelection::resolve(&catalog, &config).unwrap();
        assert_eq!(
            selection.ids(),
            [
                "BooleanLiteralComparison",
                "CollectionIsEmpty",
                "PrimitiveWrapperInstantiation",
                "StringIsEmpty",
                "UseDiamondOperator",
            ]
        );
        assert_eq!(selection.version().to_string(), "1.8");
    }

    #[test]
    fn test_resolve_rejects_unknown_ids() {
        let catalog = catalog();
        let config = SelectionConfig::new("11").unwrap().include(["NoSuchRule"]);
        assert_eq!(
            RuleSelection::resolve(&catalog, &config).unwrap_err(),
            SelectionError::UnknownIdentifier("NoSuchRule".into())
        );
        let config = SelectionConfig::new("11").unwrap().exclude(["Typo"]);
        assert!(RuleSelection::resolve(&catalog, &config).is_err());
        assert!(matches!(
            SelectionConfig::new("eleven"),
            Err(SelectionError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_empty_include_means_everything_ready() {
        let catalog = catalog();
        let config = SelectionConfig::new("11").unwrap();
        let selection = RuleSelection::resolve(&catalog, &config).unwrap();
        assert!(!selection.is_empty());
        assert!(!selection.ids().contains(&"LocalVariableTypeInference"));
        assert!(selection.ids().contains(&"OptionalNotEmpty"));

        // Only members valid for the version are expanded
        let config = SelectionConfig::new("1")
            .unwrap()
            .include(["SafeButNotConsensual"]);
        let selection = RuleSelection::resolve(&catalog, &config).unwrap();
        assert_eq!(selection.ids(), ["LiteralsFirstInComparisons"]);
    }
}
