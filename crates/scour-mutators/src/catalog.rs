//! The compiled-in registry of mutators and composites.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::composite::CompositeMutator;
use crate::error::CatalogError;
use crate::mutator::{Mutator, RegisteredMutator};
use crate::rules::SINGLE_MUTATORS;
use crate::version::LanguageVersion;

/// Constructor entry for one single mutator
pub(crate) struct MutatorFactory {
    /// Name used in errors when the mutator itself declares no identifier
    pub(crate) name: &'static str,
    pub(crate) build: fn() -> Box<dyn Mutator>,
}

/// How a composite picks its members from the single mutators
#[derive(Debug, Clone, Copy)]
pub(crate) enum CompositeMembers {
    Ids(&'static [&'static str]),
    /// Every mutator with an identifier starting with the prefix
    AliasPrefix(&'static str),
    All,
}

#[derive(Debug)]
pub struct CompositeFactory {
    pub(crate) id: &'static str,
    pub(crate) description: &'static str,
    /// Members are filtered by the target language version
    pub(crate) needs_version: bool,
    pub(crate) members: CompositeMembers,
}

impl CompositeFactory {
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn needs_version(&self) -> bool {
        self.needs_version
    }
}

static COMPOSITES: &[CompositeFactory] = &[
    CompositeFactory {
        id: "SafeAndConsensual",
        description: "Production ready rewrites nobody argues about",
        needs_version: true,
        members: CompositeMembers::Ids(&[
            "BooleanLiteralComparison",
            "CollectionIsEmpty",
            "OptionalNotEmpty",
            "PrimitiveWrapperInstantiation",
            "StringIsEmpty",
            "UnnecessarySemicolon",
            "UseDiamondOperator",
        ]),
    },
    CompositeFactory {
        id: "SafeButNotConsensual",
        description: "Safe rewrites that change a team's habits",
        needs_version: true,
        members: CompositeMembers::Ids(&[
            "LiteralsFirstInComparisons",
            "LocalVariableTypeInference",
        ]),
    },
    CompositeFactory {
        id: "PMD",
        description: "Mutators fixing PMD rule violations",
        needs_version: false,
        members: CompositeMembers::Ids(&[
            "BooleanLiteralComparison",
            "CollectionIsEmpty",
            "LiteralsFirstInComparisons",
            "PrimitiveWrapperInstantiation",
            "UnnecessarySemicolon",
            "UseDiamondOperator",
        ]),
    },
    CompositeFactory {
        id: "Sonar",
        description: "Mutators fixing SonarQube rule violations",
        needs_version: false,
        members: CompositeMembers::AliasPrefix("RSPEC-"),
    },
    CompositeFactory {
        id: "AllIncludingDraft",
        description: "Every mutator, drafts included",
        needs_version: false,
        members: CompositeMembers::All,
    },
];

/// Validated set of every registered mutator, sorted by primary identifier.
pub struct Catalog {
    mutators: Vec<Arc<RegisteredMutator>>,
    /// Every identifier, aliases included, to its index in `mutators`
    by_id: HashMap<String, usize>,
    composites: &'static [CompositeFactory],
}

impl Catalog {
    /// Build and validate the compiled-in catalog.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_factories(SINGLE_MUTATORS, COMPOSITES)
    }

    pub(crate) fn from_factories(
        singles: &[MutatorFactory],
        composites: &'static [CompositeFactory],
    ) -> Result<Self, CatalogError> {
        let mut mutators = singles
            .iter()
            .map(|f| RegisteredMutator::labelled(f.name, (f.build)()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        mutators.sort_by(|a, b| a.id().cmp(b.id()));

        let mut by_id: HashMap<String, usize> = HashMap::new();
        for (index, mutator) in mutators.iter().enumerate() {
            for id in mutator.ids().iter().filter(|id| !id.trim().is_empty()) {
                if let Some(&first) = by_id.get(id) {
                    return Err(CatalogError::DuplicateIdentifier {
                        id: id.clone(),
                        first: mutators[first].id().to_string(),
                        second: mutator.id().to_string(),
                    });
                }
                by_id.insert(id.clone(), index);
            }
        }

        let mut composite_ids = HashSet::new();
        for composite in composites {
            if let Some(&owner) = by_id.get(composite.id) {
                return Err(CatalogError::DuplicateIdentifier {
                    id: composite.id.to_string(),
                    first: mutators[owner].id().to_string(),
                    second: composite.id.to_string(),
                });
            }
            if !composite_ids.insert(composite.id) {
                return Err(CatalogError::DuplicateIdentifier {
                    id: composite.id.to_string(),
                    first: composite.id.to_string(),
                    second: composite.id.to_string(),
                });
            }
            if let CompositeMembers::Ids(members) = composite.members {
                if let Some(missing) = members.iter().find(|m| !by_id.contains_key(**m)) {
                    return Err(CatalogError::UnknownMember {
                        composite: composite.id.to_string(),
                        member: missing.to_string(),
                    });
                }
            }
        }

        log::debug!(
            "Loaded catalog with {} mutators and {} composites",
            mutators.len(),
            composites.len()
        );
        Ok(Catalog {
            mutators,
            by_id,
            composites,
        })
    }

    /// Every single-mutator identifier, aliases included
    pub fn available_mutator_ids(&self) -> BTreeSet<String> {
        self.by_id.keys().cloned().collect()
    }

    pub fn available_composite_ids(&self) -> BTreeSet<String> {
        self.composites.iter().map(|c| c.id.to_string()).collect()
    }

    pub fn mutators(&self) -> &[Arc<RegisteredMutator>] {
        &self.mutators
    }

    pub fn composite_factories(&self) -> &[CompositeFactory] {
        self.composites
    }

    /// Look a single mutator up by any of its identifiers.
    pub fn get(&self, id: &str) -> Option<&Arc<RegisteredMutator>> {
        self.by_id.get(id).map(|&i| &self.mutators[i])
    }

    pub fn is_composite(&self, id: &str) -> bool {
        self.composites.iter().any(|c| c.id == id)
    }

    /// Build composite `id`. Composites that depend on the target language
    /// fail without a `version`.
    pub fn composite(
        &self,
        id: &str,
        version: Option<&LanguageVersion>,
    ) -> Result<CompositeMutator, CatalogError> {
        let factory = self
            .composites
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::UnknownComposite(id.to_string()))?;
        let version = match (factory.needs_version, version) {
            (true, None) => {
                return Err(CatalogError::MissingParameter {
                    composite: id.to_string(),
                    parameter: "language version",
                });
            }
            (true, Some(v)) => Some(v),
            (false, _) => None,
        };

        let mut members: Vec<Arc<RegisteredMutator>> = match factory.members {
            CompositeMembers::Ids(ids) => ids
                .iter()
                .filter_map(|member| self.get(member))
                .cloned()
                .collect(),
            CompositeMembers::AliasPrefix(prefix) => self
                .mutators
                .iter()
                .filter(|m| m.ids().iter().any(|i| i.starts_with(prefix)))
                .cloned()
                .collect(),
            CompositeMembers::All => self.mutators.clone(),
        };
        if let Some(version) = version {
            members.retain(|m| &m.meta().min_version <= version);
        }
        Ok(CompositeMutator::new(
            factory.id,
            factory.description,
            members,
        ))
    }
}
