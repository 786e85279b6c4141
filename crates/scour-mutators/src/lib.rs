//! Versioned catalog of source rewrite rules.
//!
//! A [`Mutator`] rewrites one token-tree group at a time. Mutators are
//! registered in the [`Catalog`] together with their [`MutatorMeta`], can be
//! bundled into a [`CompositeMutator`], and are picked for a run by
//! [`RuleSelection::resolve`].

mod catalog;
mod composite;
mod error;
mod meta;
mod mutator;
pub mod rules;
mod scan;
mod select;
pub mod testing;
mod version;

pub use catalog::{Catalog, CompositeFactory};
pub use composite::CompositeMutator;
pub use error::{CatalogError, MutatorError, SelectionError, VersionError};
pub use meta::MutatorMeta;
pub use mutator::{
    ApplyOutcome, IssueCounters, IssueKind, Mutator, MutatorContext, RegisteredMutator,
    apply_to_document,
};
pub use select::{RuleSelection, SelectionConfig, WILDCARD, select};
pub use version::LanguageVersion;
