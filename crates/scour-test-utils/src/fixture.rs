//! Before/after fixtures for single mutators.
//!
//! Every rewrite is checked for idempotency as well: the mutator must leave
//! its own output alone.

use std::sync::Arc;

use scour_mutators::testing::{check_idempotency, rewrite_source};
use scour_mutators::{Catalog, RegisteredMutator};

/// The catalog mutator registered under `id` (any alias works).
pub fn catalog_mutator(id: &str) -> Arc<RegisteredMutator> {
    let catalog = Catalog::load().expect("built-in catalog is valid");
    catalog
        .get(id)
        .unwrap_or_else(|| panic!("no mutator with id {id}"))
        .clone()
}

/// Assert that `mutator` turns `before` into exactly `after`.
#[track_caller]
pub fn assert_rewrites(mutator: &RegisteredMutator, before: &str, after: &str) {
    let out = rewrite_source(mutator, before)
        .unwrap_or_else(|e| panic!("{} failed on {before:?}: {e}", mutator.id()))
        .unwrap_or_else(|| panic!("{} did not rewrite {before:?}", mutator.id()));
    assert_eq!(out, after, "{} rewrote {before:?}", mutator.id());
    let idempotent = check_idempotency(mutator, &out).expect("rewritten source parses");
    assert!(idempotent, "{} is not idempotent on {out:?}", mutator.id());
}

/// Assert that `mutator` leaves already clean `source` alone.
#[track_caller]
pub fn assert_unchanged(mutator: &RegisteredMutator, source: &str) {
    let out = rewrite_source(mutator, source)
        .unwrap_or_else(|e| panic!("{} failed on {source:?}: {e}", mutator.id()));
    assert_eq!(out, None, "{} changed clean source", mutator.id());
}
