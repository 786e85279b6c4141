//! Helpers shared by the integration tests of the scour crates.

pub mod fixture;
pub mod snapdir;

pub use fixture::{assert_rewrites, assert_unchanged, catalog_mutator};
pub use snapdir::{JavaTree, dir_manifest};
