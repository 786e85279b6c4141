use std::sync::Arc;

use scour_java::Group;

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, Mutator, MutatorContext, RegisteredMutator};
use crate::version::LanguageVersion;

/// A named bundle of mutators applied one after the other.
///
/// Members are shared with the catalog, so blocked matches land in the
/// members' own counters.
#[derive(Debug, Clone)]
pub struct CompositeMutator {
    meta: MutatorMeta,
    members: Vec<Arc<RegisteredMutator>>,
}

impl CompositeMutator {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        mut members: Vec<Arc<RegisteredMutator>>,
    ) -> Self {
        members.sort_by(|a, b| a.id().cmp(b.id()));
        members.dedup_by(|a, b| a.id() == b.id());

        let mut meta = MutatorMeta::new(id).describe(description);
        for member in &members {
            meta.ids.extend(member.ids().iter().cloned());
        }
        meta.min_version = members
            .iter()
            .map(|m| m.meta().min_version.clone())
            .max()
            .unwrap_or_else(LanguageVersion::default);
        meta.draft = members.iter().any(|m| m.meta().draft);
        meta.stdlib_only = !members.is_empty() && members.iter().all(|m| m.meta().stdlib_only);
        CompositeMutator { meta, members }
    }

    pub fn id(&self) -> &str {
        self.meta.primary_id().unwrap_or_default()
    }

    /// Members sorted by primary identifier
    pub fn members(&self) -> &[Arc<RegisteredMutator>] {
        &self.members
    }
}

impl Mutator for CompositeMutator {
    fn meta(&self) -> MutatorMeta {
        self.meta.clone()
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        // Every member gets its turn, even after one has applied
        let mut applied = false;
        for member in &self.members {
            applied |= member.apply(node, cx)?.changed();
        }
        Ok(if applied {
            ApplyOutcome::Applied
        } else {
            ApplyOutcome::NoMatch
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{BooleanLiteralComparison, UnnecessarySemicolon, UseDiamondOperator};
    use crate::testing::rewrite_registered;

    fn registered(m: impl Mutator + 'static) -> Arc<RegisteredMutator> {
        Arc::new(RegisteredMutator::new(Box::new(m)).unwrap())
    }

    #[test]
    fn test_members_are_sorted_and_meta_aggregated() {
        let composite = CompositeMutator::new(
            "Mixed",
            "",
            vec![
                registered(UseDiamondOperator),
                registered(BooleanLiteralComparison),
            ],
        );
        let ids: Vec<&str> = composite.members().iter().map(|m| m.id()).collect();
        assert_eq!(ids, ["BooleanLiteralComparison", "UseDiamondOperator"]);
        assert_eq!(composite.id(), "Mixed");

        let meta = composite.meta();
        assert_eq!(meta.ids[0], "Mixed");
        assert!(meta.has_id("RSPEC-1125"));
        assert_eq!(meta.min_version, LanguageVersion::from_parts(&[1, 7]));
        assert!(!meta.draft);
        assert!(!meta.stdlib_only);
    }

    #[test]
    fn test_every_member_applies() {
        let composite = CompositeMutator::new(
            "Both",
            "",
            vec![registered(UnnecessarySemicolon), registered(BooleanLiteralComparison)],
        );
        let composite = RegisteredMutator::new(Box::new(composite)).unwrap();
        assert_eq!(
            rewrite_registered(&composite, "void f() { g(a == true);; }"),
            "void f() { g(a); }"
        );
    }

    #[test]
    fn test_empty_composite_matches_nothing() {
        let composite = CompositeMutator::new("Empty", "", Vec::new());
        assert!(!composite.meta().stdlib_only);
        let composite = RegisteredMutator::new(Box::new(composite)).unwrap();
        assert_eq!(rewrite_registered(&composite, "a;;"), "a;;");
    }
}
