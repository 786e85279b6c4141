use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use scour_java::{AstDocument, Group, WalkCtx};
use serde::Serialize;

use crate::error::{CatalogError, MutatorError};
use crate::meta::MutatorMeta;

/// Read-only document facts a mutator sees next to its match root.
pub type MutatorContext<'a> = WalkCtx<'a>;

/// Why a matched pattern was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    /// The replacement could not be built (e.g. comments inside the match)
    Replace,
    /// Nodes could not be removed without losing comments
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    NoMatch,
    Applied,
    MatchedButCouldNotApply(IssueKind),
}

impl ApplyOutcome {
    pub fn changed(self) -> bool {
        self == ApplyOutcome::Applied
    }
}

/// A single stateless rewrite rule.
///
/// `apply` is offered one group at a time and may only edit that group's
/// children. Applying a mutator to its own output must not change it again.
pub trait Mutator: Send + Sync {
    fn meta(&self) -> MutatorMeta;

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError>;
}

/// Per-mutator quality telemetry, shared across threads.
#[derive(Debug, Default)]
pub struct IssueCounters {
    idempotency: AtomicU64,
    replace: AtomicU64,
    remove: AtomicU64,
}

impl IssueCounters {
    pub fn record(&self, kind: IssueKind) {
        let counter = match kind {
            IssueKind::Replace => &self.replace,
            IssueKind::Remove => &self.remove,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_idempotency(&self) {
        self.idempotency.fetch_add(1, Ordering::Relaxed);
    }

    pub fn idempotency_issues(&self) -> u64 {
        self.idempotency.load(Ordering::Relaxed)
    }

    pub fn replace_issues(&self) -> u64 {
        self.replace.load(Ordering::Relaxed)
    }

    pub fn remove_issues(&self) -> u64 {
        self.remove.load(Ordering::Relaxed)
    }
}

/// A mutator together with its validated metadata and telemetry.
pub struct RegisteredMutator {
    meta: MutatorMeta,
    rule: Box<dyn Mutator>,
    issues: IssueCounters,
}

impl RegisteredMutator {
    pub fn new(rule: Box<dyn Mutator>) -> Result<Self, CatalogError> {
        Self::labelled("<unnamed>", rule)
    }

    /// Register `rule`, naming it `label` in errors.
    pub fn labelled(label: &str, rule: Box<dyn Mutator>) -> Result<Self, CatalogError> {
        let meta = rule.meta();
        if meta.ids.iter().all(|id| id.trim().is_empty()) {
            return Err(CatalogError::MissingIdentifier {
                factory: label.to_string(),
            });
        }
        Ok(RegisteredMutator {
            meta,
            rule,
            issues: IssueCounters::default(),
        })
    }

    /// Primary identifier
    pub fn id(&self) -> &str {
        self.meta.primary_id().unwrap_or_default()
    }

    pub fn ids(&self) -> &[String] {
        &self.meta.ids
    }

    pub fn meta(&self) -> &MutatorMeta {
        &self.meta
    }

    pub fn issues(&self) -> &IssueCounters {
        &self.issues
    }

    pub fn idempotency_issues(&self) -> u64 {
        self.issues.idempotency_issues()
    }

    pub fn replace_issues(&self) -> u64 {
        self.issues.replace_issues()
    }

    pub fn remove_issues(&self) -> u64 {
        self.issues.remove_issues()
    }

    /// Run the rule on one group, recording blocked matches.
    pub fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        let outcome = self.rule.apply(node, cx)?;
        if let ApplyOutcome::MatchedButCouldNotApply(kind) = outcome {
            log::debug!("{}: matched but could not apply ({kind:?})", self.id());
            self.issues.record(kind);
        }
        Ok(outcome)
    }
}

impl fmt::Debug for RegisteredMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredMutator")
            .field("meta", &self.meta)
            .field("issues", &self.issues)
            .finish()
    }
}

/// Offer every group of `doc` to `mutator`. Returns true if anything changed.
pub fn apply_to_document(
    mutator: &RegisteredMutator,
    doc: &mut AstDocument,
) -> Result<bool, MutatorError> {
    let mut first_hit = None;
    let changed = doc.walk_mut(|group, cx| {
        let changed = mutator.apply(group, cx)?.changed();
        if changed && first_hit.is_none() {
            first_hit = Some(group.span.start);
        }
        Ok(changed)
    })?;
    if let Some(offset) = first_hit {
        let at = doc.line_index().location(doc.source(), offset);
        log::debug!(
            "{} rewrote code in the group at {at} (generation {})",
            mutator.id(),
            doc.generation().get()
        );
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scour_java::{Node, Token};

    struct Renamer;

    impl Mutator for Renamer {
        fn meta(&self) -> MutatorMeta {
            MutatorMeta::new("Renamer")
        }

        fn apply(
            &self,
            node: &mut Group,
            _cx: &MutatorContext<'_>,
        ) -> Result<ApplyOutcome, MutatorError> {
            let mut outcome = ApplyOutcome::NoMatch;
            for child in &mut node.children {
                if child.is_ident("old") {
                    let leading = child.take_leading();
                    *child = Node::Token(Token::ident("new_").with_leading(leading));
                    outcome = ApplyOutcome::Applied;
                } else if child.is_ident("stuck") {
                    outcome = ApplyOutcome::MatchedButCouldNotApply(IssueKind::Remove);
                }
            }
            Ok(outcome)
        }
    }

    struct Nameless;

    impl Mutator for Nameless {
        fn meta(&self) -> MutatorMeta {
            MutatorMeta::anonymous()
        }

        fn apply(&self, _: &mut Group, _: &MutatorContext<'_>) -> Result<ApplyOutcome, MutatorError> {
            Ok(ApplyOutcome::NoMatch)
        }
    }

    #[test]
    fn test_apply_to_document_walks_nested_groups() {
        let m = RegisteredMutator::new(Box::new(Renamer)).unwrap();
        let mut doc = AstDocument::parse("f(g(old), old);").unwrap();
        assert!(apply_to_document(&m, &mut doc).unwrap());
        assert_eq!(doc.print(), "f(g(new_), new_);");
        assert_eq!(m.remove_issues(), 0);
    }

    #[test]
    fn test_blocked_matches_are_counted() {
        let m = RegisteredMutator::new(Box::new(Renamer)).unwrap();
        let mut doc = AstDocument::parse("{ stuck } ( stuck )").unwrap();
        assert!(!apply_to_document(&m, &mut doc).unwrap());
        assert_eq!(m.remove_issues(), 2);
        assert_eq!(m.replace_issues(), 0);
        assert_eq!(m.idempotency_issues(), 0);
    }

    #[test]
    fn test_mutator_without_ids_is_rejected() {
        let err = RegisteredMutator::labelled("Nameless", Box::new(Nameless)).unwrap_err();
        assert_eq!(
            err,
            CatalogError::MissingIdentifier {
                factory: "Nameless".into()
            }
        );
    }
}
