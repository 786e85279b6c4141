use scour_java::{Group, Node, Token};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "OptionalNotEmpty";

const OPTIONAL_TYPES: &[&str] = &["Optional", "OptionalDouble", "OptionalInt", "OptionalLong"];

/// `!o.isPresent()` → `o.isEmpty()`
pub struct OptionalNotEmpty;

impl Mutator for OptionalNotEmpty {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("UseOptionalIsEmpty")
            .since(&[11])
            .stdlib_only()
            .describe("Use Optional.isEmpty() instead of negating isPresent()")
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            if !nodes[i].is_punct("!") {
                return Ok(Step::Skip);
            }
            let Some(receiver) = scan::bare_receiver(nodes, i + 1) else {
                return Ok(Step::Skip);
            };
            if !scan::is_nullary_call(nodes, i + 2, "isPresent")
                || nodes.get(i + 5).is_some_and(|n| n.is_punct("."))
                || !cx.symbols.is_declared_as(receiver, OPTIONAL_TYPES)
            {
                return Ok(Step::Skip);
            }
            if scan::interior_comments(&nodes[i..i + 5]) {
                return Ok(Step::Blocked(IssueKind::Replace));
            }

            let mut name = nodes[i + 1].clone();
            name.take_leading();
            let rest = nodes[i + 2].clone();
            let method = Node::Token(Token::ident("isEmpty"));
            let call = nodes[i + 4].clone();
            scan::splice(nodes, i..i + 5, vec![name, rest, method, call], ID)?;
            Ok(Step::Rewrote)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rewrite;

    fn run(src: &str) -> String {
        rewrite(OptionalNotEmpty, src)
    }

    #[test]
    fn test_negated_is_present() {
        assert_eq!(
            run("Optional<User> user; if (!user.isPresent()) { return; }"),
            "Optional<User> user; if (user.isEmpty()) { return; }"
        );
        assert_eq!(
            run("OptionalInt n; boolean b = a && !n.isPresent();"),
            "OptionalInt n; boolean b = a && n.isEmpty();"
        );
    }

    #[test]
    fn test_leaves_other_receivers() {
        for src in [
            "Optional<User> user; if (user.isPresent()) {}",
            "Guava g; if (!g.isPresent()) {}",
            "Optional<User> user; if (!this.user.isPresent()) {}",
        ] {
            assert_eq!(run(src), src);
        }
    }
}
