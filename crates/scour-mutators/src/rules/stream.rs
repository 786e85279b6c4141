use scour_java::{Delimiter, Group, Node, Token};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "StreamAnyMatch";

/// `.filter(p).findAny().isPresent()` → `.anyMatch(p)`
pub struct StreamAnyMatch;

impl Mutator for StreamAnyMatch {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .since(&[1, 8])
            .draft()
            .stdlib_only()
            .describe("Use anyMatch() instead of filtering and testing for a result")
    }

    fn apply(
        &self,
        node: &mut Group,
        _cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            let filters = nodes[i].is_punct(".")
                && nodes.get(i + 1).is_some_and(|n| n.is_ident("filter"))
                && nodes.get(i + 2).is_some_and(|n| {
                    n.as_group()
                        .is_some_and(|g| g.delimiter == Delimiter::Parenthesis && !g.is_empty())
                });
            if !filters {
                return Ok(Step::Skip);
            }
            let finds = scan::is_nullary_call(nodes, i + 3, "findAny")
                || scan::is_nullary_call(nodes, i + 3, "findFirst");
            if !finds || !scan::is_nullary_call(nodes, i + 6, "isPresent") {
                return Ok(Step::Skip);
            }
            // The predicate moves as a whole, its own comments included
            if nodes[i + 2].leading().has_comments()
                || nodes[i + 3..i + 9].iter().any(Node::has_comments)
            {
                return Ok(Step::Blocked(IssueKind::Replace));
            }

            let predicate = nodes[i + 2].clone();
            let replacement = vec![Node::Token(Token::ident("anyMatch")), predicate];
            scan::splice(nodes, i + 1..i + 9, replacement, ID)?;
            Ok(Step::Rewrote)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rewrite;

    fn run(src: &str) -> String {
        rewrite(StreamAnyMatch, src)
    }

    #[test]
    fn test_filter_find_present() {
        assert_eq!(
            run("boolean b = xs.stream().filter(x -> x > 0).findAny().isPresent();"),
            "boolean b = xs.stream().anyMatch(x -> x > 0);"
        );
        assert_eq!(
            run("return items.stream()\n    .filter(Item::isActive)\n    .findFirst()\n    .isPresent();"),
            "return items.stream()\n    .anyMatch(Item::isActive);"
        );
    }

    #[test]
    fn test_leaves_other_chains() {
        for src in [
            "xs.stream().filter(p).findAny();",
            "xs.stream().filter(p).findAny().get();",
            "xs.stream().filter().findAny().isPresent();",
            "xs.stream().map(f).findAny().isPresent();",
        ] {
            assert_eq!(run(src), src);
        }
    }
}
