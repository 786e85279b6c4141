use scour_java::{Delimiter, Group, Node, TokenKind};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "LiteralsFirstInComparisons";

const METHODS: &[&str] = &["equals", "equalsIgnoreCase"];

/// `s.equals("lit")` → `"lit".equals(s)`, which cannot throw on a null `s`.
pub struct LiteralsFirstInComparisons;

impl Mutator for LiteralsFirstInComparisons {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("PositionLiteralsFirstInComparisons")
            .alias("RSPEC-1132")
            .since(&[1])
            .stdlib_only()
            .describe("Put string literals first in equals() comparisons")
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            let Some(receiver) = scan::bare_receiver(nodes, i) else {
                return Ok(Step::Skip);
            };
            let is_call = nodes.get(i + 1).is_some_and(|n| n.is_punct("."))
                && nodes
                    .get(i + 2)
                    .is_some_and(|n| METHODS.iter().any(|m| n.is_ident(m)));
            if !is_call || !cx.symbols.is_declared_as(receiver, &["String"]) {
                return Ok(Step::Skip);
            }
            let Some(Node::Group(args)) = nodes.get(i + 3) else {
                return Ok(Step::Skip);
            };
            let literal_arg = args.delimiter == Delimiter::Parenthesis
                && args.children.len() == 1
                && args.children[0]
                    .as_token()
                    .is_some_and(|t| matches!(t.kind, TokenKind::Str | TokenKind::TextBlock));
            if !literal_arg {
                return Ok(Step::Skip);
            }
            if scan::interior_comments(&nodes[i..i + 4]) {
                return Ok(Step::Blocked(IssueKind::Replace));
            }

            // Swap the receiver and the literal argument in place
            let mut receiver_node = nodes[i].clone();
            let Some(Node::Group(args)) = nodes.get_mut(i + 3) else {
                return Err(MutatorError::internal(ID, "argument list vanished"));
            };
            *receiver_node.leading_mut() = args.children[0].take_leading();
            let literal = std::mem::replace(&mut args.children[0], receiver_node);
            scan::splice(nodes, i..i + 1, vec![literal], ID)?;
            Ok(Step::Rewrote)
        })
    }
}
