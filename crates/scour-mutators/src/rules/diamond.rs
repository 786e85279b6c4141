use scour_java::{Delimiter, Group, Node};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "UseDiamondOperator";

/// `Map<K, V> m = new HashMap<K, V>()` → `Map<K, V> m = new HashMap<>()`
pub struct UseDiamondOperator;

impl Mutator for UseDiamondOperator {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("RSPEC-2293")
            .since(&[1, 7])
            .describe("Drop constructor type arguments the compiler can infer")
    }

    fn apply(
        &self,
        node: &mut Group,
        _cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            let Some((open, close)) = explicit_type_arguments(nodes, i) else {
                return Ok(Step::Skip);
            };
            if nodes[open + 1..=close].iter().any(Node::has_comments) {
                return Ok(Step::Blocked(IssueKind::Replace));
            }
            nodes.drain(open + 1..close);
            if let Some(close) = nodes.get_mut(open + 1) {
                close.take_leading();
            }
            Ok(Step::Rewrote)
        })
    }
}

/// For `name = new a.T<args>(..)` with `new` at `i`, the indexes of the
/// `<` and `>` around non-empty `args`.
fn explicit_type_arguments(nodes: &[Node], i: usize) -> Option<(usize, usize)> {
    if !nodes[i].is_ident("new") || i < 3 {
        return None;
    }
    // Only where the target type is spelled out with its own arguments
    let declared = nodes[i - 1].is_punct("=")
        && nodes[i - 2].ident().is_some()
        && nodes[i - 3].is_punct(">");
    if !declared {
        return None;
    }

    let mut j = i + 1;
    nodes.get(j)?.ident()?;
    while nodes.get(j + 1).is_some_and(|n| n.is_punct(".")) {
        nodes.get(j + 2)?.ident()?;
        j += 2;
    }
    let open = j + 1;
    if !nodes.get(open)?.is_punct("<") {
        return None;
    }
    let close = matching_close(nodes, open)?;
    if close == open + 1 {
        return None;
    }
    let args = nodes.get(close + 1)?;
    let anonymous = nodes.get(close + 2).is_some_and(|n| n.is_group(Delimiter::Brace));
    if !args.is_group(Delimiter::Parenthesis) || anonymous {
        return None;
    }
    Some((open, close))
}

fn matching_close(nodes: &[Node], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (k, node) in nodes.iter().enumerate().skip(open) {
        if node.is_punct("<") {
            depth += 1;
        } else if node.is_punct(">") {
            depth -= 1;
            if depth == 0 {
                return Some(k);
            }
        } else if node.is_punct(";") || node.is_punct("=") || node.is_group(Delimiter::Brace) {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rewrite;

    fn run(src: &str) -> String {
        rewrite(UseDiamondOperator, src)
    }

    #[test]
    fn test_drops_type_arguments() {
        assert_eq!(
            run("List<String> xs = new ArrayList<String>();"),
            "List<String> xs = new ArrayList<>();"
        );
        assert_eq!(
            run("Map<K, List<V>> m = new java.util.HashMap< K, List<V> >(16);"),
            "Map<K, List<V>> m = new java.util.HashMap<>(16);"
        );
    }

    #[test]
    fn test_leaves_other_constructions() {
        for src in [
            "List<String> xs = new ArrayList<>();",
            "Object o = new ArrayList<String>();",
            "List<String> xs = new ArrayList<String>() {};",
            "f(new ArrayList<String>());",
            "var xs = new ArrayList<String>();",
        ] {
            assert_eq!(run(src), src);
        }
    }
}
