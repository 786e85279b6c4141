use scour_java::{Delimiter, Group, Node, Token, TokenKind};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "PrimitiveWrapperInstantiation";

const WRAPPERS: &[&str] = &[
    "Boolean",
    "Byte",
    "Character",
    "Double",
    "Float",
    "Integer",
    "Long",
    "Short",
];

/// `new Integer(v)` → `Integer.valueOf(v)`
pub struct PrimitiveWrapperInstantiation;

impl Mutator for PrimitiveWrapperInstantiation {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("RSPEC-2129")
            .since(&[1, 5])
            .stdlib_only()
            .describe("Use valueOf() instead of the deprecated wrapper constructors")
    }

    fn apply(
        &self,
        node: &mut Group,
        _cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            if !nodes[i].is_ident("new") {
                return Ok(Step::Skip);
            }
            let Some(wrapper) = nodes.get(i + 1).and_then(Node::ident) else {
                return Ok(Step::Skip);
            };
            if !WRAPPERS.contains(&wrapper) {
                return Ok(Step::Skip);
            }
            let Some(Node::Group(args)) = nodes.get(i + 2) else {
                return Ok(Step::Skip);
            };
            if args.delimiter != Delimiter::Parenthesis || args.is_empty() {
                return Ok(Step::Skip);
            }
            let qualified = i > 0 && nodes[i - 1].is_punct(".");
            let subclassed = nodes.get(i + 3).is_some_and(|n| n.is_group(Delimiter::Brace));
            if qualified || subclassed {
                return Ok(Step::Skip);
            }
            // Float.valueOf has no double overload
            if wrapper == "Float" && !is_float_literal(args) {
                return Ok(Step::Blocked(IssueKind::Replace));
            }
            if nodes[i + 1].has_comments() {
                return Ok(Step::Blocked(IssueKind::Replace));
            }

            let mut name = nodes[i + 1].clone();
            name.take_leading();
            let replacement = vec![name, scan::dot(), Node::Token(Token::ident("valueOf"))];
            scan::splice(nodes, i..i + 2, replacement, ID)?;
            Ok(Step::Rewrote)
        })
    }
}

fn is_float_literal(args: &Group) -> bool {
    match args.children.as_slice() {
        [Node::Token(t)] => t.kind == TokenKind::Number && t.text.ends_with(['f', 'F']),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegisteredMutator;
    use crate::testing::{rewrite, rewrite_registered};

    fn run(src: &str) -> String {
        rewrite(PrimitiveWrapperInstantiation, src)
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(run("Integer i = new Integer(42);"), "Integer i = Integer.valueOf(42);");
        assert_eq!(
            run("f(new Boolean(flag), new Long(\"7\"));"),
            "f(Boolean.valueOf(flag), Long.valueOf(\"7\"));"
        );
        assert_eq!(run("Float f = new Float(1.5f);"), "Float f = Float.valueOf(1.5f);");
    }

    #[test]
    fn test_leaves_other_constructions() {
        for src in [
            "x = new Integer[3];",
            "x = new Foo(1);",
            "x = outer.new Integer(1);",
            "x = new java.lang.Integer(1);",
        ] {
            assert_eq!(run(src), src);
        }
    }

    #[test]
    fn test_float_from_double_is_blocked() {
        let m = RegisteredMutator::new(Box::new(PrimitiveWrapperInstantiation)).unwrap();
        let src = "Float f = new Float(1.5);";
        assert_eq!(rewrite_registered(&m, src), src);
        assert_eq!(m.replace_issues(), 1);
    }
}
