use scour_java::tree::compact_text;
use scour_java::{Delimiter, Group, GroupKind, Node, Token, Trivia};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "LocalVariableTypeInference";

/// Words that can open a statement without naming a type
const STATEMENT_KEYWORDS: &[&str] = &["assert", "new", "return", "throw", "yield"];

/// `Foo<T> x = new Foo<T>(..);` → `var x = new Foo<T>(..);` for locals
pub struct LocalVariableTypeInference;

impl Mutator for LocalVariableTypeInference {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("UseVar")
            .since(&[10])
            .draft()
            .describe("Declare locals with var when the initializer names the same type")
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        if cx.kind != GroupKind::Block {
            return Ok(ApplyOutcome::NoMatch);
        }
        scan::rewrite_each(&mut node.children, |nodes, i| {
            let Some(decl) = redundant_declaration(nodes, i) else {
                return Ok(Step::Skip);
            };
            // `T a = new T(), b = ...` cannot become `var`
            if decl.more_declarators {
                return Ok(Step::Blocked(IssueKind::Replace));
            }
            if scan::interior_comments(&nodes[decl.ty.clone()]) {
                return Ok(Step::Blocked(IssueKind::Replace));
            }

            let name = &mut nodes[decl.ty.end];
            if name.leading().is_empty() {
                *name.leading_mut() = Trivia::space();
            }
            scan::splice(nodes, decl.ty, vec![Node::Token(Token::ident("var"))], ID)?;
            Ok(Step::Rewrote)
        })
    }
}

struct Declaration {
    /// Declared type, followed by the variable name
    ty: std::ops::Range<usize>,
    more_declarators: bool,
}

/// `[final] T name = new T(..)` starting at `i`, where both `T`s are spelled
/// identically.
fn redundant_declaration(nodes: &[Node], i: usize) -> Option<Declaration> {
    let at_statement_start = i == 0
        || nodes[i - 1].is_punct(";")
        || nodes[i - 1].is_group(Delimiter::Brace);
    if !at_statement_start {
        return None;
    }
    let start = if nodes[i].is_ident("final") { i + 1 } else { i };
    let first = nodes.get(start)?.ident()?;
    if STATEMENT_KEYWORDS.contains(&first) || first == "var" {
        return None;
    }

    let ty_end = type_end(nodes, start)?;
    nodes.get(ty_end)?.ident()?;
    if !nodes.get(ty_end + 1)?.is_punct("=") || !nodes.get(ty_end + 2)?.is_ident("new") {
        return None;
    }
    let ctor_start = ty_end + 3;
    let ctor_end = type_end(nodes, ctor_start)?;
    if compact_text(&nodes[start..ty_end]) != compact_text(&nodes[ctor_start..ctor_end]) {
        return None;
    }
    if !nodes.get(ctor_end)?.is_group(Delimiter::Parenthesis) {
        return None;
    }
    let more_declarators = match nodes.get(ctor_end + 1) {
        Some(n) if n.is_punct(";") => false,
        Some(n) if n.is_punct(",") => true,
        _ => return None,
    };
    Some(Declaration {
        ty: start..ty_end,
        more_declarators,
    })
}

/// End (exclusive) of a type reference `a.b.T<..>` starting at `start`
fn type_end(nodes: &[Node], start: usize) -> Option<usize> {
    nodes.get(start)?.ident()?;
    let mut i = start + 1;
    while nodes.get(i).is_some_and(|n| n.is_punct(".")) {
        nodes.get(i + 1)?.ident()?;
        i += 2;
    }
    if !nodes.get(i).is_some_and(|n| n.is_punct("<")) {
        return Some(i);
    }
    let mut depth = 0usize;
    for (k, node) in nodes.iter().enumerate().skip(i) {
        if node.is_punct("<") {
            depth += 1;
        } else if node.is_punct(">") {
            depth -= 1;
            if depth == 0 {
                return Some(k + 1);
            }
        } else if node.is_group(Delimiter::Brace) || node.is_punct(";") || node.is_punct("=") {
            return None;
        }
    }
    None
}
