//! Shared matching helpers for the rules in [`crate::rules`].
//!
//! Rules work on the flat child list of one group. An expression operand is
//! recognised as a postfix chain (`a.b(c)[d].e`), and a match only counts
//! when it sits between expression boundaries, so that operator precedence
//! cannot change its meaning.

use std::ops::Range;

use scour_java::{Delimiter, Group, Node, Token};

use crate::error::MutatorError;
use crate::mutator::{ApplyOutcome, IssueKind};

/// Result of trying one rule at one position
pub(crate) enum Step {
    Skip,
    Rewrote,
    Blocked(IssueKind),
}

/// Tokens after which an operand of `==`/`!=` starts a new expression
const START_BOUNDARY: &[&str] = &[
    "&&", "||", "?", ":", "=", ",", ";", "->", "&", "|", "^", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<=",
];

const START_KEYWORDS: &[&str] = &["return", "yield", "assert"];

/// Tokens that end an operand of `==`/`!=`
const END_BOUNDARY: &[&str] = &["&&", "||", "?", ":", ",", ";", "&", "|", "^"];

/// Try `at` at every position of `children`, left to right.
pub(crate) fn rewrite_each<F>(children: &mut Vec<Node>, mut at: F) -> Result<ApplyOutcome, MutatorError>
where
    F: FnMut(&mut Vec<Node>, usize) -> Result<Step, MutatorError>,
{
    let mut applied = false;
    let mut blocked = None;
    let mut i = 0;
    while i < children.len() {
        match at(children, i)? {
            Step::Skip => {}
            Step::Rewrote => applied = true,
            Step::Blocked(kind) => blocked = Some(kind),
        }
        i += 1;
    }
    Ok(match (applied, blocked) {
        (true, _) => ApplyOutcome::Applied,
        (false, Some(kind)) => ApplyOutcome::MatchedButCouldNotApply(kind),
        (false, None) => ApplyOutcome::NoMatch,
    })
}

/// True if an operand may start at `index`
pub(crate) fn starts_expression(nodes: &[Node], index: usize) -> bool {
    let Some(prev) = index.checked_sub(1).map(|i| &nodes[i]) else {
        return true;
    };
    START_BOUNDARY.iter().any(|op| prev.is_punct(op))
        || START_KEYWORDS.iter().any(|kw| prev.is_ident(kw))
}

/// True if an operand may end right before `index`
pub(crate) fn ends_expression(nodes: &[Node], index: usize) -> bool {
    match nodes.get(index) {
        None => true,
        Some(next) => END_BOUNDARY.iter().any(|op| next.is_punct(op)),
    }
}

/// Keywords that can sit directly before an operand
const KEYWORDS: &[&str] = &[
    "assert", "case", "do", "else", "instanceof", "new", "return", "throw", "yield",
];

fn is_name(node: &Node) -> bool {
    node.ident().is_some_and(|name| !KEYWORDS.contains(&name))
}

fn is_primary(node: &Node) -> bool {
    is_name(node) || node.is_literal() || node.is_group(Delimiter::Parenthesis)
}

fn is_postfix_group(node: &Node) -> bool {
    node.is_group(Delimiter::Parenthesis) || node.is_group(Delimiter::Bracket)
}

/// End (exclusive) of the postfix chain starting at `start`
pub(crate) fn chain_end(nodes: &[Node], start: usize) -> Option<usize> {
    if !is_primary(nodes.get(start)?) {
        return None;
    }
    let mut i = start + 1;
    loop {
        match nodes.get(i) {
            Some(n) if n.is_punct(".") && nodes.get(i + 1).and_then(Node::ident).is_some() => {
                i += 2
            }
            Some(n) if is_postfix_group(n) => i += 1,
            _ => return Some(i),
        }
    }
}

/// Start of the postfix chain ending right before `end`
pub(crate) fn chain_start(nodes: &[Node], end: usize) -> Option<usize> {
    let mut i = end;
    loop {
        while i > 0 && is_postfix_group(&nodes[i - 1]) {
            i -= 1;
        }
        let Some(prev) = i.checked_sub(1).map(|p| &nodes[p]) else {
            return (i < end).then_some(i);
        };
        if is_name(prev) || prev.is_literal() {
            i -= 1;
        } else {
            // a parenthesised primary, or nothing at all
            return (i < end && nodes[i].is_group(Delimiter::Parenthesis)).then_some(i);
        }
        if i > 0 && nodes[i - 1].is_punct(".") {
            i -= 1;
        } else {
            return Some(i);
        }
    }
}

/// True if removing or rebuilding `nodes` would drop a comment. The
/// leading trivia of the first node is kept by [`splice`] and not counted.
pub(crate) fn interior_comments(nodes: &[Node]) -> bool {
    nodes.iter().enumerate().any(|(i, node)| match (i, node) {
        (0, Node::Token(_)) => false,
        (0, Node::Group(g)) => g.close.has_comments() || g.children.iter().any(Node::has_comments),
        (_, node) => node.has_comments(),
    })
}

/// Replace `nodes[range]` with `replacement`, moving the leading trivia of
/// the first replaced node onto the first new one.
pub(crate) fn splice(
    nodes: &mut Vec<Node>,
    range: Range<usize>,
    mut replacement: Vec<Node>,
    mutator: &str,
) -> Result<(), MutatorError> {
    if range.start >= range.end || range.end > nodes.len() {
        return Err(MutatorError::internal(
            mutator,
            format!("replacement range {range:?} outside {} nodes", nodes.len()),
        ));
    }
    let leading = nodes[range.start].take_leading();
    match replacement.first_mut() {
        Some(first) => *first.leading_mut() = leading,
        // Pure removal: keep line structure if the removed run started a line
        None => {
            if let Some(next) = nodes.get_mut(range.end) {
                if leading.has_newline() && !next.leading().has_newline() {
                    *next.leading_mut() = leading;
                }
            }
        }
    }
    nodes.splice(range, replacement);
    Ok(())
}

/// `name()` with no trivia
pub(crate) fn call(name: &str) -> [Node; 2] {
    [
        Node::Token(Token::ident(name)),
        Node::Group(Group::new(Delimiter::Parenthesis, Vec::new())),
    ]
}

pub(crate) fn dot() -> Node {
    Node::Token(Token::punct("."))
}

/// Receiver `x` of `x.method()` at `index`: a bare identifier not itself
/// qualified by a preceding `.`
pub(crate) fn bare_receiver(nodes: &[Node], index: usize) -> Option<&str> {
    let name = nodes.get(index)?.ident()?;
    let qualified = index
        .checked_sub(1)
        .is_some_and(|p| nodes[p].is_punct(".") || nodes[p].is_punct("::"));
    (!qualified).then_some(name)
}

/// `.method()` starting at `index`
pub(crate) fn is_nullary_call(nodes: &[Node], index: usize, method: &str) -> bool {
    nodes.get(index).is_some_and(|n| n.is_punct("."))
        && nodes.get(index + 1).is_some_and(|n| n.is_ident(method))
        && nodes.get(index + 2).is_some_and(Node::is_empty_parens)
}
