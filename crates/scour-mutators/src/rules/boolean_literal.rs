use scour_java::{Group, Node, Token};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "BooleanLiteralComparison";

/// `x == true` → `x`, `x == false` → `!x`, `!x == false` → `x`, and the
/// `!=` and literal-first variants.
pub struct BooleanLiteralComparison;

impl Mutator for BooleanLiteralComparison {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("SimplifyBooleanExpressions")
            .alias("RSPEC-1125")
            .since(&[1])
            .describe("Remove comparisons against boolean literals")
    }

    fn apply(
        &self,
        node: &mut Group,
        _cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            let Some(op) = comparison(&nodes[i]) else {
                return Ok(Step::Skip);
            };
            if let Some(step) = literal_on_right(nodes, i, op)? {
                return Ok(step);
            }
            literal_on_left(nodes, i, op)
        })
    }
}

fn comparison(node: &Node) -> Option<&'static str> {
    if node.is_punct("==") {
        Some("==")
    } else if node.is_punct("!=") {
        Some("!=")
    } else {
        None
    }
}

fn boolean_literal(node: &Node) -> Option<bool> {
    match node.ident()? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Whether `operand OP literal` reduces to `!operand`
fn negates(op: &str, literal: bool) -> bool {
    (op == "==") != literal
}

/// `[!]chain OP literal` with the operator at `op_at`
fn literal_on_right(
    nodes: &mut Vec<Node>,
    op_at: usize,
    op: &str,
) -> Result<Option<Step>, MutatorError> {
    let Some(literal) = nodes.get(op_at + 1).and_then(boolean_literal) else {
        return Ok(None);
    };
    if !scan::ends_expression(nodes, op_at + 2) {
        return Ok(None);
    }
    let Some(mut start) = scan::chain_start(nodes, op_at) else {
        return Ok(None);
    };
    let negated = start > 0 && nodes[start - 1].is_punct("!");
    if negated {
        start -= 1;
    }
    if !scan::starts_expression(nodes, start) {
        return Ok(None);
    }
    if nodes[op_at].has_comments() || nodes[op_at + 1].has_comments() {
        return Ok(Some(Step::Blocked(IssueKind::Remove)));
    }
    if negates(op, literal) && negated && nodes[start + 1].has_comments() {
        return Ok(Some(Step::Blocked(IssueKind::Remove)));
    }

    nodes.drain(op_at..op_at + 2);
    flip(nodes, start, negated, negates(op, literal));
    Ok(Some(Step::Rewrote))
}

/// `literal OP [!]chain` with the operator at `op_at`
fn literal_on_left(nodes: &mut Vec<Node>, op_at: usize, op: &str) -> Result<Step, MutatorError> {
    let Some(lit_at) = op_at.checked_sub(1) else {
        return Ok(Step::Skip);
    };
    let Some(literal) = boolean_literal(&nodes[lit_at]) else {
        return Ok(Step::Skip);
    };
    if !scan::starts_expression(nodes, lit_at) {
        return Ok(Step::Skip);
    }
    let mut operand = op_at + 1;
    let negated = nodes.get(operand).is_some_and(|n| n.is_punct("!"));
    if negated {
        operand += 1;
    }
    let Some(end) = scan::chain_end(nodes, operand) else {
        return Ok(Step::Skip);
    };
    if !scan::ends_expression(nodes, end) {
        return Ok(Step::Skip);
    }
    let drops_bang = negates(op, literal) && negated;
    if nodes[op_at].has_comments()
        || nodes[op_at + 1].leading().has_comments()
        || (drops_bang && nodes[op_at + 2].has_comments())
    {
        return Ok(Step::Blocked(IssueKind::Remove));
    }

    // Drop `literal OP`, the operand inherits the literal's place
    let leading = nodes[lit_at].take_leading();
    nodes.drain(lit_at..op_at + 1);
    *nodes[lit_at].leading_mut() = leading;
    flip(nodes, lit_at, negated, negates(op, literal));
    Ok(Step::Rewrote)
}

/// Apply a negation to the operand at `start`, which may already be
/// prefixed with `!`.
fn flip(nodes: &mut Vec<Node>, start: usize, negated: bool, negate: bool) {
    if !negate {
        return;
    }
    let leading = nodes[start].take_leading();
    if negated {
        nodes.remove(start);
        *nodes[start].leading_mut() = leading;
    } else {
        nodes.insert(start, Node::Token(Token::punct("!").with_leading(leading)));
    }
}
