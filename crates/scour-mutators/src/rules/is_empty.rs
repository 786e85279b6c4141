use scour_java::tree::op_len_at;
use scour_java::{Group, Node, Token};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const COLLECTION_TYPES: &[&str] = &[
    "ArrayDeque",
    "ArrayList",
    "Collection",
    "ConcurrentHashMap",
    "ConcurrentLinkedQueue",
    "CopyOnWriteArrayList",
    "Deque",
    "EnumMap",
    "EnumSet",
    "HashMap",
    "HashSet",
    "Hashtable",
    "IdentityHashMap",
    "LinkedHashMap",
    "LinkedHashSet",
    "LinkedList",
    "List",
    "Map",
    "NavigableMap",
    "NavigableSet",
    "PriorityQueue",
    "Queue",
    "Set",
    "SortedMap",
    "SortedSet",
    "Stack",
    "TreeMap",
    "TreeSet",
    "Vector",
    "WeakHashMap",
];

/// Rewrites `x.size() == 0` style checks into `x.isEmpty()` for receivers
/// declared with one of `types`.
struct EmptinessCheck {
    id: &'static str,
    method: &'static str,
    types: &'static [&'static str],
}

/// `c.size() == 0` → `c.isEmpty()` for JDK collections and maps
pub struct CollectionIsEmpty;

/// `s.length() == 0` → `s.isEmpty()` for strings
pub struct StringIsEmpty;

const COLLECTION: EmptinessCheck = EmptinessCheck {
    id: "CollectionIsEmpty",
    method: "size",
    types: COLLECTION_TYPES,
};

const STRING: EmptinessCheck = EmptinessCheck {
    id: "StringIsEmpty",
    method: "length",
    types: &["String"],
};

impl Mutator for CollectionIsEmpty {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(COLLECTION.id)
            .alias("UseCollectionIsEmpty")
            .alias("RSPEC-1155")
            .since(&[1, 2])
            .stdlib_only()
            .describe("Use isEmpty() instead of comparing size() with zero")
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        COLLECTION.apply(node, cx)
    }
}

impl Mutator for StringIsEmpty {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(STRING.id)
            .alias("UseStringIsEmpty")
            .since(&[1, 6])
            .stdlib_only()
            .describe("Use isEmpty() instead of comparing length() with zero")
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        STRING.apply(node, cx)
    }
}

/// A matched comparison: the nodes it spans, the receiver and whether the
/// result must be negated.
struct Found {
    start: usize,
    end: usize,
    receiver: usize,
    negate: bool,
}

fn is_zero(node: &Node) -> bool {
    node.as_token()
        .is_some_and(|t| t.is_literal() && t.text == "0")
}

/// A lone `>`, not the start of `>=` or `>>`
fn is_greater(nodes: &[Node], index: usize) -> bool {
    nodes[index].is_punct(">")
        && op_len_at(nodes, index, ">=").is_none()
        && op_len_at(nodes, index, ">>").is_none()
}

impl EmptinessCheck {
    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        scan::rewrite_each(&mut node.children, |nodes, i| {
            let found = self
                .receiver_first(nodes, i)
                .or_else(|| self.zero_first(nodes, i));
            let Some(found) = found else {
                return Ok(Step::Skip);
            };
            let Some(receiver) = nodes[found.receiver].ident() else {
                return Ok(Step::Skip);
            };
            if !cx.symbols.is_declared_as(receiver, self.types) {
                return Ok(Step::Skip);
            }
            if scan::interior_comments(&nodes[found.start..found.end]) {
                return Ok(Step::Blocked(IssueKind::Replace));
            }

            let mut replacement = Vec::with_capacity(5);
            if found.negate {
                replacement.push(Node::Token(Token::punct("!")));
            }
            let mut name = nodes[found.receiver].clone();
            name.take_leading();
            replacement.push(name);
            replacement.push(scan::dot());
            replacement.extend(scan::call("isEmpty"));
            scan::splice(nodes, found.start..found.end, replacement, self.id)?;
            Ok(Step::Rewrote)
        })
    }

    /// `x.m() == 0`, `x.m() != 0`, `x.m() > 0`
    fn receiver_first(&self, nodes: &[Node], i: usize) -> Option<Found> {
        scan::bare_receiver(nodes, i)?;
        if !scan::starts_expression(nodes, i) || !scan::is_nullary_call(nodes, i + 1, self.method) {
            return None;
        }
        let op = i + 4;
        let negate = if nodes.get(op)?.is_punct("==") {
            false
        } else if nodes[op].is_punct("!=") || is_greater(nodes, op) {
            true
        } else {
            return None;
        };
        if !is_zero(nodes.get(op + 1)?) || !scan::ends_expression(nodes, op + 2) {
            return None;
        }
        Some(Found {
            start: i,
            end: op + 2,
            receiver: i,
            negate,
        })
    }

    /// `0 == x.m()`, `0 != x.m()`, `0 < x.m()`
    fn zero_first(&self, nodes: &[Node], i: usize) -> Option<Found> {
        if !is_zero(&nodes[i]) || !scan::starts_expression(nodes, i) {
            return None;
        }
        let op = i + 1;
        let negate = if nodes.get(op)?.is_punct("==") {
            false
        } else if nodes[op].is_punct("!=") || nodes[op].is_punct("<") {
            true
        } else {
            return None;
        };
        let receiver = op + 1;
        scan::bare_receiver(nodes, receiver)?;
        if !scan::is_nullary_call(nodes, receiver + 1, self.method)
            || !scan::ends_expression(nodes, receiver + 4)
        {
            return None;
        }
        Some(Found {
            start: i,
            end: receiver + 4,
            receiver,
            negate,
        })
    }
}
