//! Per-generation document facts: declared variable types and line offsets.

use std::collections::HashMap;

use crate::document::Generation;
use crate::error::Location;
use crate::tree::{Delimiter, Group, Node};

/// Words that can precede an identifier without being its type
const NOT_A_TYPE: &[&str] = &[
    "assert",
    "break",
    "case",
    "class",
    "continue",
    "default",
    "do",
    "else",
    "enum",
    "extends",
    "goto",
    "implements",
    "import",
    "instanceof",
    "interface",
    "new",
    "package",
    "permits",
    "record",
    "return",
    "super",
    "this",
    "throw",
    "throws",
    "yield",
];

/// Declared base types of local variables, fields and parameters.
///
/// Resolution is name based and scope blind: a name declared with two
/// different types anywhere in the document is ambiguous and resolves to
/// nothing, which keeps type-directed rewrites conservative.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    generation: Generation,
    types: HashMap<String, Option<String>>,
}

impl SymbolTable {
    pub fn build(root: &Group, generation: Generation) -> Self {
        let mut table = SymbolTable {
            generation,
            types: HashMap::new(),
        };
        table.collect(root);
        log::trace!(
            "Built symbol table for generation {} with {} names",
            generation.get(),
            table.types.len()
        );
        table
    }

    /// Generation of the document this table was built from
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Declared base type of `name`, if it is unambiguous.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.types.get(name)?.as_deref()
    }

    pub fn is_declared_as(&self, name: &str, types: &[&str]) -> bool {
        self.resolve(name).is_some_and(|ty| types.contains(&ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn collect(&mut self, group: &Group) {
        let children = &group.children;
        for (i, node) in children.iter().enumerate() {
            let arrow = children.get(i + 1).is_some_and(|n| n.is_punct("->"));
            match node {
                Node::Group(inner) => {
                    if arrow && inner.delimiter == Delimiter::Parenthesis {
                        for name in untyped_parameters(&inner.children) {
                            self.declare(name, None);
                        }
                    }
                    self.collect(inner)
                }
                Node::Token(_) if arrow => {
                    // `name -> ...`
                    if let Some(name) = node.ident().filter(|n| !NOT_A_TYPE.contains(n)) {
                        self.declare(name, None);
                    }
                }
                Node::Token(_) => {
                    if let Some((name, ty)) = declaration_at(children, i) {
                        self.declare(name, ty);
                    }
                }
            }
        }
    }

    /// Record a declaration; `None` is a declaration of unknown type.
    fn declare(&mut self, name: &str, ty: Option<String>) {
        match self.types.get_mut(name) {
            None => {
                self.types.insert(name.to_string(), ty);
            }
            Some(existing) => {
                if *existing != ty {
                    *existing = None;
                }
            }
        }
    }
}

/// Names in a lambda parameter list `(a, b)` that carry no type
fn untyped_parameters(nodes: &[Node]) -> impl Iterator<Item = &str> {
    nodes.iter().enumerate().filter_map(move |(i, node)| {
        let name = node.ident()?;
        let first = i == 0 || nodes[i - 1].is_punct(",");
        let last = nodes.get(i + 1).is_none_or(|n| n.is_punct(","));
        (first && last).then_some(name)
    })
}

/// Recognise `Type name` ending at `index`, where `name` is followed by
/// `=`, `;`, `,`, `)`, `:` or the end of its group. A `var` whose
/// initializer is not `new T(..)` yields a name of unknown type.
fn declaration_at(nodes: &[Node], index: usize) -> Option<(&str, Option<String>)> {
    let name = nodes[index].ident()?;
    let follows = match nodes.get(index + 1) {
        None => true,
        Some(next) => [";", "=", ",", ":"].iter().any(|op| next.is_punct(op)),
    };
    if !follows || index == 0 {
        return None;
    }

    let mut cursor = index - 1;
    let mut array = false;
    while nodes[cursor].is_group(Delimiter::Bracket) && nodes[cursor].as_group()?.is_empty() {
        array = true;
        cursor = cursor.checked_sub(1)?;
    }
    if nodes[cursor].is_punct(">") {
        cursor = generic_open(nodes, cursor)?.checked_sub(1)?;
    }
    let ty = nodes[cursor].ident()?;
    if NOT_A_TYPE.contains(&ty) || NOT_A_TYPE.contains(&name) {
        return None;
    }

    let base = if ty == "var" {
        let Some(constructed) = constructed_type(nodes, index + 1) else {
            return Some((name, None));
        };
        constructed.to_string()
    } else {
        ty.to_string()
    };
    Some((name, Some(if array { format!("{base}[]") } else { base })))
}

/// Index of the `<` matching the `>` at `close`
fn generic_open(nodes: &[Node], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        let node = &nodes[i];
        if node.is_punct(">") {
            depth += 1;
        } else if node.is_punct("<") {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        } else if node.is_punct(";") || node.is_punct("=") || node.is_group(Delimiter::Brace) {
            return None;
        }
    }
    None
}

/// For `= new a.b.T<..>(..)` starting at `eq`, the last name segment `T`
fn constructed_type(nodes: &[Node], eq: usize) -> Option<&str> {
    if !nodes.get(eq)?.is_punct("=") || !nodes.get(eq + 1)?.is_ident("new") {
        return None;
    }
    let mut last = nodes.get(eq + 2)?.ident()?;
    let mut i = eq + 3;
    while nodes.get(i).is_some_and(|n| n.is_punct(".")) {
        last = nodes.get(i + 1)?.ident()?;
        i += 2;
    }
    Some(last)
}

/// Byte offset to line/column lookup
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve `offset` in `source`, which must be the text this index was built from.
    pub fn location(&self, source: &str, offset: usize) -> Location {
        let offset = offset.min(source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let column = source
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        Location {
            offset,
            line,
            column: column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstDocument;

    fn table(src: &str) -> SymbolTable {
        let doc = AstDocument::parse(src).unwrap();
        doc.symbols().clone()
    }

    #[test]
    fn test_declarations() {
        let t = table(
            r#"
            import java.util.List;
            class A {
                private final java.util.Map<String, List<Integer>> byName = new HashMap<>();
                String label;
                void f(List<String> xs, int n) {
                    for (String s : xs) {}
                    var set = new java.util.HashSet<String>();
                    int[] counts = {1};
                    return n;
                }
            }
            "#,
        );
        assert_eq!(t.resolve("byName"), Some("Map"));
        assert_eq!(t.resolve("label"), Some("String"));
        assert_eq!(t.resolve("xs"), Some("List"));
        assert_eq!(t.resolve("n"), Some("int"));
        assert_eq!(t.resolve("s"), Some("String"));
        assert_eq!(t.resolve("set"), Some("HashSet"));
        assert_eq!(t.resolve("counts"), Some("int[]"));
        assert!(t.is_declared_as("xs", &["List", "Set"]));
        assert_eq!(t.resolve("List"), None);
    }

    #[test]
    fn test_conflicting_declarations_are_ambiguous() {
        let t = table("void f(String x) {} void g(List x) {} void h(String y, String y2) {}");
        assert_eq!(t.resolve("x"), None);
        assert_eq!(t.resolve("y"), Some("String"));
    }

    #[test]
    fn test_untyped_locals_make_names_ambiguous() {
        let t = table(
            r#"
            class A {
                String name;
                java.util.List<String> items;
                String label;
                void f() {
                    foos.forEach(name -> name.length());
                    map.forEach((items, v) -> {});
                    var label = makeFoo();
                    var sb = new StringBuilder();
                    run((String typed) -> typed);
                    switch (k) { default -> {} }
                }
            }
            "#,
        );
        assert_eq!(t.resolve("name"), None);
        assert_eq!(t.resolve("items"), None);
        assert_eq!(t.resolve("label"), None);
        assert_eq!(t.resolve("sb"), Some("StringBuilder"));
        assert_eq!(t.resolve("typed"), Some("String"));
        assert!(t.types.contains_key("v"));
        assert!(!t.types.contains_key("default"));
    }

    #[test]
    fn test_expressions_are_not_declarations() {
        let t = table("if (a > b) { return c; } x = y; throw e; case FOO: o instanceof Bar;");
        assert!(t.is_empty());
    }

    #[test]
    fn test_line_index() {
        let src = "ab\r\ncé\nd";
        let idx = LineIndex::new(src);
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.location(src, 0).to_string(), "1:1");
        assert_eq!(idx.location(src, 4).to_string(), "2:1");
        assert_eq!(idx.location(src, 7).to_string(), "2:3");
        assert_eq!(idx.location(src, 8).to_string(), "3:1");
    }
}
