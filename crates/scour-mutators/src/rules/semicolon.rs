use scour_java::tree::statement_header;
use scour_java::{Delimiter, Group, GroupKind, Node};

use crate::error::MutatorError;
use crate::meta::MutatorMeta;
use crate::mutator::{ApplyOutcome, IssueKind, Mutator, MutatorContext};
use crate::scan::{self, Step};

const ID: &str = "UnnecessarySemicolon";

const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];

/// Removes empty statements: `;;` and a `;` after a method or type body.
pub struct UnnecessarySemicolon;

impl Mutator for UnnecessarySemicolon {
    fn meta(&self) -> MutatorMeta {
        MutatorMeta::new(ID)
            .alias("RSPEC-1116")
            .alias("EmptyStatement")
            .since(&[1])
            .describe("Remove semicolons that terminate nothing")
    }

    fn apply(
        &self,
        node: &mut Group,
        cx: &MutatorContext<'_>,
    ) -> Result<ApplyOutcome, MutatorError> {
        let member_level = match cx.kind {
            GroupKind::TypeBody => !looks_like_enum_body(&node.children),
            GroupKind::CompilationUnit => true,
            GroupKind::Block => false,
            // `for (;;)`, array initialisers and the like
            _ => return Ok(ApplyOutcome::NoMatch),
        };
        scan::rewrite_each(&mut node.children, |nodes, i| {
            if !nodes[i].is_punct(";") || i == 0 {
                return Ok(Step::Skip);
            }
            let redundant = nodes[i - 1].is_punct(";")
                || (member_level && closes_declaration(nodes, i - 1));
            if !redundant {
                return Ok(Step::Skip);
            }
            if nodes[i].has_comments() {
                return Ok(Step::Blocked(IssueKind::Remove));
            }
            scan::splice(nodes, i..i + 1, Vec::new(), ID)?;
            Ok(Step::Rewrote)
        })
    }
}

/// Whether the brace group at `index` ends a method or type declaration,
/// so that a `;` after it is an empty member.
fn closes_declaration(nodes: &[Node], index: usize) -> bool {
    if !nodes[index].is_group(Delimiter::Brace) {
        return false;
    }
    let header = statement_header(nodes, index);
    let assigns = header.iter().any(|n| n.is_punct("="));
    let lambda = header.last().is_some_and(|n| n.is_punct("->"));
    if assigns || lambda {
        return false;
    }
    let declares_type = header
        .iter()
        .any(|n| TYPE_KEYWORDS.iter().any(|kw| n.is_ident(kw)));
    // `ReturnType name(...)`: a constructor or enum constant has a lone name
    let declares_method = header
        .iter()
        .position(|n| n.is_group(Delimiter::Parenthesis))
        .is_some_and(|p| p >= 2 && header[p - 1].ident().is_some() && !header[p - 2].is_punct("@"));
    declares_type || declares_method
}

/// Enum bodies start with constants, where a trailing `;` is significant.
fn looks_like_enum_body(children: &[Node]) -> bool {
    let mut i = 0;
    // Skip annotations
    while children.get(i).is_some_and(|n| n.is_punct("@")) {
        i += 2;
        while children.get(i).is_some_and(|n| n.is_punct(".")) {
            i += 2;
        }
        if children.get(i).is_some_and(|n| n.is_group(Delimiter::Parenthesis)) {
            i += 1;
        }
    }
    let Some(first) = children.get(i) else {
        return false;
    };
    if first.ident().is_none() {
        return false;
    }
    match children.get(i + 1) {
        None => true,
        Some(next) => {
            next.is_punct(",")
                || next.is_punct(";")
                || next.is_group(Delimiter::Parenthesis)
                || next.is_group(Delimiter::Brace)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rewrite;

    fn run(src: &str) -> String {
        rewrite(UnnecessarySemicolon, src)
    }

    #[test]
    fn test_double_semicolons() {
        assert_eq!(run("void f() { a();; b(); ; }"), "void f() { a(); b(); }");
        assert_eq!(run("import a.B;;\nclass C {}"), "import a.B;\nclass C {}");
    }

    #[test]
    fn test_semicolon_after_member() {
        assert_eq!(
            run("class A {\n  void f() {};\n  int x;\n};\n"),
            "class A {\n  void f() {}\n  int x;\n}\n"
        );
        assert_eq!(
            run("class A { @Override public String toString() throws E { return \"\"; }; }"),
            "class A { @Override public String toString() throws E { return \"\"; } }"
        );
    }

    #[test]
    fn test_keeps_significant_semicolons() {
        for src in [
            "void f() { for (;;) {} }",
            "class A { int[] xs = {1}; Runnable r = () -> {}; }",
            "enum E { A { void f() {} }; void g() {} }",
            "enum E { @Deprecated A(1) {}; void g() {} }",
            "class A { Object o = new Object() {}; }",
            "void f() { while (x) ; }",
            "void f() { Runnable r = () -> {}; }",
        ] {
            assert_eq!(run(src), src);
        }
    }
}
