//! Text regeneration from the token tree.

use crate::tree::{Group, Node, Trivia, TriviaPiece};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    /// Reproduce the parsed text byte for byte.
    Verbatim,
    /// Print tokens verbatim but normalise trivia: runs of blank lines
    /// collapse to one. Inside block comments a run of blank lines is
    /// dropped and a run of bare `*` lines shrinks to one.
    #[default]
    Regenerate,
}

/// Print a group, including its own delimiters and trivia.
pub fn print_group(group: &Group, mode: PrintMode) -> String {
    let mut out = String::new();
    write_group(&mut out, group, mode);
    out
}

/// Print a run of sibling nodes.
pub fn print_nodes(nodes: &[Node], mode: PrintMode) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, mode);
    }
    out
}

fn write_node(out: &mut String, node: &Node, mode: PrintMode) {
    match node {
        Node::Token(token) => {
            write_trivia(out, &token.leading, mode);
            out.push_str(&token.text);
        }
        Node::Group(group) => write_group(out, group, mode),
    }
}

fn write_group(out: &mut String, group: &Group, mode: PrintMode) {
    write_trivia(out, &group.open, mode);
    out.extend(group.delimiter.open_char());
    for child in &group.children {
        write_node(out, child, mode);
    }
    write_trivia(out, &group.close, mode);
    out.extend(group.delimiter.close_char());
}

fn write_trivia(out: &mut String, trivia: &Trivia, mode: PrintMode) {
    for piece in &trivia.pieces {
        match (mode, piece) {
            (PrintMode::Verbatim, piece) => out.push_str(piece.text()),
            (PrintMode::Regenerate, TriviaPiece::Whitespace(ws)) => {
                out.push_str(&collapse_blank_lines(ws))
            }
            (PrintMode::Regenerate, TriviaPiece::BlockComment(text)) => {
                out.push_str(&tidy_block_comment(text))
            }
            (PrintMode::Regenerate, TriviaPiece::LineComment(text)) => out.push_str(text),
        }
    }
}

/// Keep at most one blank line in a whitespace run.
fn collapse_blank_lines(ws: &str) -> String {
    let segments: Vec<&str> = ws.split('\n').collect();
    if segments.len() <= 3 {
        return ws.to_string();
    }
    // Interior segments are blank lines; keep the first one only
    let last = segments.len() - 1;
    [segments[0], segments[1], segments[last]].join("\n")
}

/// Trimmed value of a comment line that carries no text: `""` or `"*"`
fn filler(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    (trimmed.is_empty() || trimmed == "*").then_some(trimmed)
}

/// Drop runs of blank interior lines and shorten runs of bare `*` lines to
/// one. A run mixing the two is left alone, so every dropped run consists
/// of a single kind of line.
fn tidy_block_comment(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= 2 {
        return text.to_string();
    }
    let last = lines.len() - 1;
    let mut kept: Vec<&str> = vec![lines[0]];
    let mut i = 1;
    while i < last {
        let Some(kind) = filler(lines[i]) else {
            kept.push(lines[i]);
            i += 1;
            continue;
        };
        let mut end = i + 1;
        while end < last && filler(lines[end]).is_some() {
            end += 1;
        }
        let run = &lines[i..end];
        if run.iter().any(|line| filler(line) != Some(kind)) {
            kept.extend_from_slice(run);
        } else if kind == "*" {
            kept.push(run[0]);
        }
        i = end;
    }
    kept.push(lines[last]);
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstDocument;

    fn regen(src: &str) -> String {
        AstDocument::parse(src).unwrap().print()
    }

    #[test]
    fn test_verbatim_is_lossless() {
        let src = "class A {\r\n\r\n\r\n  /*\n\n * x\n */ int a = 1 ;// t\n}\n";
        let doc = AstDocument::parse(src).unwrap();
        assert_eq!(print_group(doc.root(), PrintMode::Verbatim), src);
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(regen("a;\n\n\n\nb;\n"), "a;\n\nb;\n");
        assert_eq!(regen("a;\r\n\r\n\r\n  b;"), "a;\r\n\r\n  b;");
        assert_eq!(regen("a;\n\nb;"), "a;\n\nb;");
    }

    #[test]
    fn test_block_comment_tidy() {
        insta::assert_snapshot!(regen("/**\n * a\n\n\n * b\n *\n *\n * c\n */\nclass A {}\n"), @r"
        /**
         * a
         * b
         *
         * c
         */
        class A {}
        ");
    }

    #[test]
    fn test_mixed_filler_runs_are_kept() {
        let src = "/*\n * a\n *\n\n *\n */\nclass A {}\n";
        assert_eq!(regen(src), src);
        let src = "/*\n\n *\n * a\n */";
        assert_eq!(regen(src), src);
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let src = "/*\n\n\n*/\n\n\n\nclass A { /* x */\n\n\n}\n";
        let once = regen(src);
        assert_eq!(regen(&once), once);
    }
}
