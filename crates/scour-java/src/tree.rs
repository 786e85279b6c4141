//! Token-tree node types plus the small matching helpers mutators build on.

use crate::Span;
use crate::printer::{self, PrintMode};

/// Whether a punctuation token is immediately followed by another one.
///
/// `>` is always lexed on its own so generic argument lists can close;
/// `>=`, `>>` and `>>>` are recovered from runs of joint `>` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Joint,
    Alone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords
    Ident,
    Number,
    Str,
    Char,
    TextBlock,
    /// An operator or separator (`==`, `.`, `;`, `->`, ...)
    Punct(Spacing),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaPiece {
    Whitespace(String),
    LineComment(String),
    BlockComment(String),
}

impl TriviaPiece {
    pub fn text(&self) -> &str {
        match self {
            TriviaPiece::Whitespace(s)
            | TriviaPiece::LineComment(s)
            | TriviaPiece::BlockComment(s) => s,
        }
    }
}

/// Whitespace and comments preceding a token or delimiter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    pub pieces: Vec<TriviaPiece>,
}

impl Trivia {
    pub fn none() -> Self {
        Self::default()
    }

    /// A single space.
    pub fn space() -> Self {
        Self {
            pieces: vec![TriviaPiece::Whitespace(" ".to_string())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn has_comments(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| !matches!(p, TriviaPiece::Whitespace(_)))
    }

    pub fn has_newline(&self) -> bool {
        self.pieces.iter().any(|p| p.text().contains('\n'))
    }

    pub fn text(&self) -> String {
        self.pieces.iter().map(TriviaPiece::text).collect()
    }

    /// Append `other` after this trivia.
    pub fn extend(&mut self, other: Trivia) {
        self.pieces.extend(other.pieces);
    }
}

/// A leaf of the token tree
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub leading: Trivia,
    pub span: Span,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        // Compare only what prints, not where it came from
        self.kind == other.kind && self.text == other.text && self.leading == other.leading
    }
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading: Trivia::none(),
            span: Span::synthetic(),
        }
    }

    /// Create an identifier (or keyword) with no leading trivia
    pub fn ident(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Ident, text)
    }

    /// Create a stand-alone punctuation token with no leading trivia
    pub fn punct(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Punct(Spacing::Alone), text)
    }

    pub fn with_leading(mut self, leading: Trivia) -> Self {
        self.leading = leading;
        self
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::Str | TokenKind::Char | TokenKind::TextBlock
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Parenthesis,
    Bracket,
    Brace,
    /// The implicit group around a whole compilation unit
    None,
}

impl Delimiter {
    pub fn open_char(self) -> Option<char> {
        match self {
            Delimiter::Parenthesis => Some('('),
            Delimiter::Bracket => Some('['),
            Delimiter::Brace => Some('{'),
            Delimiter::None => None,
        }
    }

    pub fn close_char(self) -> Option<char> {
        match self {
            Delimiter::Parenthesis => Some(')'),
            Delimiter::Bracket => Some(']'),
            Delimiter::Brace => Some('}'),
            Delimiter::None => None,
        }
    }
}

/// What a group stands for, derived from the tokens that precede it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    CompilationUnit,
    /// Class, interface, enum, record or anonymous class body
    TypeBody,
    /// Method, lambda, initializer or statement block
    Block,
    /// Array initializer (`{1, 2}`)
    Initializer,
    Parens,
    Brackets,
}

/// A delimited sequence of nodes
#[derive(Debug, Clone)]
pub struct Group {
    pub delimiter: Delimiter,
    /// Trivia before the opening delimiter
    pub open: Trivia,
    pub children: Vec<Node>,
    /// Trivia before the closing delimiter (for the root: trailing trivia)
    pub close: Trivia,
    pub span: Span,
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.delimiter == other.delimiter
            && self.open == other.open
            && self.children == other.children
            && self.close == other.close
    }
}

impl Group {
    pub fn new(delimiter: Delimiter, children: Vec<Node>) -> Self {
        Self {
            delimiter,
            open: Trivia::none(),
            children,
            close: Trivia::none(),
            span: Span::synthetic(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Print this group exactly as parsed.
    pub fn to_source(&self) -> String {
        printer::print_group(self, PrintMode::Verbatim)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Token(Token),
    Group(Group),
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Token(token)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl Node {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(t) => Some(t),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Token(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Token(_) => None,
        }
    }

    /// Identifier or keyword text
    pub fn ident(&self) -> Option<&str> {
        match self {
            Node::Token(t) if t.kind == TokenKind::Ident => Some(&t.text),
            _ => None,
        }
    }

    /// True for an identifier or keyword spelled `text`
    pub fn is_ident(&self, text: &str) -> bool {
        self.ident() == Some(text)
    }

    /// True for a punctuation token spelled exactly `op`
    pub fn is_punct(&self, op: &str) -> bool {
        matches!(self, Node::Token(t) if matches!(t.kind, TokenKind::Punct(_)) && t.text == op)
    }

    pub fn is_literal(&self) -> bool {
        self.as_token().is_some_and(Token::is_literal)
    }

    pub fn is_group(&self, delimiter: Delimiter) -> bool {
        matches!(self, Node::Group(g) if g.delimiter == delimiter)
    }

    /// An empty `()` group
    pub fn is_empty_parens(&self) -> bool {
        matches!(self, Node::Group(g) if g.delimiter == Delimiter::Parenthesis && g.children.is_empty())
    }

    pub fn leading(&self) -> &Trivia {
        match self {
            Node::Token(t) => &t.leading,
            Node::Group(g) => &g.open,
        }
    }

    pub fn leading_mut(&mut self) -> &mut Trivia {
        match self {
            Node::Token(t) => &mut t.leading,
            Node::Group(g) => &mut g.open,
        }
    }

    /// Remove and return the leading trivia
    pub fn take_leading(&mut self) -> Trivia {
        std::mem::take(self.leading_mut())
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Token(t) => t.span,
            Node::Group(g) => g.span,
        }
    }

    /// True if this node or anything inside it carries a comment
    pub fn has_comments(&self) -> bool {
        match self {
            Node::Token(t) => t.leading.has_comments(),
            Node::Group(g) => {
                g.open.has_comments()
                    || g.close.has_comments()
                    || g.children.iter().any(Node::has_comments)
            }
        }
    }
}

/// Compact text of `nodes` without any trivia (`java.util.List<String>`).
///
/// Two type references are considered identical when their compact text is.
pub fn compact_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Token(t) => out.push_str(&t.text),
            Node::Group(g) => {
                out.extend(g.delimiter.open_char());
                out.push_str(&compact_text(&g.children));
                out.extend(g.delimiter.close_char());
            }
        }
    }
    out
}

/// Number of tokens making up `op` at `index`, if it is spelled there.
///
/// Handles operators that start with `>`, which the lexer splits into
/// joint single-character tokens.
pub fn op_len_at(nodes: &[Node], index: usize, op: &str) -> Option<usize> {
    let first = nodes.get(index)?.as_token()?;
    if !matches!(first.kind, TokenKind::Punct(_)) {
        return None;
    }
    if first.text == op {
        return Some(1);
    }
    if !op.starts_with('>') || first.text != ">" {
        return None;
    }
    // `>=`, `>>`, `>>=`, `>>>`, `>>>=`: one token per character
    let mut len = 0;
    for (i, ch) in op.chars().enumerate() {
        let tok = nodes.get(index + i)?.as_token()?;
        let TokenKind::Punct(spacing) = tok.kind else {
            return None;
        };
        if tok.text.len() != 1 || !tok.text.starts_with(ch) {
            return None;
        }
        let last = i + 1 == op.chars().count();
        if !last && spacing != Spacing::Joint {
            return None;
        }
        len += 1;
    }
    Some(len)
}

const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];

/// Classify the child group at `index` of a group of kind `parent`.
pub fn classify(parent: GroupKind, siblings: &[Node], index: usize) -> GroupKind {
    match siblings.get(index) {
        Some(Node::Group(g)) => match g.delimiter {
            Delimiter::Parenthesis => GroupKind::Parens,
            Delimiter::Bracket => GroupKind::Brackets,
            Delimiter::Brace => classify_brace(parent, siblings, index),
            Delimiter::None => parent,
        },
        _ => parent,
    }
}

fn classify_brace(parent: GroupKind, siblings: &[Node], index: usize) -> GroupKind {
    let prev = index.checked_sub(1).and_then(|i| siblings.get(i));
    match prev {
        None => {
            return match parent {
                GroupKind::Initializer | GroupKind::Parens => GroupKind::Initializer,
                _ => GroupKind::Block,
            };
        }
        Some(p) if p.is_punct("->") => return GroupKind::Block,
        Some(p) if p.is_punct("=") || p.is_group(Delimiter::Bracket) => {
            return GroupKind::Initializer;
        }
        Some(p) if p.is_punct(",") && matches!(parent, GroupKind::Initializer | GroupKind::Parens) => {
            return GroupKind::Initializer;
        }
        _ => {}
    }

    let header = statement_header(siblings, index);
    if header.iter().any(|n| TYPE_KEYWORDS.iter().any(|kw| n.is_ident(kw))) {
        return GroupKind::TypeBody;
    }
    // `new Foo(args) { ... }` declares an anonymous class
    let anonymous = header.len() >= 3
        && header[header.len() - 1].is_group(Delimiter::Parenthesis)
        && header.iter().any(|n| n.is_ident("new"));
    if anonymous {
        return GroupKind::TypeBody;
    }
    GroupKind::Block
}

/// The nodes between the previous statement boundary and `index`, the
/// node at `index` excluded.
///
/// A boundary is a `;`, a brace group or the start of the sibling list.
pub fn statement_header(siblings: &[Node], index: usize) -> &[Node] {
    let end = index.min(siblings.len());
    let start = siblings[..end]
        .iter()
        .rposition(|n| n.is_punct(";") || n.is_group(Delimiter::Brace))
        .map(|i| i + 1)
        .unwrap_or(0);
    &siblings[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstDocument;

    fn root(src: &str) -> Group {
        AstDocument::parse(src).unwrap().root().clone()
    }

    #[test]
    fn test_compact_text_drops_trivia() {
        let g = root("java.util . Map< String , List<Integer> >");
        assert_eq!(compact_text(&g.children), "java.util.Map<String,List<Integer>>");
    }

    #[test]
    fn test_op_len_at_recovers_split_operators() {
        let g = root("a >= b >>= c > d");
        assert_eq!(op_len_at(&g.children, 1, ">="), Some(2));
        assert_eq!(op_len_at(&g.children, 1, ">"), Some(1));
        assert_eq!(op_len_at(&g.children, 4, ">>="), Some(3));
        // `> d` is a lone greater-than
        assert_eq!(op_len_at(&g.children, 8, ">="), None);
        assert_eq!(op_len_at(&g.children, 0, ">="), None);
    }

    #[test]
    fn test_classify_braces() {
        let g = root(
            "class A { void f() { Runnable r = () -> {}; int[] xs = {1}; Object o = new Object() {}; } }",
        );
        assert_eq!(classify(GroupKind::CompilationUnit, &g.children, 2), GroupKind::TypeBody);

        let body = g.children[2].as_group().unwrap();
        // void f ( ) { ... }
        assert_eq!(classify(GroupKind::TypeBody, &body.children, 3), GroupKind::Block);

        let block = body.children[3].as_group().unwrap();
        let kinds: Vec<_> = block
            .children
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_group(Delimiter::Brace))
            .map(|(i, _)| classify(GroupKind::Block, &block.children, i))
            .collect();
        assert_eq!(
            kinds,
            vec![GroupKind::Block, GroupKind::Initializer, GroupKind::TypeBody]
        );
    }

    #[test]
    fn test_statement_header() {
        let g = root("a; @Override public void run() { } b c");
        // a ; @ Override public void run ( ) { } b c
        let header = statement_header(&g.children, 8);
        assert_eq!(compact_text(header), "@Overridepublicvoidrun()");
        assert_eq!(compact_text(statement_header(&g.children, 7)), "@Overridepublicvoidrun");
        assert_eq!(compact_text(statement_header(&g.children, 10)), "b");
        assert_eq!(compact_text(statement_header(&g.children, g.children.len())), "bc");
    }
}
