//! The parsed document and its generation-tagged caches.

use once_cell::unsync::OnceCell;

use crate::error::ParseError;
use crate::lexer;
use crate::printer::{self, PrintMode};
use crate::symbols::{LineIndex, SymbolTable};
use crate::tree::{self, Group, GroupKind};

/// Identifies one parse of a file. Every reparse after a mutation bumps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Context handed to walk callbacks alongside the group being visited.
///
/// Everything here is read-only: callbacks may only edit the group they
/// are given.
#[derive(Debug, Clone, Copy)]
pub struct WalkCtx<'a> {
    /// Kinds of the enclosing groups, outermost first
    pub ancestors: &'a [GroupKind],
    /// Kind of the group being visited
    pub kind: GroupKind,
    pub symbols: &'a SymbolTable,
    pub generation: Generation,
}

impl WalkCtx<'_> {
    pub fn parent(&self) -> Option<GroupKind> {
        self.ancestors.last().copied()
    }

    /// True if any enclosing group is of `kind`
    pub fn within(&self, kind: GroupKind) -> bool {
        self.ancestors.contains(&kind)
    }
}

/// One parse of one source file.
///
/// Derived facts (symbols, line offsets) are computed on first use and
/// belong to this generation only. Once a walk reports a change the
/// document is dirty: its caches are dropped and it should be printed and
/// reparsed with [`AstDocument::reparse`] before anything else reads it.
#[derive(Debug)]
pub struct AstDocument {
    root: Group,
    generation: Generation,
    source: String,
    dirty: bool,
    symbols: OnceCell<SymbolTable>,
    lines: OnceCell<LineIndex>,
}

impl AstDocument {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Self::parse_with_generation(source, Generation::default())
    }

    pub fn parse_with_generation(source: &str, generation: Generation) -> Result<Self, ParseError> {
        let root = lexer::build_tree(source)?;
        log::trace!(
            "Parsed generation {} ({} bytes)",
            generation.get(),
            source.len()
        );
        Ok(AstDocument {
            root,
            generation,
            source: source.to_string(),
            dirty: false,
            symbols: OnceCell::new(),
            lines: OnceCell::new(),
        })
    }

    /// Consume this document and parse `text` as its next generation.
    pub fn reparse(self, text: &str) -> Result<Self, ParseError> {
        Self::parse_with_generation(text, self.generation.next())
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The text this generation was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
            .get_or_init(|| SymbolTable::build(&self.root, self.generation))
    }

    pub fn line_index(&self) -> &LineIndex {
        self.lines.get_or_init(|| LineIndex::new(&self.source))
    }

    /// Regenerate source text from the tree.
    pub fn print(&self) -> String {
        printer::print_group(&self.root, PrintMode::Regenerate)
    }

    /// Visit every group in pre-order, root first.
    ///
    /// The callback returns whether it changed the group; a child is
    /// classified and visited after its parent's callback has run, so
    /// nodes inserted by the callback are walked too. Returns true if any
    /// callback reported a change.
    pub fn walk_mut<E, F>(&mut self, mut f: F) -> Result<bool, E>
    where
        F: FnMut(&mut Group, &WalkCtx<'_>) -> Result<bool, E>,
    {
        let symbols = self
            .symbols
            .get_or_init(|| SymbolTable::build(&self.root, self.generation));
        let mut ancestors = Vec::new();
        let changed = walk_group(
            &mut self.root,
            GroupKind::CompilationUnit,
            &mut ancestors,
            symbols,
            self.generation,
            &mut f,
        )?;
        if changed {
            self.dirty = true;
            self.symbols = OnceCell::new();
            self.lines = OnceCell::new();
        }
        Ok(changed)
    }
}

fn walk_group<E, F>(
    group: &mut Group,
    kind: GroupKind,
    ancestors: &mut Vec<GroupKind>,
    symbols: &SymbolTable,
    generation: Generation,
    f: &mut F,
) -> Result<bool, E>
where
    F: FnMut(&mut Group, &WalkCtx<'_>) -> Result<bool, E>,
{
    let cx = WalkCtx {
        ancestors: ancestors.as_slice(),
        kind,
        symbols,
        generation,
    };
    let mut changed = f(group, &cx)?;

    ancestors.push(kind);
    for i in 0..group.children.len() {
        let child_kind = tree::classify(kind, &group.children, i);
        if let Some(child) = group.children[i].as_group_mut() {
            changed |= walk_group(child, child_kind, ancestors, symbols, generation, f)?;
        }
    }
    ancestors.pop();
    Ok(changed)
}
