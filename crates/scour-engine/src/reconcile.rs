//! Keeping only the intended edits of a regenerated text.
//!
//! The printer normalises trivia while it regenerates a document, so the
//! regenerated text differs from the original in more places than the
//! mutators touched. The reconciler diffs the two line by line, drops the
//! hunks that only the printer could have produced and applies the rest to
//! the original text.

use std::borrow::Cow;

use scour_java::LineEndingHint;
use similar::{Algorithm, DiffOp, capture_diff_slices};
use tracing::instrument;

use crate::error::ReconcileError;
use crate::normalize::StyleNormalizer;

/// Trimmed contents of the lines the printer deletes on its own: blank
/// lines, and blank lines inside block comments.
const ARTIFACT_LINES: &[&str] = &["", "*"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// One contiguous region of a line diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<'t> {
    pub kind: HunkKind,
    /// Index of the first source line covered by the hunk
    pub source_start: usize,
    pub source: Vec<&'t str>,
    pub target: Vec<&'t str>,
}

impl<'t> Hunk<'t> {
    fn from_op(op: &DiffOp, source: &[&'t str], target: &[&'t str]) -> Self {
        let kind = match op {
            DiffOp::Equal { .. } => HunkKind::Equal,
            DiffOp::Delete { .. } => HunkKind::Delete,
            DiffOp::Insert { .. } => HunkKind::Insert,
            DiffOp::Replace { .. } => HunkKind::Replace,
        };
        Hunk {
            kind,
            source_start: op.old_range().start,
            source: source[op.old_range()].to_vec(),
            target: target[op.new_range()].to_vec(),
        }
    }

    /// True for a deletion of lines that the printer drops by itself
    pub fn is_artifact(&self) -> bool {
        if self.kind != HunkKind::Delete {
            return false;
        }
        let mut distinct = self.source.iter().map(|line| line.trim());
        let Some(first) = distinct.next() else {
            return false;
        };
        distinct.all(|line| line == first) && ARTIFACT_LINES.contains(&first)
    }

    fn line_delta(&self) -> isize {
        self.target.len() as isize - self.source.len() as isize
    }
}

/// An ordered set of non-equal hunks between two line sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch<'t> {
    hunks: Vec<Hunk<'t>>,
}

impl<'t> Patch<'t> {
    /// Myers line diff of `source` against `target`.
    ///
    /// Blank source lines at either edge of a replacement become deletions
    /// of their own unless the replacement keeps blank lines there too.
    pub fn diff(source: &[&'t str], target: &[&'t str]) -> Self {
        let hunks = capture_diff_slices(Algorithm::Myers, source, target)
            .iter()
            .map(|op| Hunk::from_op(op, source, target))
            .filter(|h| h.kind != HunkKind::Equal)
            .flat_map(split_blank_edges)
            .collect();
        Patch { hunks }
    }

    pub fn hunks(&self) -> &[Hunk<'t>] {
        &self.hunks
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Apply the hunks to `source`, checking that every hunk finds the
    /// lines it expects.
    pub fn apply(&self, source: &[&'t str]) -> Result<Vec<&'t str>, ReconcileError> {
        let mut out = Vec::with_capacity(source.len());
        let mut cursor = 0;
        for hunk in &self.hunks {
            let start = hunk.source_start;
            let end = start + hunk.source.len();
            if start < cursor || end > source.len() {
                return Err(ReconcileError::Apply {
                    line: start + 1,
                    reason: format!("hunk overlaps or runs past {} lines", source.len()),
                });
            }
            if source[start..end] != hunk.source[..] {
                return Err(ReconcileError::Apply {
                    line: start + 1,
                    reason: "source lines do not match".to_string(),
                });
            }
            out.extend_from_slice(&source[cursor..start]);
            out.extend_from_slice(&hunk.target);
            cursor = end;
        }
        out.extend_from_slice(&source[cursor..]);
        Ok(out)
    }

    /// Undo [`Patch::apply`] on its output.
    ///
    /// Target positions are derived from the hunks of this patch alone, so
    /// a filtered patch restores its own output too.
    pub fn restore(&self, target: &[&'t str]) -> Result<Vec<&'t str>, ReconcileError> {
        let mut out = Vec::with_capacity(target.len());
        let mut cursor = 0;
        let mut delta = 0isize;
        for hunk in &self.hunks {
            let start = hunk.source_start as isize + delta;
            let Ok(start) = usize::try_from(start) else {
                return Err(ReconcileError::Apply {
                    line: hunk.source_start + 1,
                    reason: "hunk starts before the text".to_string(),
                });
            };
            let end = start + hunk.target.len();
            if start < cursor || end > target.len() || target[start..end] != hunk.target[..] {
                return Err(ReconcileError::Apply {
                    line: start + 1,
                    reason: "target lines do not match".to_string(),
                });
            }
            out.extend_from_slice(&target[cursor..start]);
            out.extend_from_slice(&hunk.source);
            cursor = end;
            delta += hunk.line_delta();
        }
        out.extend_from_slice(&target[cursor..]);
        Ok(out)
    }
}

fn leading_blanks(lines: &[&str]) -> usize {
    lines.iter().take_while(|line| line.trim().is_empty()).count()
}

fn trailing_blanks(lines: &[&str]) -> usize {
    lines.iter().rev().take_while(|line| line.trim().is_empty()).count()
}

fn blank_deletion<'t>(source_start: usize, source: &[&'t str]) -> Hunk<'t> {
    Hunk {
        kind: HunkKind::Delete,
        source_start,
        source: source.to_vec(),
        target: Vec::new(),
    }
}

/// Split a replacement into `[blank deletion] replacement [blank deletion]`.
fn split_blank_edges(hunk: Hunk<'_>) -> Vec<Hunk<'_>> {
    if hunk.kind != HunkKind::Replace {
        return vec![hunk];
    }
    let lead = leading_blanks(&hunk.source).saturating_sub(leading_blanks(&hunk.target));
    let trail =
        trailing_blanks(&hunk.source[lead..]).saturating_sub(trailing_blanks(&hunk.target));
    if lead == 0 && trail == 0 {
        return vec![hunk];
    }

    let middle_end = hunk.source.len() - trail;
    let mut parts = Vec::with_capacity(3);
    if lead > 0 {
        parts.push(blank_deletion(hunk.source_start, &hunk.source[..lead]));
    }
    let middle = &hunk.source[lead..middle_end];
    parts.push(Hunk {
        kind: if middle.is_empty() {
            HunkKind::Insert
        } else {
            HunkKind::Replace
        },
        source_start: hunk.source_start + lead,
        source: middle.to_vec(),
        target: hunk.target.clone(),
    });
    if trail > 0 {
        parts.push(blank_deletion(
            hunk.source_start + middle_end,
            &hunk.source[middle_end..],
        ));
    }
    parts
}

/// The real hunks of a patch, with printer artifacts filtered out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledPatch<'t> {
    patch: Patch<'t>,
    artifacts: usize,
}

impl<'t> ReconciledPatch<'t> {
    pub fn filter(patch: Patch<'t>) -> Self {
        let before = patch.hunks.len();
        let hunks: Vec<Hunk<'t>> = patch.hunks.into_iter().filter(|h| !h.is_artifact()).collect();
        ReconciledPatch {
            artifacts: before - hunks.len(),
            patch: Patch { hunks },
        }
    }

    pub fn hunks(&self) -> &[Hunk<'t>] {
        self.patch.hunks()
    }

    /// Number of hunks dropped as printer artifacts
    pub fn artifacts(&self) -> usize {
        self.artifacts
    }

    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }

    pub fn apply(&self, source: &[&'t str]) -> Result<Vec<&'t str>, ReconcileError> {
        self.patch.apply(source)
    }

    pub fn restore(&self, target: &[&'t str]) -> Result<Vec<&'t str>, ReconcileError> {
        self.patch.restore(target)
    }
}

/// Reconcile the original `dirty` text with the regenerated `clean` text.
///
/// Returns `dirty` itself when nothing but printer noise separates the two,
/// and `clean` untouched when no line terminator can be determined.
#[instrument(name = "reconcile", skip_all, fields(bytes = dirty.len()))]
pub fn reconcile<'a>(
    dirty: &'a str,
    clean: &'a str,
    line_ending: LineEndingHint,
    normalizer: Option<&dyn StyleNormalizer>,
) -> Result<Cow<'a, str>, ReconcileError> {
    if dirty == clean {
        return Ok(Cow::Borrowed(dirty));
    }
    let Some(ending) = line_ending.resolve(dirty) else {
        log::debug!("No line terminator in the original, keeping the regenerated text");
        return Ok(Cow::Borrowed(clean));
    };
    let token = ending.as_str();

    let normalized = match normalizer {
        Some(n) => Cow::Owned(
            n.normalize(clean)
                .map_err(|e| ReconcileError::Normalize(format!("{e:#}")))?,
        ),
        None => Cow::Borrowed(clean),
    };

    let dirty_lines: Vec<&str> = dirty.split(token).collect();
    let clean_lines: Vec<&str> = normalized.split(token).collect();
    let patch = Patch::diff(&dirty_lines, &clean_lines);
    if patch.apply(&dirty_lines).ok().as_deref() != Some(&clean_lines[..]) {
        return Err(ReconcileError::RoundTrip { direction: "apply" });
    }
    if patch.restore(&clean_lines).ok().as_deref() != Some(&dirty_lines[..]) {
        return Err(ReconcileError::RoundTrip { direction: "restore" });
    }

    let reconciled = ReconciledPatch::filter(patch);
    log::trace!(
        "{} real hunks, {} printer artifacts",
        reconciled.hunks().len(),
        reconciled.artifacts()
    );
    if reconciled.is_empty() {
        return Ok(Cow::Borrowed(dirty));
    }
    let lines = reconciled.apply(&dirty_lines)?;
    if reconciled.restore(&lines)? != dirty_lines {
        return Err(ReconcileError::RoundTrip {
            direction: "filtered restore",
        });
    }
    Ok(Cow::Owned(lines.join(token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn test_artifact_classification() {
        let delete = |source: Vec<&'static str>| Hunk {
            kind: HunkKind::Delete,
            source_start: 0,
            source,
            target: vec![],
        };
        assert!(delete(vec!["", "   "]).is_artifact());
        assert!(delete(vec!["   *", " *"]).is_artifact());
        assert!(!delete(vec!["", " *"]).is_artifact());
        assert!(!delete(vec!["x"]).is_artifact());
        assert!(!delete(vec!["/*"]).is_artifact());
        let insert = Hunk {
            kind: HunkKind::Insert,
            ..delete(vec![""])
        };
        assert!(!insert.is_artifact());
    }

    #[test]
    fn test_patch_round_trips() {
        let a = lines("a\nb\nc\n\nd");
        let b = lines("a\nB\nc\nd\ne");
        let patch = Patch::diff(&a, &b);
        assert_eq!(patch.apply(&a).unwrap(), b);
        assert_eq!(patch.restore(&b).unwrap(), a);
        assert!(patch.apply(&b).is_err());
    }

    #[test]
    fn test_filtered_patch_round_trips() {
        let a = lines("x = 1;\n\n\n\ny = 2;\nz = a == true;\n/*\n *\n *\n */");
        let b = lines("x = 1;\n\ny = 2;\nz = a;\n/*\n *\n */");
        let reconciled = ReconciledPatch::filter(Patch::diff(&a, &b));
        assert_eq!(reconciled.artifacts(), 2);
        let out = reconciled.apply(&a).unwrap();
        assert_eq!(out, lines("x = 1;\n\n\n\ny = 2;\nz = a;\n/*\n *\n *\n */"));
        assert_eq!(reconciled.restore(&out).unwrap(), a);
    }

    #[test]
    fn test_blank_edges_split_from_replacements() {
        let replace = |source_start, source: Vec<&'static str>, target: Vec<&'static str>| Hunk {
            kind: HunkKind::Replace,
            source_start,
            source,
            target,
        };
        fn kinds(hunks: &[Hunk<'_>]) -> Vec<(HunkKind, usize, usize)> {
            hunks
                .iter()
                .map(|h| (h.kind, h.source_start, h.source.len()))
                .collect()
        }

        let parts = split_blank_edges(replace(3, vec!["", "a == true;", "", ""], vec!["a;"]));
        assert_eq!(
            kinds(&parts),
            [
                (HunkKind::Delete, 3, 1),
                (HunkKind::Replace, 4, 1),
                (HunkKind::Delete, 5, 2)
            ]
        );
        assert!(parts[0].is_artifact() && parts[2].is_artifact());
        assert_eq!(parts[1].target, ["a;"]);

        // Blank lines the replacement keeps stay inside it
        let parts = split_blank_edges(replace(0, vec!["a == true;", "", ""], vec!["a;", ""]));
        assert_eq!(
            kinds(&parts),
            [(HunkKind::Replace, 0, 2), (HunkKind::Delete, 2, 1)]
        );

        let parts = split_blank_edges(replace(0, vec!["", ""], vec!["x"]));
        assert_eq!(
            kinds(&parts),
            [(HunkKind::Delete, 0, 2), (HunkKind::Insert, 2, 0)]
        );

        let untouched = replace(0, vec!["a"], vec!["b"]);
        assert_eq!(split_blank_edges(untouched.clone()), [untouched]);
    }

    #[test]
    fn test_split_patch_round_trips() {
        let a = lines("x;\n\na == true;\n\n\n\ny;");
        let patch = Patch {
            hunks: split_blank_edges(Hunk {
                kind: HunkKind::Replace,
                source_start: 1,
                source: a[1..6].to_vec(),
                target: vec!["a;", ""],
            }),
        };
        let b = patch.apply(&a).unwrap();
        assert_eq!(b, lines("x;\na;\n\ny;"));
        assert_eq!(patch.restore(&b).unwrap(), a);

        let reconciled = ReconciledPatch::filter(patch);
        assert_eq!(reconciled.artifacts(), 2);
        let kept = reconciled.apply(&a).unwrap();
        assert_eq!(kept, lines("x;\n\na;\n\n\n\ny;"));
        assert_eq!(reconciled.restore(&kept).unwrap(), a);
    }

    #[test]
    fn test_blank_lines_after_an_edit_survive() {
        let dirty = "class A {\n  boolean f() { return a == true; }\n\n\n\n  int y;\n}\n";
        let clean = "class A {\n  boolean f() { return a; }\n\n  int y;\n}\n";
        let out = reconcile(dirty, clean, LineEndingHint::Auto, None).unwrap();
        assert_eq!(
            out,
            "class A {\n  boolean f() { return a; }\n\n\n\n  int y;\n}\n"
        );
    }

    #[test]
    fn test_reconcile_keeps_only_real_edits() {
        let dirty = "class A {\n\n\n\n  int x;\n  boolean f() { return a == true; }\n}\n";
        let clean = "class A {\n\n  int x;\n  boolean f() { return a; }\n}\n";
        let out = reconcile(dirty, clean, LineEndingHint::Auto, None).unwrap();
        assert_eq!(out, "class A {\n\n\n\n  int x;\n  boolean f() { return a; }\n}\n");
    }

    #[test]
    fn test_reconcile_fast_paths() {
        let text = "a;\n";
        assert!(matches!(
            reconcile(text, text, LineEndingHint::Auto, None).unwrap(),
            Cow::Borrowed(s) if std::ptr::eq(s, text)
        ));

        // No terminator to split on
        let out = reconcile("a == true;", "a;", LineEndingHint::Auto, None).unwrap();
        assert_eq!(out, "a;");

        // Only printer noise
        let dirty = "a;\n\n\n\nb;\n";
        let out = reconcile(dirty, "a;\n\nb;\n", LineEndingHint::Preserve, None).unwrap();
        assert!(matches!(out, Cow::Borrowed(s) if std::ptr::eq(s, dirty)));
    }

    #[test]
    fn test_reconcile_crlf() {
        let dirty = "a == true;\r\nc;\r\n\r\n\r\n\r\nb;\r\n";
        let clean = "a;\r\nc;\r\n\r\nb;\r\n";
        let out = reconcile(dirty, clean, LineEndingHint::Auto, None).unwrap();
        assert_eq!(out, "a;\r\nc;\r\n\r\n\r\n\r\nb;\r\n");
    }

    #[test]
    fn test_reconcile_runs_normalizer() {
        let normalizer = scour_fmt::WhitespaceFormatter::default();
        let out = reconcile(
            "a == true;   \nb;",
            "a;   \nb;",
            LineEndingHint::Lf,
            Some(&normalizer),
        )
        .unwrap();
        assert_eq!(out, "a;\nb;\n");
    }
}
