use std::path::Path;

use similar::TextDiff;

/// Normalises whitespace that no parser sees: trailing blanks at the end of
/// lines, tabs used for indentation and the newline at the end of the file.
#[derive(Debug, Clone, Default)]
pub struct WhitespaceFormatter {
    /// Expand leading tabs to this many spaces, or keep tabs when `None`
    tab_width: Option<usize>,
}

impl WhitespaceFormatter {
    /// Expand indentation tabs to the next multiple of `width` columns
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = Some(width);
        self
    }

    /// Format source code string directly, returning the formatted code.
    ///
    /// Each line keeps its own terminator. Trailing blank lines collapse into
    /// a single final newline, whose style follows the last line of the text.
    pub fn format_source(&self, source: &str) -> anyhow::Result<String> {
        if source.contains('\0') {
            anyhow::bail!("Refusing to format binary content");
        }
        let mut out = String::with_capacity(source.len());
        let mut last_terminator = "\n";
        for line in source.split_inclusive('\n') {
            let (body, terminator) = match line.strip_suffix("\r\n") {
                Some(body) => (body, "\r\n"),
                None => match line.strip_suffix('\n') {
                    Some(body) => (body, "\n"),
                    None => (line, ""),
                },
            };
            if !terminator.is_empty() {
                last_terminator = terminator;
            }
            out.push_str(&self.expand_indent(body.trim_end()));
            out.push_str(terminator);
        }

        let content_end = out.trim_end().len();
        if content_end == 0 {
            return Ok(String::new());
        }
        out.truncate(content_end);
        out.push_str(last_terminator);
        Ok(out)
    }

    fn expand_indent(&self, line: &str) -> String {
        let Some(width) = self.tab_width.filter(|w| *w > 0) else {
            return line.to_string();
        };
        let body = line.trim_start_matches([' ', '\t']);
        let indent = &line[..line.len() - body.len()];
        let mut column = 0;
        for ch in indent.chars() {
            column = if ch == '\t' { column + width - column % width } else { column + 1 };
        }
        format!("{}{body}", " ".repeat(column))
    }
}

/// Unified diff between two versions of `file_path`, empty when they match.
pub fn unified_diff(old: &str, new: &str, file_path: &Path) -> String {
    let diff = TextDiff::from_lines(old, new);
    format!(
        "{}",
        diff.unified_diff().context_radius(3).header(
            &format!("old/{}", file_path.display()),
            &format!("new/{}", file_path.display())
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_whitespace_and_final_newline() {
        let f = WhitespaceFormatter::default();
        assert_eq!(f.format_source("a  \nb\t\n\n\n").unwrap(), "a\nb\n");
        assert_eq!(f.format_source("a\r\nb  ").unwrap(), "a\r\nb\r\n");
        assert_eq!(f.format_source("a\n\n  \n  b\n").unwrap(), "a\n\n\n  b\n");
        assert_eq!(f.format_source("\n \n").unwrap(), "");
        assert!(f.format_source("a\0b").is_err());
    }

    #[test]
    fn test_tab_expansion() {
        let f = WhitespaceFormatter::default().with_tab_width(4);
        assert_eq!(f.format_source("\tx\n  \ty\n").unwrap(), "    x\n    y\n");
        assert_eq!(
            WhitespaceFormatter::default().format_source("\tx\n").unwrap(),
            "\tx\n"
        );
    }

    #[test]
    fn test_is_idempotent() {
        let f = WhitespaceFormatter::default().with_tab_width(2);
        let once = f.format_source("class A {  \r\n\tint x;\r\n}\r\n\r\n").unwrap();
        assert_eq!(f.format_source(&once).unwrap(), once);
    }

    #[test]
    fn test_unified_diff() {
        let path = Path::new("src/A.java");
        assert_eq!(unified_diff("a\n", "a\n", path), "");
        insta::assert_snapshot!(unified_diff("a\nb == true\nc\n", "a\nb\nc\n", path), @r"
        --- old/src/A.java
        +++ new/src/A.java
        @@ -1,3 +1,3 @@
         a
        -b == true
        +b
         c
        ");
    }
}
