use scour_fmt::WhitespaceFormatter;

/// Whole-file style pass run over regenerated text before it is reconciled.
pub trait StyleNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> anyhow::Result<String>;
}

impl StyleNormalizer for WhitespaceFormatter {
    fn normalize(&self, text: &str) -> anyhow::Result<String> {
        self.format_source(text)
    }
}
