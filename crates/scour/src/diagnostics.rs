use std::path::Path;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, sources};
use scour_java::ParseError;

/// Render a parse error against the file it came from.
pub fn render_parse_error(path: &Path, source: &str, error: &ParseError, color: bool) -> String {
    let id = path.display().to_string();
    let start = error.location().offset.min(source.len());
    let end = source[start..]
        .chars()
        .next()
        .map_or(start, |ch| start + ch.len_utf8());

    let report = Report::build(ReportKind::Error, (id.clone(), start..end))
        .with_config(
            Config::default()
                .with_color(color)
                .with_index_type(IndexType::Byte),
        )
        .with_message("source could not be parsed; the file was left untouched")
        .with_label(
            Label::new((id.clone(), start..end))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish();

    let mut out = Vec::new();
    if report.write(sources([(id, source)]), &mut out).is_err() {
        return format!("{}: {error}", path.display());
    }
    String::from_utf8_lossy(&out).into_owned()
}
