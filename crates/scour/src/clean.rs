use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use log::debug;
use rayon::prelude::*;
use scour_engine::{CleanError, CleanOptions, Cleaner, EngineError, StyleNormalizer};
use scour_fmt::{WhitespaceFormatter, unified_diff};
use scour_java::LineEndingHint;
use scour_mutators::{Catalog, RuleSelection, SelectionConfig};

use crate::config::{ScourConfig, Style};
use crate::diagnostics::render_parse_error;
use crate::file_walker::collect_java_files;

#[derive(Args, Debug, Default, Clone)]
#[command(about = "Apply rewrite rules to .java files")]
pub struct CleanArgs {
    /// One or more .java files or directories containing .java files.
    /// When omitted, the current directory tree is cleaned.
    #[arg(value_name = "PATHS", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Report files that would change without writing them.
    /// Exit with non-zero code if any file would change.
    #[arg(long)]
    pub check: bool,

    /// Show diffs instead of writing files
    #[arg(long, conflicts_with = "check")]
    pub diff: bool,

    /// Config file to use instead of ./scour.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Java version the sources target, e.g. 1.8 or 17
    #[arg(long, value_name = "VERSION")]
    pub language_version: Option<String>,

    /// Mutator or composite to run (repeatable, `*` for all)
    #[arg(long = "include", value_name = "ID")]
    pub includes: Vec<String>,

    /// Mutator or composite to skip (repeatable, wins over --include)
    #[arg(long = "exclude", value_name = "ID")]
    pub excludes: Vec<String>,

    /// Also run draft mutators
    #[arg(long)]
    pub draft: bool,

    /// Line terminator for rewritten files: lf, crlf, auto or preserve
    #[arg(long, value_name = "HINT")]
    pub line_ending: Option<LineEndingHint>,

    /// Style pass applied to rewritten files
    #[arg(long, value_enum)]
    pub style: Option<Style>,

    /// Expand indentation tabs to this many columns (whitespace style)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub tab_width: Option<u16>,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,
}

enum Outcome {
    Unchanged,
    Changed { fired: Vec<String>, diff: Option<String> },
    Failed(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Write,
    Check,
    Diff,
}

impl CleanArgs {
    fn mode(&self) -> Mode {
        if self.check {
            Mode::Check
        } else if self.diff {
            Mode::Diff
        } else {
            Mode::Write
        }
    }

    /// Merge the config file with the flags; flags win.
    fn cleaner(&self, catalog: &Catalog, config: &ScourConfig) -> Result<Cleaner> {
        let java = &config.java;
        let version = self
            .language_version
            .as_deref()
            .or(java.version.as_deref())
            .context("No language version given; pass --language-version or set java.version in scour.toml")?;

        let selection_config = SelectionConfig::new(version)?
            .include(java.includes.iter().chain(&self.includes))
            .exclude(java.excludes.iter().chain(&self.excludes))
            .production_ready_only(java.production_ready_only && !self.draft);
        let selection = RuleSelection::resolve(catalog, &selection_config)?;
        debug!(
            "Selected {} mutators for {}: {}",
            selection.len(),
            selection.version(),
            selection.ids().join(", ")
        );

        let line_ending = match self.line_ending {
            Some(hint) => hint,
            None => java.line_ending_hint()?.unwrap_or_default(),
        };
        let tab_width = self.tab_width.map(usize::from).or(java.tab_width);
        if tab_width == Some(0) {
            anyhow::bail!("Invalid java.tab_width: must be at least 1");
        }
        let normalizer: Option<Box<dyn StyleNormalizer>> =
            match self.style.or(java.style).unwrap_or_default() {
                Style::None => None,
                Style::Whitespace => {
                    let formatter = WhitespaceFormatter::default();
                    Some(Box::new(match tab_width {
                        Some(width) => formatter.with_tab_width(width),
                        None => formatter,
                    }))
                }
            };

        Ok(Cleaner::new(
            selection,
            CleanOptions {
                line_ending,
                normalizer,
            },
        ))
    }
}

fn clean_file(cleaner: &Cleaner, path: &Path, shown: &Path, mode: Mode) -> Result<Outcome> {
    debug!("Cleaning file: {}", path.display());
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let cleaned = match cleaner.clean(&source) {
        Ok(cleaned) => cleaned,
        Err(CleanError::Engine(EngineError::Parse(e))) => {
            let color = std::io::stderr().is_terminal();
            return Ok(Outcome::Failed(render_parse_error(shown, &source, &e, color)));
        }
        Err(e) => return Ok(Outcome::Failed(format!("{}: {e}", shown.display()))),
    };
    if !cleaned.changed {
        return Ok(Outcome::Unchanged);
    }

    let diff = match mode {
        Mode::Diff => Some(unified_diff(&source, &cleaned.text, shown)),
        Mode::Check => None,
        Mode::Write => {
            fs::write(path, cleaned.text.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            None
        }
    };
    Ok(Outcome::Changed {
        fired: cleaned.fired,
        diff,
    })
}

/// `path` relative to the working directory when it lies below it
fn display_path(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd).unwrap_or(path).to_path_buf()
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "file" } else { "files" }
}

pub fn execute(args: CleanArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = ScourConfig::discover(args.config.as_deref(), &cwd)?;
    let catalog = Catalog::load()?;
    let cleaner = args.cleaner(&catalog, &config)?;
    let mode = args.mode();

    let files = collect_java_files(&args.paths, args.hidden)?;
    if files.is_empty() {
        let root_display = if args.paths.is_empty() {
            cwd.display().to_string()
        } else {
            args.paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        anyhow::bail!("No .java files found in {root_display}");
    }

    // Files are independent; results come back in path order
    let outcomes: Vec<(PathBuf, Outcome)> = files
        .par_iter()
        .map(|path| {
            let shown = display_path(path, &cwd);
            let outcome = clean_file(&cleaner, path, &shown, mode)
                .unwrap_or_else(|e| Outcome::Failed(format!("{e:#}")));
            (shown, outcome)
        })
        .collect();

    let mut changed = 0;
    let mut failed = 0;
    for (shown, outcome) in &outcomes {
        match outcome {
            Outcome::Unchanged => debug!("Unchanged: {}", shown.display()),
            Outcome::Changed { fired, diff } => {
                changed += 1;
                match (mode, diff) {
                    (Mode::Diff, Some(diff)) => print!("{diff}"),
                    (Mode::Check, _) => println!(
                        "{} {} ({})",
                        "would clean".yellow(),
                        shown.display().to_string().bold(),
                        fired.join(", ")
                    ),
                    _ => println!(
                        "{} {} ({})",
                        "cleaned".green(),
                        shown.display().to_string().bold(),
                        fired.join(", ")
                    ),
                }
            }
            Outcome::Failed(message) => {
                failed += 1;
                eprintln!("{} {message}", "error:".red());
            }
        }
    }

    eprintln!(
        "{changed} of {} {} {}",
        outcomes.len(),
        plural(outcomes.len()),
        if mode == Mode::Write { "cleaned" } else { "would change" }
    );

    if failed > 0 {
        anyhow::bail!("Failed to clean {failed} {}", plural(failed));
    }
    if mode == Mode::Check && changed > 0 {
        anyhow::bail!("{changed} {} would be changed", plural(changed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(version: &str) -> CleanArgs {
        CleanArgs {
            language_version: Some(version.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_flags_override_config() {
        let catalog = Catalog::load().unwrap();
        let config = ScourConfig::parse(
            "[java]\nversion = \"1.4\"\nincludes = [\"UseDiamondOperator\", \"BooleanLiteralComparison\"]\n",
        )
        .unwrap();

        // 1.4 predates the diamond operator
        let cleaner = CleanArgs::default().cleaner(&catalog, &config).unwrap();
        assert_eq!(cleaner.selection().ids(), ["BooleanLiteralComparison"]);

        let cleaner = args("8").cleaner(&catalog, &config).unwrap();
        assert_eq!(
            cleaner.selection().ids(),
            ["BooleanLiteralComparison", "UseDiamondOperator"]
        );

        let mut excluding = args("8");
        excluding.excludes.push("RSPEC-1125".to_string());
        let cleaner = excluding.cleaner(&catalog, &config).unwrap();
        assert_eq!(cleaner.selection().ids(), ["UseDiamondOperator"]);
    }

    #[test]
    fn test_version_is_required() {
        let catalog = Catalog::load().unwrap();
        let err = CleanArgs::default()
            .cleaner(&catalog, &ScourConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("No language version given"));
    }

    #[test]
    fn test_tab_width_reaches_the_style_pass() {
        let catalog = Catalog::load().unwrap();
        let source = "class A {\n\tboolean f(boolean x) {\n\t\treturn x == true;\n\t}\n}\n";
        let config = ScourConfig::parse(
            "[java]\nversion = \"8\"\nstyle = \"whitespace\"\ntab_width = 2\n",
        )
        .unwrap();
        let cleaned = CleanArgs::default()
            .cleaner(&catalog, &config)
            .unwrap()
            .clean(source)
            .unwrap();
        assert_eq!(
            cleaned.text,
            "class A {\n  boolean f(boolean x) {\n    return x;\n  }\n}\n"
        );

        let mut wider = args("8");
        wider.tab_width = Some(4);
        let cleaned = wider.cleaner(&catalog, &config).unwrap().clean(source).unwrap();
        assert!(cleaned.text.contains("\n        return x;\n"));

        let zero = ScourConfig::parse("[java]\nversion = \"8\"\ntab_width = 0\n").unwrap();
        let err = CleanArgs::default().cleaner(&catalog, &zero).err().unwrap();
        assert!(err.to_string().contains("tab_width"));
    }

    #[test]
    fn test_drafts_need_opt_in() {
        let catalog = Catalog::load().unwrap();
        let config = ScourConfig::default();
        let ready = args("21").cleaner(&catalog, &config).unwrap();
        assert!(!ready.selection().ids().contains(&"StreamAnyMatch"));

        let mut draft = args("21");
        draft.draft = true;
        let all = draft.cleaner(&catalog, &config).unwrap();
        assert!(all.selection().ids().contains(&"StreamAnyMatch"));
    }
}
