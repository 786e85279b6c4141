use std::path::{Path, PathBuf};

use anyhow::Result;
use ignore::WalkBuilder;

/// Build output and vendored trees never hold sources worth cleaning
const SKIPPED_DIRS: &[&str] = &["target", "build", "vendor"];

pub fn is_java_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

/// Walk `paths` (or the current directory) and hand every `.java` file to
/// `processor`.
///
/// - Always recursive
/// - Respects git ignore patterns
/// - Skips `target/`, `build/` and `vendor/`
pub fn walk_java_files<F>(paths: &[impl AsRef<Path>], hidden: bool, mut processor: F) -> Result<usize>
where
    F: FnMut(&Path) -> Result<()>,
{
    let walk_paths: Vec<_> = if paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        paths.iter().map(|p| p.as_ref().to_path_buf()).collect()
    };

    let mut found = 0;
    for root in walk_paths {
        let mut builder = WalkBuilder::new(&root);
        builder
            .hidden(!hidden)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
            });

        for result in builder.build() {
            let entry = result?;
            let path = entry.path();
            if path.is_file() && is_java_file(path) {
                processor(path)?;
                found += 1;
            }
        }
    }

    Ok(found)
}

/// Like [`walk_java_files`], collecting the paths in sorted order.
pub fn collect_java_files(paths: &[impl AsRef<Path>], hidden: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_java_files(paths, hidden, |path| {
        files.push(path.to_path_buf());
        Ok(())
    })?;
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_java_files_and_skips_build_output() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for rel in [
            "src/b/B.java",
            "src/A.java",
            "src/notes.txt",
            "target/Gen.java",
            "build/Out.java",
            "vendor/lib/V.java",
            ".hidden/H.java",
        ] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "class X {}").unwrap();
        }

        let rel = |files: Vec<PathBuf>| -> Vec<String> {
            files
                .iter()
                .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
                .collect()
        };
        assert_eq!(
            rel(collect_java_files(&[root], false).unwrap()),
            ["src/A.java", "src/b/B.java"]
        );
        assert_eq!(
            rel(collect_java_files(&[root], true).unwrap()),
            [".hidden/H.java", "src/A.java", "src/b/B.java"]
        );
        // Explicit files are taken as they are
        assert_eq!(
            rel(collect_java_files(&[root.join("src/A.java")], false).unwrap()),
            ["src/A.java"]
        );
    }
}
