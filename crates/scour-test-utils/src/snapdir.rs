//! Throwaway source trees and text manifests of them for snapshots.
//! - Respects `.gitignore` and `.ignore` files
//! - Only includes UTF-8 text files (CRLF→LF), ignores binary files
//! - Deterministic path order

use std::fs;
use std::path::Path;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use ignore::WalkBuilder;

/// A temporary directory of source files, removed on drop.
pub struct JavaTree {
    root: TempDir,
}

impl Default for JavaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaTree {
    pub fn new() -> Self {
        JavaTree {
            root: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> &Self {
        self.root
            .child(rel)
            .write_str(contents)
            .expect("write fixture file");
        self
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.child(rel).path()).expect("read fixture file")
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

/// Every text file under `root` as `=== path` headers followed by contents.
pub fn dir_manifest(root: impl AsRef<Path>) -> String {
    let base = fs::canonicalize(root.as_ref()).expect("failed to canonicalize root path");

    let mut wb = WalkBuilder::new(&base);
    wb.hidden(true)
        .git_ignore(true)
        .ignore(true)
        .git_exclude(true)
        .git_global(false)
        .parents(false);

    let mut entries: Vec<(String, String)> = Vec::new();
    for dent in wb.build().filter_map(Result::ok) {
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let p = dent.path();
        let rel = p
            .strip_prefix(&base)
            .expect("path should be within base")
            .to_string_lossy()
            .replace('\\', "/");
        let Ok(bytes) = fs::read(p) else { continue };
        if let Ok(s) = String::from_utf8(bytes) {
            let mut body = s.replace("\r\n", "\n");
            if !body.ends_with('\n') {
                body.push('\n');
            }
            entries.push((rel, body));
        }
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (rel, body) in entries {
        out.push_str(&format!("=== {rel}\n"));
        out.push_str(&body);
    }
    out
}
