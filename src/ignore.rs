//! Source discovery for directory arguments
//!
//! Walks with the `ignore` crate (so `.gitignore` files apply) and layers
//! default noise patterns plus configured excludes on top.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const DEFAULT_EXCLUDES: &[&str] = &[
    "target/", "node_modules/", "venv/", ".venv/", "vendor/",
    "dist/", "build/", "out/", "__pycache__/", "*.egg-info/",
    ".git/", ".idea/", ".vscode/",
];

pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, extra_excludes: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        for pattern in DEFAULT_EXCLUDES {
            // Static patterns, known to be valid
            builder.add_line(None, pattern).ok();
        }
        for pattern in extra_excludes {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!("ignoring invalid exclude pattern {:?}: {}", pattern, e);
            }
        }

        Self {
            inner: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched_path_or_any_parents(path, is_dir).is_ignore()
    }
}

/// Every non-ignored file below `root` accepted by `accept`, sorted.
pub fn collect_files(root: &Path, extra_excludes: &[String], accept: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let filter = IgnoreFilter::new(root, extra_excludes);
    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| !filter.is_ignored(path, false) && accept(path))
        .collect();
    files.sort();
    files
}
