//! File system scanner for discovering template files.
//!
//! Recursively scans directories for `template.json` files, skipping
//! hidden directories and anything the manifest excludes.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::manifest::Manifest;
use super::TEMPLATE_FILENAME;

/// Scan a directory for template files, sorted by path.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    if !root.exists() {
        return vec![];
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == TEMPLATE_FILENAME)
        .map(|e| e.into_path())
        .filter(|p| {
            let relative = p.strip_prefix(root).unwrap_or(p);
            !manifest.is_excluded(relative)
        })
        .collect();

    found.sort();
    found
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
