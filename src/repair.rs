//! Broken-path repair for a single document.
//!
//! Finds literals whose resolved path no longer exists on disk, searches the
//! workspace for a file with a matching basename, and rewrites the literal to
//! the first candidate using the original literal's style. Best-effort:
//! ambiguous matches are resolved by taking the first candidate from a
//! name-sorted walk, which keeps the choice deterministic but not
//! content-aware.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::engine::ChangeLogEntry;
use crate::error::{Error, Result};
use crate::files::{self, FileSystem};
use crate::log_status;
use crate::{resolve, scanner, style};

/// Result of one repair pass over a document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub document: String,
    pub changes: Vec<ChangeLogEntry>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

/// Repair broken path literals in `document`.
///
/// With `write` false the report is a dry-run preview. Literals with no
/// workspace candidate are left alone; an empty `changes` list means no
/// broken paths were detected (or none could be repaired).
pub fn repair(root: &Path, document: &Path, config: &ScanConfig, write: bool) -> Result<RepairReport> {
    let fs = files::local();
    if !fs.exists(document) {
        return Err(Error::document_not_found(
            document.to_string_lossy().to_string(),
        ));
    }

    let content = fs.read(document)?;
    let dir = document
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    let relative = document
        .strip_prefix(root)
        .unwrap_or(document)
        .to_string_lossy()
        .to_string();

    let mut edits: Vec<(usize, usize, String)> = Vec::new();
    let mut changes = Vec::new();

    let mut offset = 0usize;
    for (line_idx, raw_line) in content.split_inclusive('\n').enumerate() {
        let line = raw_line.trim_end_matches('\n').trim_end_matches('\r');

        for m in scanner::scan(line) {
            let decoded = style::decode(&m.raw);
            if decoded.is_empty() {
                continue;
            }
            let resolved = resolve::resolve(&decoded, &dir);
            if fs.exists(Path::new(&resolved)) {
                continue;
            }

            let Some(basename) = basename_of(&decoded) else {
                continue;
            };
            let candidates = search_by_basename(root, basename, config);
            let Some(candidate) = candidates.first() else {
                continue;
            };

            let new_inner = resolve::compute_replacement(
                resolve::is_absolute(&decoded),
                &candidate.to_string_lossy(),
                &dir,
            );
            let new_raw = style::encode(&new_inner, &m.raw);
            if new_raw == m.raw {
                continue;
            }

            edits.push((offset + m.start, offset + m.start + m.len, new_raw));
            changes.push(ChangeLogEntry {
                file: relative.clone(),
                line: line_idx + 1,
                old_inner: decoded,
                new_inner,
            });
        }

        offset += raw_line.len();
    }

    let applied = write && !edits.is_empty();
    if applied {
        // One batch against the original text, descending offsets.
        edits.sort_by(|a, b| b.0.cmp(&a.0));
        let mut new_content = content;
        for (start, end, replacement) in &edits {
            new_content.replace_range(*start..*end, replacement);
        }
        fs.write(document, &new_content)?;
    }

    if changes.is_empty() {
        log_status!("repair", "No broken paths detected in {}", relative);
    } else {
        log_status!("repair", "{}: {} repair(s)", relative, changes.len());
    }

    Ok(RepairReport {
        document: relative,
        changes,
        applied,
    })
}

/// Last path segment of a path value, if any.
fn basename_of(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).find(|s| !s.is_empty())
}

/// Walk the workspace for files whose name contains `basename`
/// (case-insensitive), excluding dependency directories. Directory entries
/// are visited in name order so the first candidate is stable across runs.
fn search_by_basename(root: &Path, basename: &str, config: &ScanConfig) -> Vec<PathBuf> {
    let needle = basename.to_lowercase();
    let mut found = Vec::new();
    walk(root, &needle, config, &mut found);
    found
}

fn walk(dir: &Path, needle: &str, config: &ScanConfig, found: &mut Vec<PathBuf>) {
    if found.len() >= config.search_limit {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if found.len() >= config.search_limit {
            return;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if path.is_dir() {
            if config.skip_dirs.iter().any(|d| d == &name) {
                continue;
            }
            walk(&path, needle, config, found);
        } else if name.to_lowercase().contains(needle) {
            found.push(path);
        }
    }
}
