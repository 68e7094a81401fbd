//! Rewrite engine — propagate a file rename into source-code path literals.
//!
//! Given a rename event (old absolute path, new absolute path), the engine:
//! 1. Enumerates candidate source files per configured extension glob
//! 2. Scans each line for quoted literals and resolves their path content
//! 3. Rewrites literals whose resolved path matches the old path, preserving
//!    each literal's quoting/escaping style
//! 4. Applies all edits for a file as one batch, then persists the file
//!
//! A literal is only rewritten when its *resolved* absolute path normalizes
//! equal to the old path — raw-text substring matches are never enough.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::files::{self, FileSystem};
use crate::log_status;
use crate::{normalize, resolve, scanner, style};

/// One literal rewrite, for the aggregated summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    /// File path relative to the workspace root.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Path content before the rewrite, as written.
    pub old_inner: String,
    /// Path content after the rewrite.
    pub new_inner: String,
}

/// A candidate file or glob pattern that could not be processed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Aggregate result of one rename event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteReport {
    pub old_path: String,
    pub new_path: String,
    pub changes: Vec<ChangeLogEntry>,
    pub files_changed: usize,
    pub skipped: Vec<SkippedFile>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

/// A pending text replacement, offsets against the original unmutated text.
#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

pub struct RewriteEngine {
    root: PathBuf,
    config: ScanConfig,
}

impl RewriteEngine {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Process one rename event across the workspace.
    ///
    /// With `write` false the report is a dry-run preview: edits are computed
    /// but nothing is persisted. A file that cannot be read or saved is
    /// recorded in `skipped` and processing continues with the next file.
    pub fn rewrite(&self, old_abs: &str, new_abs: &str, write: bool) -> Result<RewriteReport> {
        if !self.root.is_dir() {
            return Err(Error::workspace_not_found(
                self.root.to_string_lossy().to_string(),
            ));
        }

        let old_key = normalize::normalize(old_abs);
        let mut report = RewriteReport {
            old_path: old_abs.to_string(),
            new_path: new_abs.to_string(),
            changes: Vec::new(),
            files_changed: 0,
            skipped: Vec::new(),
            applied: false,
        };

        for pattern in self.config.glob_patterns() {
            let full = self.root.join(&pattern);
            let paths = match glob::glob(&full.to_string_lossy()) {
                Ok(paths) => paths,
                Err(e) => {
                    log_status!("rewrite", "Skipping pattern {}: {}", pattern, e);
                    report.skipped.push(SkippedFile {
                        file: pattern.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        report.skipped.push(SkippedFile {
                            file: e.path().to_string_lossy().to_string(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                let relative = path.strip_prefix(&self.root).unwrap_or(&path);
                if self.config.is_excluded(relative) {
                    continue;
                }
                self.process_file(&path, &old_key, new_abs, write, &mut report);
            }
        }

        let touched: HashSet<&str> = report.changes.iter().map(|c| c.file.as_str()).collect();
        report.files_changed = touched.len();
        report.applied = write && !report.changes.is_empty();

        if !report.changes.is_empty() {
            log_status!(
                "rewrite",
                "{} literal(s) in {} file(s): {} -> {}",
                report.changes.len(),
                report.files_changed,
                old_abs,
                new_abs
            );
        }

        Ok(report)
    }

    fn process_file(
        &self,
        path: &Path,
        old_key: &str,
        new_abs: &str,
        write: bool,
        report: &mut RewriteReport,
    ) {
        let fs = files::local();
        let relative = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let content = match fs.read(path) {
            Ok(content) => content,
            Err(e) => {
                log_status!("rewrite", "Skipping {}: {}", relative, e);
                report.skipped.push(SkippedFile {
                    file: relative,
                    reason: e.to_string(),
                });
                return;
            }
        };

        let dir = path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        let (edits, entries) = collect_edits(&content, &dir, &relative, old_key, new_abs);
        if edits.is_empty() {
            return;
        }

        if write {
            let new_content = apply_edits(content, edits);
            if let Err(e) = fs.write(path, &new_content) {
                log_status!("rewrite", "Failed to save {}: {}", relative, e);
                report.skipped.push(SkippedFile {
                    file: relative,
                    reason: e.to_string(),
                });
                return;
            }
        }

        log_status!("rewrite", "{}: {} literal(s)", relative, entries.len());
        report.changes.extend(entries);
    }
}

/// Scan a file's text for literals matching `old_key` and compute their
/// replacements. Offsets in the returned edits are byte positions in the
/// original text.
fn collect_edits(
    content: &str,
    dir: &str,
    relative_file: &str,
    old_key: &str,
    new_abs: &str,
) -> (Vec<Edit>, Vec<ChangeLogEntry>) {
    let mut edits = Vec::new();
    let mut entries = Vec::new();

    let mut offset = 0usize;
    for (line_idx, raw_line) in content.split_inclusive('\n').enumerate() {
        let line = raw_line.trim_end_matches('\n').trim_end_matches('\r');

        for m in scanner::scan(line) {
            let decoded = style::decode(&m.raw);
            if decoded.is_empty() {
                continue;
            }
            let resolved = resolve::resolve(&decoded, dir);
            if normalize::normalize(&resolved) != old_key {
                continue;
            }

            let new_inner =
                resolve::compute_replacement(resolve::is_absolute(&decoded), new_abs, dir);
            let new_raw = style::encode(&new_inner, &m.raw);
            if new_raw == m.raw {
                continue;
            }

            edits.push(Edit {
                start: offset + m.start,
                end: offset + m.start + m.len,
                replacement: new_raw,
            });
            entries.push(ChangeLogEntry {
                file: relative_file.to_string(),
                line: line_idx + 1,
                // Decoded on both sides so escaped literals do not mix
                // encodings in the summary.
                old_inner: decoded,
                new_inner,
            });
        }

        offset += raw_line.len();
    }

    (edits, entries)
}

/// Apply all edits as one batch against the original text.
///
/// Sorted by position descending so earlier replacements never shift the
/// offsets of later ones.
fn apply_edits(content: String, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));

    let mut new_content = content;
    for edit in &edits {
        new_content.replace_range(edit.start..edit.end, &edit.replacement);
    }
    new_content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn engine(root: &Path) -> RewriteEngine {
        RewriteEngine::new(root, ScanConfig::default())
    }

    #[test]
    fn rewrites_relative_literal_after_rename() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("utils")).unwrap();
        std::fs::write(root.join("a.py"), "open(\"utils/helper.py\")\n").unwrap();

        let old = root.join("utils/helper.py");
        let new = root.join("utils/helper2.py");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), true)
            .unwrap();

        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].new_inner, "utils/helper2.py");
        assert!(report.applied);

        let content = std::fs::read_to_string(root.join("a.py")).unwrap();
        assert_eq!(content, "open(\"utils/helper2.py\")\n");
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a.py"), "open(\"data.csv\")\n").unwrap();

        let old = root.join("data.csv");
        let new = root.join("data2.csv");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), false)
            .unwrap();

        assert_eq!(report.changes.len(), 1);
        assert!(!report.applied);
        let content = std::fs::read_to_string(root.join("a.py")).unwrap();
        assert_eq!(content, "open(\"data.csv\")\n");
    }

    #[test]
    fn raw_windows_literal_keeps_style() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("load.py"), "path = r\"C:\\data\\in.csv\"\n").unwrap();

        let report = engine(root)
            .rewrite(r"C:\data\in.csv", r"C:\data2\in.csv", true)
            .unwrap();

        assert_eq!(report.changes.len(), 1);
        let content = std::fs::read_to_string(root.join("load.py")).unwrap();
        assert_eq!(content, "path = r\"C:\\data2\\in.csv\"\n");
    }

    #[test]
    fn two_literals_on_one_line_no_offset_drift() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(
            root.join("a.py"),
            "merge(\"in/x.csv\", \"in/x.csv\")\n",
        )
        .unwrap();

        let old = root.join("in/x.csv");
        let new = root.join("out/longer_name.csv");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), true)
            .unwrap();

        assert_eq!(report.changes.len(), 2);
        let content = std::fs::read_to_string(root.join("a.py")).unwrap();
        assert_eq!(
            content,
            "merge(\"out/longer_name.csv\", \"out/longer_name.csv\")\n"
        );
    }

    #[test]
    fn unrelated_literals_untouched() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(
            root.join("a.py"),
            "open(\"data.csv\")\nprint(\"data\")\nopen(\"other/data.csv\")\n",
        )
        .unwrap();

        let old = root.join("data.csv");
        let new = root.join("data2.csv");
        engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), true)
            .unwrap();

        let content = std::fs::read_to_string(root.join("a.py")).unwrap();
        assert_eq!(
            content,
            "open(\"data2.csv\")\nprint(\"data\")\nopen(\"other/data.csv\")\n"
        );
    }

    #[test]
    fn noop_rename_is_byte_identical() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let original = "a = r\"C:\\data\\in.csv\"\nb = \"C:\\\\data\\\\in.csv\"\n";
        std::fs::write(root.join("a.py"), original).unwrap();

        let report = engine(root)
            .rewrite(r"C:\data\in.csv", r"C:\data\in.csv", true)
            .unwrap();

        assert!(report.changes.is_empty());
        let content = std::fs::read_to_string(root.join("a.py")).unwrap();
        assert_eq!(content, original);
    }

    #[test]
    fn noop_rename_keeps_single_quotes_byte_identical() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let original = "open('data.csv')\nread(`data.csv`)\n";
        std::fs::write(root.join("a.js"), original).unwrap();

        let old = root.join("data.csv");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &old.to_string_lossy(), true)
            .unwrap();

        assert!(report.changes.is_empty());
        let content = std::fs::read_to_string(root.join("a.js")).unwrap();
        assert_eq!(content, original);
    }

    #[test]
    fn single_quoted_literal_keeps_delimiter_on_rename() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a.py"), "open('data.csv')\n").unwrap();

        let old = root.join("data.csv");
        let new = root.join("data2.csv");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), true)
            .unwrap();

        assert_eq!(report.changes.len(), 1);
        let content = std::fs::read_to_string(root.join("a.py")).unwrap();
        assert_eq!(content, "open('data2.csv')\n");
    }

    #[test]
    fn change_log_records_decoded_old_path() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a.py"), "p = \"C:\\\\data\\\\in.csv\"\n").unwrap();

        let report = engine(root)
            .rewrite(r"C:\data\in.csv", r"C:\data2\in.csv", false)
            .unwrap();

        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].old_inner, r"C:\data\in.csv");
        assert_eq!(report.changes[0].new_inner, r"C:\data2\in.csv");
    }

    #[test]
    fn node_modules_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::write(
            root.join("node_modules/pkg/index.js"),
            "require(\"data.csv\")\n",
        )
        .unwrap();

        let old = root.join("node_modules/pkg/data.csv");
        let new = root.join("node_modules/pkg/data2.csv");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), true)
            .unwrap();

        assert!(report.changes.is_empty());
    }

    #[test]
    fn unsupported_extension_not_scanned() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("notes.txt"), "see \"data.csv\"\n").unwrap();

        let old = root.join("data.csv");
        let new = root.join("data2.csv");
        let report = engine(root)
            .rewrite(&old.to_string_lossy(), &new.to_string_lossy(), true)
            .unwrap();

        assert!(report.changes.is_empty());
        let content = std::fs::read_to_string(root.join("notes.txt")).unwrap();
        assert_eq!(content, "see \"data.csv\"\n");
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = engine(Path::new("/definitely/not/here"))
            .rewrite("/a.py", "/b.py", false)
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::WorkspaceNotFound);
    }
}
