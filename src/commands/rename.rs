use clap::Args;
use serde::Serialize;

use autopath::engine::{ChangeLogEntry, RewriteEngine, SkippedFile};
use autopath::{Error, ScanConfig};

use crate::commands::{absolutize, resolve_root, CmdResult};

#[derive(Args)]
pub struct RenameArgs {
    /// Previous path of the moved file
    pub old: String,
    /// Current path of the moved file
    pub new: String,
    /// Workspace root to scan (default: current directory)
    #[arg(long)]
    pub root: Option<String>,
    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RenameOutput {
    #[serde(rename = "rename")]
    Rename {
        old_path: String,
        new_path: String,
        dry_run: bool,
        total_changes: usize,
        files_changed: usize,
        changes: Vec<ChangeLogEntry>,
        skipped: Vec<SkippedFile>,
        applied: bool,
    },
}

pub fn run(args: RenameArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenameOutput> {
    if args.old.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "old",
            "Old path must not be empty",
        ));
    }
    if args.new.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "new",
            "New path must not be empty",
        ));
    }

    let root = resolve_root(args.root.as_deref())?;
    let old_abs = absolutize(&args.old, &root);
    let new_abs = absolutize(&args.new, &root);

    let engine = RewriteEngine::new(root, ScanConfig::default());
    let report = engine.rewrite(&old_abs, &new_abs, args.write)?;

    Ok((
        RenameOutput::Rename {
            old_path: report.old_path,
            new_path: report.new_path,
            dry_run: !args.write,
            total_changes: report.changes.len(),
            files_changed: report.files_changed,
            changes: report.changes,
            skipped: report.skipped,
            applied: report.applied,
        },
        0,
    ))
}
